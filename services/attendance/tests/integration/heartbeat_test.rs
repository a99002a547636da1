use chrono::Duration;
use uuid::Uuid;

use presenza_attendance::domain::types::{
    CancelReason, Classification, CountdownStatus, HeartbeatOutcome, TenantSettings,
    ViolationReason,
};
use presenza_attendance::error::AttendanceServiceError;
use presenza_attendance::usecase::heartbeat::HeartbeatInput;
use presenza_core::clock::Clock;
use presenza_domain::geo::GeoPoint;
use presenza_domain::id::{EmployeeId, TenantId};

use crate::helpers::Harness;

#[tokio::test]
async fn should_report_session_closed_for_unknown_session() {
    let h = Harness::new();
    let session = h.open_session();
    let mut input = h.ok_heartbeat(&session);
    input.session_id = presenza_domain::id::SessionId(Uuid::new_v4());

    let outcome = h.ingest().execute(input).await.unwrap();

    assert_eq!(outcome, HeartbeatOutcome::SessionClosed);
}

#[tokio::test]
async fn should_report_session_closed_after_manual_checkout() {
    let h = Harness::new();
    let session = h.open_session();
    h.manual_checkout().execute(session.id).await.unwrap();

    let outcome = h.ingest().execute(h.ok_heartbeat(&session)).await.unwrap();

    assert_eq!(outcome, HeartbeatOutcome::SessionClosed);
}

#[tokio::test]
async fn should_reject_heartbeat_with_wrong_tenant() {
    let h = Harness::new();
    let session = h.open_session();
    let input = HeartbeatInput {
        tenant_id: TenantId(Uuid::new_v4()),
        ..h.ok_heartbeat(&session)
    };

    let result = h.ingest().execute(input).await;

    assert!(
        matches!(result, Err(AttendanceServiceError::TenantMismatch)),
        "expected TenantMismatch, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_heartbeat_with_wrong_employee() {
    let h = Harness::new();
    let session = h.open_session();
    let input = HeartbeatInput {
        employee_id: EmployeeId(Uuid::new_v4()),
        ..h.ok_heartbeat(&session)
    };

    let result = h.ingest().execute(input).await;

    assert!(matches!(result, Err(AttendanceServiceError::TenantMismatch)));
}

#[tokio::test]
async fn should_reject_out_of_range_coordinates() {
    let h = Harness::new();
    let session = h.open_session();
    let input = HeartbeatInput {
        location: Some(GeoPoint::new(95.0, 46.0)),
        ..h.ok_heartbeat(&session)
    };

    let result = h.ingest().execute(input).await;

    assert!(
        matches!(result, Err(AttendanceServiceError::Validation(_))),
        "expected Validation, got {result:?}"
    );
}

#[tokio::test]
async fn should_skip_engine_when_tenant_disabled() {
    let mut h = Harness::new();
    h.tenants.settings = Some(TenantSettings {
        enabled: false,
        ..crate::helpers::default_settings()
    });
    let session = h.open_session();

    let outcome = h
        .ingest()
        .execute(h.out_of_branch_heartbeat(&session))
        .await
        .unwrap();

    assert_eq!(outcome, HeartbeatOutcome::Ok);
    assert!(h.countdowns.rows_handle().lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_skip_engine_when_tenant_config_missing() {
    let mut h = Harness::new();
    h.tenants.settings = None;
    let session = h.open_session();

    let outcome = h
        .ingest()
        .execute(h.out_of_branch_heartbeat(&session))
        .await
        .unwrap();

    assert_eq!(outcome, HeartbeatOutcome::Ok);
    assert!(h.countdowns.rows_handle().lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_start_countdown_on_out_of_branch() {
    let h = Harness::new();
    let session = h.open_session();
    let t0 = h.clock.now();

    let outcome = h
        .ingest()
        .execute(h.out_of_branch_heartbeat(&session))
        .await
        .unwrap();

    let HeartbeatOutcome::Pending(view) = outcome else {
        panic!("expected Pending, got {outcome:?}");
    };
    assert_eq!(view.reason, ViolationReason::OutOfBranch);
    assert_eq!(view.ends_at, t0 + Duration::seconds(crate::helpers::COUNTDOWN_SECS));

    let rows = h.countdowns.rows_handle();
    let rows = rows.lock().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].status, CountdownStatus::Pending);
    assert_eq!(rows[0].session_id, session.id);
}

#[tokio::test]
async fn should_start_countdown_when_permission_denied() {
    let h = Harness::new();
    let session = h.open_session();

    let outcome = h
        .ingest()
        .execute(h.denied_heartbeat(&session))
        .await
        .unwrap();

    let HeartbeatOutcome::Pending(view) = outcome else {
        panic!("expected Pending, got {outcome:?}");
    };
    assert_eq!(view.reason, ViolationReason::LocationDisabled);
}

#[tokio::test]
async fn should_cancel_countdown_on_recovery() {
    let h = Harness::new();
    let session = h.open_session();
    h.ingest()
        .execute(h.out_of_branch_heartbeat(&session))
        .await
        .unwrap();

    h.clock.advance(Duration::seconds(30));
    let outcome = h.ingest().execute(h.ok_heartbeat(&session)).await.unwrap();

    assert_eq!(outcome, HeartbeatOutcome::Ok);
    let rows = h.countdowns.rows_handle();
    let rows = rows.lock().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].status, CountdownStatus::Cancelled);
    assert_eq!(rows[0].cancel_reason, Some(CancelReason::Recovered));
}

#[tokio::test]
async fn should_not_touch_ends_at_on_repeat_violation() {
    let h = Harness::new();
    let session = h.open_session();
    let first = h
        .ingest()
        .execute(h.out_of_branch_heartbeat(&session))
        .await
        .unwrap();
    let HeartbeatOutcome::Pending(first_view) = first else {
        panic!("expected Pending");
    };

    // A later violation with a different reason must not restart the clock.
    h.clock.advance(Duration::seconds(120));
    let second = h
        .ingest()
        .execute(h.denied_heartbeat(&session))
        .await
        .unwrap();

    let HeartbeatOutcome::Pending(second_view) = second else {
        panic!("expected Pending");
    };
    assert_eq!(second_view.ends_at, first_view.ends_at);
    assert_eq!(second_view.reason, first_view.reason);

    let rows = h.countdowns.rows_handle();
    let rows = rows.lock().unwrap();
    assert_eq!(rows.len(), 1, "repeat violation must not create a second row");
}

#[tokio::test]
async fn should_swallow_audit_failures() {
    let mut h = Harness::new();
    h.audit = crate::helpers::MockAuditPort::failing();
    let session = h.open_session();

    let outcome = h
        .ingest()
        .execute(h.out_of_branch_heartbeat(&session))
        .await
        .unwrap();

    assert!(matches!(outcome, HeartbeatOutcome::Pending(_)));
}

#[tokio::test]
async fn should_record_audit_sample_with_classification() {
    let h = Harness::new();
    let session = h.open_session();

    h.ingest()
        .execute(h.out_of_branch_heartbeat(&session))
        .await
        .unwrap();

    let samples = h.audit.samples_handle();
    let samples = samples.lock().unwrap();
    assert_eq!(samples.len(), 1);
    assert_eq!(samples[0].session_id, session.id);
    assert_eq!(samples[0].classification, Classification::OutOfBranch);
    assert_eq!(samples[0].received_at, h.clock.now());
}

#[tokio::test]
async fn should_treat_stale_sample_as_location_disabled() {
    let h = Harness::new();
    let session = h.open_session();
    let input = HeartbeatInput {
        observed_at: Some(h.clock.now() - Duration::seconds(300)),
        ..h.ok_heartbeat(&session)
    };

    let outcome = h.ingest().execute(input).await.unwrap();

    let HeartbeatOutcome::Pending(view) = outcome else {
        panic!("expected Pending, got {outcome:?}");
    };
    assert_eq!(view.reason, ViolationReason::LocationDisabled);
}

#[tokio::test]
async fn should_not_flag_out_of_branch_on_poor_accuracy() {
    let h = Harness::new();
    let session = h.open_session();
    let input = HeartbeatInput {
        accuracy_m: Some(500.0),
        ..h.out_of_branch_heartbeat(&session)
    };

    let outcome = h.ingest().execute(input).await.unwrap();

    assert_eq!(outcome, HeartbeatOutcome::Ok);
    assert!(h.countdowns.rows_handle().lock().unwrap().is_empty());
}
