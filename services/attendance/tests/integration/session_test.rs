use uuid::Uuid;

use presenza_attendance::domain::types::CloseType;
use presenza_attendance::error::AttendanceServiceError;
use presenza_attendance::usecase::session::{CheckInInput, CheckoutOutcome};
use presenza_core::clock::Clock;
use presenza_domain::id::{BranchId, EmployeeId, SessionId, TenantId};

use crate::helpers::Harness;

fn check_in_input() -> CheckInInput {
    CheckInInput {
        tenant_id: TenantId(Uuid::new_v4()),
        employee_id: EmployeeId(Uuid::new_v4()),
        branch_id: BranchId(Uuid::new_v4()),
    }
}

#[tokio::test]
async fn should_open_session_on_check_in() {
    let h = Harness::new();
    let input = check_in_input();

    let session = h.check_in().execute(input).await.unwrap();

    assert!(session.is_open());
    assert_eq!(session.opened_at, h.clock.now());
    let rows = h.sessions.rows_handle();
    let rows = rows.lock().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, session.id);
}

#[tokio::test]
async fn should_reject_check_in_while_already_clocked_in() {
    let h = Harness::new();
    let input = check_in_input();
    h.check_in().execute(input).await.unwrap();

    let result = h.check_in().execute(input).await;

    assert!(
        matches!(result, Err(AttendanceServiceError::AlreadyClockedIn)),
        "expected AlreadyClockedIn, got {result:?}"
    );
    assert_eq!(h.sessions.rows_handle().lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_allow_check_in_after_previous_session_closed() {
    let h = Harness::new();
    let input = check_in_input();
    let first = h.check_in().execute(input).await.unwrap();
    h.manual_checkout().execute(first.id).await.unwrap();

    let second = h.check_in().execute(input).await.unwrap();

    assert!(second.is_open());
    assert_ne!(second.id, first.id);
}

#[tokio::test]
async fn should_close_open_session_manually() {
    let h = Harness::new();
    let session = h.open_session();

    let outcome = h.manual_checkout().execute(session.id).await.unwrap();

    assert_eq!(outcome, CheckoutOutcome::Closed);
    let rows = h.sessions.rows_handle();
    let rows = rows.lock().unwrap();
    assert_eq!(rows[0].closed_at, Some(h.clock.now()));
    assert_eq!(rows[0].close_type, Some(CloseType::Manual));
    assert_eq!(rows[0].close_reason, None);
}

#[tokio::test]
async fn should_report_already_closed_on_double_checkout() {
    let h = Harness::new();
    let session = h.open_session();
    h.manual_checkout().execute(session.id).await.unwrap();

    let outcome = h.manual_checkout().execute(session.id).await.unwrap();

    assert_eq!(outcome, CheckoutOutcome::AlreadyClosed);
}

#[tokio::test]
async fn should_fail_checkout_of_unknown_session() {
    let h = Harness::new();

    let result = h
        .manual_checkout()
        .execute(SessionId(Uuid::new_v4()))
        .await;

    assert!(matches!(result, Err(AttendanceServiceError::SessionNotFound)));
}
