use chrono::Duration;

use presenza_attendance::domain::types::{
    CloseType, CountdownStatus, HeartbeatOutcome, ViolationReason,
};
use presenza_attendance::error::AttendanceServiceError;
use presenza_domain::id::SessionId;
use uuid::Uuid;

use crate::helpers::{COUNTDOWN_SECS, Harness};

#[tokio::test]
async fn unknown_session_is_not_found() {
    let h = Harness::new();

    let result = h.recovery().execute(SessionId(Uuid::new_v4())).await;

    assert!(
        matches!(result, Err(AttendanceServiceError::SessionNotFound)),
        "expected SessionNotFound, got {result:?}"
    );
}

#[tokio::test]
async fn open_session_without_countdown_resumes_plain() {
    let h = Harness::new();
    let session = h.open_session();

    let view = h.recovery().execute(session.id).await.unwrap();

    assert!(view.is_open);
    assert!(view.countdown.is_none());
}

#[tokio::test]
async fn future_countdown_is_returned_verbatim() {
    let h = Harness::new();
    let session = h.open_session();
    let outcome = h
        .ingest()
        .execute(h.out_of_branch_heartbeat(&session))
        .await
        .unwrap();
    let HeartbeatOutcome::Pending(expected) = outcome else {
        panic!("expected Pending");
    };

    h.clock.advance(Duration::seconds(200));
    let view = h.recovery().execute(session.id).await.unwrap();

    assert!(view.is_open);
    let countdown = view.countdown.expect("countdown should be reported");
    assert_eq!(countdown.reason, expected.reason);
    assert_eq!(countdown.ends_at, expected.ends_at);
}

/// An overdue countdown found on resume is executed synchronously: the caller
/// never sees a countdown with negative remaining time.
#[tokio::test]
async fn overdue_countdown_is_executed_before_returning() {
    let h = Harness::new();
    let session = h.open_session();
    h.ingest()
        .execute(h.denied_heartbeat(&session))
        .await
        .unwrap();
    // Client goes dark past the whole countdown (e.g. phone off), then resumes.
    h.clock.advance(Duration::seconds(COUNTDOWN_SECS + 5));

    let view = h.recovery().execute(session.id).await.unwrap();

    assert!(!view.is_open);
    assert!(view.countdown.is_none());

    let sessions = h.sessions.rows_handle();
    let sessions = sessions.lock().unwrap();
    assert!(sessions[0].closed_at.is_some());
    assert_eq!(sessions[0].close_type, Some(CloseType::Auto));
    assert_eq!(
        sessions[0].close_reason,
        Some(ViolationReason::LocationDisabled),
        "close_reason must match the countdown's reason"
    );

    let rows = h.countdowns.rows_handle();
    let rows = rows.lock().unwrap();
    assert_eq!(rows[0].status, CountdownStatus::Executed);
}

/// Back-to-back resumes with no intervening heartbeats return identical views.
#[tokio::test]
async fn repeated_resume_is_idempotent_with_live_countdown() {
    let h = Harness::new();
    let session = h.open_session();
    h.ingest()
        .execute(h.out_of_branch_heartbeat(&session))
        .await
        .unwrap();
    h.clock.advance(Duration::seconds(100));

    let first = h.recovery().execute(session.id).await.unwrap();
    let second = h.recovery().execute(session.id).await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn repeated_resume_is_idempotent_after_expiry() {
    let h = Harness::new();
    let session = h.open_session();
    h.ingest()
        .execute(h.out_of_branch_heartbeat(&session))
        .await
        .unwrap();
    h.clock.advance(Duration::seconds(COUNTDOWN_SECS + 1));

    let first = h.recovery().execute(session.id).await.unwrap();
    let second = h.recovery().execute(session.id).await.unwrap();

    assert_eq!(first, second);
    assert!(!first.is_open);
}

#[tokio::test]
async fn resume_after_manual_close_reports_closed_without_countdown() {
    let h = Harness::new();
    let session = h.open_session();
    h.ingest()
        .execute(h.out_of_branch_heartbeat(&session))
        .await
        .unwrap();
    h.manual_checkout().execute(session.id).await.unwrap();

    let view = h.recovery().execute(session.id).await.unwrap();

    assert!(!view.is_open);
    assert!(
        view.countdown.is_none(),
        "a closed session never reports a countdown"
    );
}
