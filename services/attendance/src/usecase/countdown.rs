//! Per-session countdown lifecycle: NONE → PENDING → {CANCELLED → NONE,
//! EXECUTED}. Heartbeats drive NONE/PENDING/CANCELLED here; EXECUTED belongs
//! to the expiry sweep.

use uuid::Uuid;

use presenza_domain::id::CountdownId;

use crate::domain::Clock;
use crate::domain::repository::CountdownRepository;
use crate::domain::types::{
    AttendanceSession, CancelReason, Classification, CountdownStatus, PendingCountdown,
    TenantSettings,
};
use crate::error::AttendanceServiceError;

pub struct CountdownStateMachine<C, K>
where
    C: CountdownRepository,
    K: Clock,
{
    pub countdowns: C,
    pub clock: K,
}

impl<C, K> CountdownStateMachine<C, K>
where
    C: CountdownRepository,
    K: Clock,
{
    /// Apply one classification to the session's countdown state. Returns the
    /// PENDING countdown after the transition, if any.
    ///
    /// A violation attempts a fresh full-duration countdown; if one is already
    /// PENDING, the storage-level unique index rejects the insert and the
    /// existing row survives untouched — `ends_at` is never extended, rewound
    /// or restarted by a reason change. An OK classification cancels whatever
    /// is PENDING (RECOVERED); losing that race to the executor is a no-op.
    pub async fn apply(
        &self,
        session: &AttendanceSession,
        classification: Classification,
        settings: &TenantSettings,
    ) -> Result<Option<PendingCountdown>, AttendanceServiceError> {
        match classification.violation_reason() {
            None => {
                if let Some(pending) = self
                    .countdowns
                    .find_pending_by_session(session.id)
                    .await?
                {
                    let cancelled = self
                        .countdowns
                        .cancel_pending(pending.id, CancelReason::Recovered)
                        .await?;
                    if cancelled {
                        tracing::info!(
                            session_id = %session.id,
                            countdown_id = %pending.id,
                            "countdown cancelled on recovery"
                        );
                    }
                }
                Ok(None)
            }
            Some(reason) => {
                let now = self.clock.now();
                let fresh = PendingCountdown {
                    id: CountdownId(Uuid::new_v4()),
                    tenant_id: session.tenant_id,
                    employee_id: session.employee_id,
                    session_id: session.id,
                    reason,
                    started_at: now,
                    ends_at: now + settings.countdown,
                    status: CountdownStatus::Pending,
                    cancel_reason: None,
                    created_at: now,
                };
                let outcome = self.countdowns.create_if_absent(&fresh).await?;
                let countdown = outcome.into_countdown();
                if countdown.id == fresh.id {
                    tracing::info!(
                        session_id = %session.id,
                        countdown_id = %countdown.id,
                        reason = countdown.reason.as_str(),
                        ends_at = %countdown.ends_at,
                        "countdown started"
                    );
                }
                Ok(Some(countdown))
            }
        }
    }
}
