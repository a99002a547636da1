//! Expiry sweep: the only path that turns a countdown into an automatic
//! checkout. Runs on a timer and tolerates concurrent invocations — every
//! mutation is a conditional write, so overlapping sweeps and client-triggered
//! reconciliation resolve each countdown exactly once.

use serde::Serialize;

use crate::domain::Clock;
use crate::domain::repository::{CountdownRepository, ExecuteOutcome};
use crate::domain::types::{PendingCountdown, SWEEP_BATCH_SIZE};
use crate::error::AttendanceServiceError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    pub executed_count: u64,
    pub already_handled_count: u64,
}

pub struct ExpirySweepUseCase<C, K>
where
    C: CountdownRepository,
    K: Clock,
{
    pub countdowns: C,
    pub clock: K,
}

impl<C, K> ExpirySweepUseCase<C, K>
where
    C: CountdownRepository,
    K: Clock,
{
    /// Resolve one countdown. `StillPending` short-circuits before any write;
    /// past `ends_at` the repository transaction decides between Executed and
    /// AlreadyHandled.
    pub async fn try_execute(
        &self,
        countdown: &PendingCountdown,
    ) -> Result<ExecuteOutcome, AttendanceServiceError> {
        let now = self.clock.now();
        if !countdown.is_expired_at(now) {
            return Ok(ExecuteOutcome::StillPending);
        }
        let outcome = self.countdowns.execute_expired(countdown.id, now).await?;
        if outcome == ExecuteOutcome::Executed {
            tracing::info!(
                countdown_id = %countdown.id,
                session_id = %countdown.session_id,
                reason = countdown.reason.as_str(),
                "auto checkout executed"
            );
        }
        Ok(outcome)
    }

    /// One sweep pass over expired PENDING countdowns.
    pub async fn run(&self) -> Result<SweepReport, AttendanceServiceError> {
        let now = self.clock.now();
        let expired = self
            .countdowns
            .find_expired_pending(now, SWEEP_BATCH_SIZE)
            .await?;

        let mut report = SweepReport::default();
        for countdown in &expired {
            match self.try_execute(countdown).await? {
                ExecuteOutcome::Executed => report.executed_count += 1,
                ExecuteOutcome::AlreadyHandled => report.already_handled_count += 1,
                // Not reachable for rows selected by expiry, unless the clock
                // moved between the query and the check; skip either way.
                ExecuteOutcome::StillPending => {}
            }
        }
        Ok(report)
    }
}
