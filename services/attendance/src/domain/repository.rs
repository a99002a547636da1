#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};

use presenza_domain::geo::Geofence;
use presenza_domain::id::{BranchId, CountdownId, SessionId, TenantId};

use crate::domain::types::{
    AttendanceSession, CancelReason, CloseType, HeartbeatSample, PendingCountdown, TenantSettings,
    ViolationReason,
};
use crate::error::AttendanceServiceError;

/// Result of an idempotent countdown creation attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum CreateOutcome {
    /// This call inserted the row.
    Created(PendingCountdown),
    /// A concurrent (or earlier) heartbeat already holds the PENDING slot;
    /// the returned row is the winner's, with its original `ends_at`.
    AlreadyPending(PendingCountdown),
}

impl CreateOutcome {
    pub fn into_countdown(self) -> PendingCountdown {
        match self {
            Self::Created(c) | Self::AlreadyPending(c) => c,
        }
    }
}

/// Result of trying to execute an expired countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecuteOutcome {
    /// This call closed the session (close_type = AUTO) and marked the
    /// countdown EXECUTED.
    Executed,
    /// Someone else resolved it first: a concurrent executor, a recovering
    /// heartbeat, or a manual checkout (countdown goes CANCELLED/MANUAL_RACE).
    AlreadyHandled,
    /// `ends_at` is still in the future.
    StillPending,
}

/// Repository for attendance sessions.
pub trait SessionRepository: Send + Sync {
    async fn find_by_id(
        &self,
        id: SessionId,
    ) -> Result<Option<AttendanceSession>, AttendanceServiceError>;

    /// Insert a new open session. Returns `false` if the employee already has
    /// an open session (partial unique index), in which case nothing is written.
    async fn create(&self, session: &AttendanceSession)
    -> Result<bool, AttendanceServiceError>;

    /// Close the session iff it is still open (`closed_at IS NULL` guard).
    /// Returns `true` if this call closed it. Never overwrites a prior close.
    async fn close_if_open(
        &self,
        id: SessionId,
        close_type: CloseType,
        close_reason: Option<ViolationReason>,
        at: DateTime<Utc>,
    ) -> Result<bool, AttendanceServiceError>;
}

/// Repository for auto-checkout countdowns. All mutations are conditional
/// single statements (or one transaction for [`execute_expired`]); there is no
/// read-modify-write path.
///
/// [`execute_expired`]: CountdownRepository::execute_expired
pub trait CountdownRepository: Send + Sync {
    /// Insert a fresh PENDING countdown. If the session already has one, the
    /// unique index rejects the insert and the existing row is returned
    /// instead — the loser of a concurrent race adopts the winner's row.
    async fn create_if_absent(
        &self,
        countdown: &PendingCountdown,
    ) -> Result<CreateOutcome, AttendanceServiceError>;

    async fn find_pending_by_session(
        &self,
        session_id: SessionId,
    ) -> Result<Option<PendingCountdown>, AttendanceServiceError>;

    /// Transition PENDING → CANCELLED. Returns `false` if the row was no
    /// longer PENDING (executed or cancelled first) — a benign race.
    async fn cancel_pending(
        &self,
        id: CountdownId,
        reason: CancelReason,
    ) -> Result<bool, AttendanceServiceError>;

    /// PENDING countdowns with `ends_at <= now`, oldest first.
    async fn find_expired_pending(
        &self,
        now: DateTime<Utc>,
        limit: u64,
    ) -> Result<Vec<PendingCountdown>, AttendanceServiceError>;

    /// Atomically resolve an expired countdown, in one transaction:
    /// flip PENDING → EXECUTED, then close the session if still open. If a
    /// manual checkout won the close, the countdown is recorded
    /// CANCELLED/MANUAL_RACE instead — close_type = MANUAL is never overwritten.
    async fn execute_expired(
        &self,
        id: CountdownId,
        now: DateTime<Utc>,
    ) -> Result<ExecuteOutcome, AttendanceServiceError>;
}

/// Read-only port for per-tenant reconciliation settings.
pub trait TenantConfigPort: Send + Sync {
    async fn settings(
        &self,
        tenant_id: TenantId,
    ) -> Result<Option<TenantSettings>, AttendanceServiceError>;
}

/// Read-only port for branch geofences.
pub trait BranchPort: Send + Sync {
    async fn geofence(
        &self,
        branch_id: BranchId,
    ) -> Result<Option<Geofence>, AttendanceServiceError>;
}

/// Best-effort audit sink for location samples. Callers log and swallow
/// failures; nothing reads this data for correctness.
pub trait HeartbeatAuditPort: Send + Sync {
    async fn record(&self, sample: &HeartbeatSample) -> Result<(), AttendanceServiceError>;
}
