//! Check-in and manual checkout. Thin by design: the reconciliation engine is
//! the interesting part, these exist so the manual/auto close race is real.

use uuid::Uuid;

use presenza_domain::id::{BranchId, EmployeeId, SessionId, TenantId};

use crate::domain::Clock;
use crate::domain::repository::SessionRepository;
use crate::domain::types::{AttendanceSession, CloseType};
use crate::error::AttendanceServiceError;

#[derive(Debug, Clone, Copy)]
pub struct CheckInInput {
    pub tenant_id: TenantId,
    pub employee_id: EmployeeId,
    pub branch_id: BranchId,
}

pub struct CheckInUseCase<S, K>
where
    S: SessionRepository,
    K: Clock,
{
    pub sessions: S,
    pub clock: K,
}

impl<S, K> CheckInUseCase<S, K>
where
    S: SessionRepository,
    K: Clock,
{
    pub async fn execute(
        &self,
        input: CheckInInput,
    ) -> Result<AttendanceSession, AttendanceServiceError> {
        let session = AttendanceSession {
            id: SessionId(Uuid::new_v4()),
            tenant_id: input.tenant_id,
            employee_id: input.employee_id,
            branch_id: input.branch_id,
            opened_at: self.clock.now(),
            closed_at: None,
            close_type: None,
            close_reason: None,
        };
        let created = self.sessions.create(&session).await?;
        if !created {
            return Err(AttendanceServiceError::AlreadyClockedIn);
        }
        Ok(session)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutOutcome {
    Closed,
    /// The session was already closed — possibly by the expiry sweep a moment
    /// earlier. Benign; the client should refetch session state.
    AlreadyClosed,
}

pub struct ManualCheckoutUseCase<S, K>
where
    S: SessionRepository,
    K: Clock,
{
    pub sessions: S,
    pub clock: K,
}

impl<S, K> ManualCheckoutUseCase<S, K>
where
    S: SessionRepository,
    K: Clock,
{
    /// Conditional close only; any PENDING countdown for the session is left
    /// for the sweep, which records it CANCELLED/MANUAL_RACE.
    pub async fn execute(
        &self,
        session_id: SessionId,
    ) -> Result<CheckoutOutcome, AttendanceServiceError> {
        if self.sessions.find_by_id(session_id).await?.is_none() {
            return Err(AttendanceServiceError::SessionNotFound);
        }
        let closed = self
            .sessions
            .close_if_open(session_id, CloseType::Manual, None, self.clock.now())
            .await?;
        Ok(if closed {
            CheckoutOutcome::Closed
        } else {
            CheckoutOutcome::AlreadyClosed
        })
    }
}
