//! Session state reconstruction on reconnect or restart. The only inputs are
//! durable rows — no client-cached countdown, no in-process timer — so any
//! number of resumes derive the same answer from the same storage.

use presenza_domain::id::SessionId;

use crate::domain::Clock;
use crate::domain::repository::{CountdownRepository, SessionRepository};
use crate::domain::types::{CountdownView, SessionView};
use crate::error::AttendanceServiceError;

pub struct ReconcileOnResumeUseCase<S, C, K>
where
    S: SessionRepository,
    C: CountdownRepository,
    K: Clock,
{
    pub sessions: S,
    pub countdowns: C,
    pub clock: K,
}

impl<S, C, K> ReconcileOnResumeUseCase<S, C, K>
where
    S: SessionRepository,
    C: CountdownRepository,
    K: Clock,
{
    pub async fn execute(
        &self,
        session_id: SessionId,
    ) -> Result<SessionView, AttendanceServiceError> {
        let session = self
            .sessions
            .find_by_id(session_id)
            .await?
            .ok_or(AttendanceServiceError::SessionNotFound)?;

        if !session.is_open() {
            return Ok(SessionView {
                is_open: false,
                countdown: None,
            });
        }

        let Some(pending) = self.countdowns.find_pending_by_session(session_id).await? else {
            return Ok(SessionView {
                is_open: true,
                countdown: None,
            });
        };

        let now = self.clock.now();
        if pending.is_expired_at(now) {
            // Overdue countdown found on resume: execute before answering so
            // the client never renders negative remaining time. Whatever the
            // race outcome, the session row afterwards is the truth.
            let _ = self.countdowns.execute_expired(pending.id, now).await?;
            let session = self
                .sessions
                .find_by_id(session_id)
                .await?
                .ok_or(AttendanceServiceError::SessionNotFound)?;
            return Ok(SessionView {
                is_open: session.is_open(),
                countdown: None,
            });
        }

        Ok(SessionView {
            is_open: true,
            countdown: Some(CountdownView::from(&pending)),
        })
    }
}
