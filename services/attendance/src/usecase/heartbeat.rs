use chrono::{DateTime, Duration, Utc};

use presenza_domain::geo::GeoPoint;
use presenza_domain::id::{EmployeeId, SessionId, TenantId};

use crate::domain::Clock;
use crate::domain::geofence::{self, GeofenceThresholds};
use crate::domain::repository::{
    BranchPort, CountdownRepository, HeartbeatAuditPort, SessionRepository, TenantConfigPort,
};
use crate::domain::types::{
    AttendanceSession, Classification, CountdownView, HeartbeatOutcome, HeartbeatSample,
    PermissionState,
};
use crate::error::AttendanceServiceError;
use crate::usecase::countdown::CountdownStateMachine;

pub struct HeartbeatInput {
    pub tenant_id: TenantId,
    pub employee_id: EmployeeId,
    pub session_id: SessionId,
    pub location: Option<GeoPoint>,
    pub accuracy_m: Option<f64>,
    pub permission_state: PermissionState,
    /// Client-claimed sample time. Used only for the staleness heuristic,
    /// never for countdown arithmetic.
    pub observed_at: Option<DateTime<Utc>>,
}

pub struct IngestHeartbeatUseCase<S, C, T, B, A, K>
where
    S: SessionRepository,
    C: CountdownRepository,
    T: TenantConfigPort,
    B: BranchPort,
    A: HeartbeatAuditPort,
    K: Clock,
{
    pub sessions: S,
    pub tenants: T,
    pub branches: B,
    pub audit: A,
    pub machine: CountdownStateMachine<C, K>,
}

impl<S, C, T, B, A, K> IngestHeartbeatUseCase<S, C, T, B, A, K>
where
    S: SessionRepository,
    C: CountdownRepository,
    T: TenantConfigPort,
    B: BranchPort,
    A: HeartbeatAuditPort,
    K: Clock,
{
    pub async fn execute(
        &self,
        input: HeartbeatInput,
    ) -> Result<HeartbeatOutcome, AttendanceServiceError> {
        // 1. Validate the sample shape before touching any state.
        validate(&input)?;

        // 2. Server receipt time is the only clock countdowns run on.
        let received_at = self.machine.clock.now();

        // 3. Closed or unknown session → benign status; the client may be
        //    racing a manual checkout and should refetch state.
        let Some(session) = self.sessions.find_by_id(input.session_id).await? else {
            return Ok(HeartbeatOutcome::SessionClosed);
        };
        if !session.is_open() {
            return Ok(HeartbeatOutcome::SessionClosed);
        }

        // 4. The heartbeat must belong to the session it claims.
        if session.tenant_id != input.tenant_id || session.employee_id != input.employee_id {
            tracing::warn!(
                session_id = %session.id,
                claimed_tenant = %input.tenant_id,
                claimed_employee = %input.employee_id,
                "heartbeat tenant/employee mismatch"
            );
            return Err(AttendanceServiceError::TenantMismatch);
        }

        // 5. Engine gated per tenant; missing config counts as disabled.
        let settings = self.tenants.settings(session.tenant_id).await?;
        let Some(settings) = settings.filter(|s| s.enabled) else {
            return Ok(HeartbeatOutcome::Ok);
        };

        // 6. Classify against the branch geofence.
        let fence = self
            .branches
            .geofence(session.branch_id)
            .await?
            .ok_or_else(|| {
                AttendanceServiceError::Internal(anyhow::anyhow!(
                    "session {} references branch {} with no geofence",
                    session.id,
                    session.branch_id
                ))
            })?;
        let age = sample_age(received_at, input.observed_at);
        let classification = geofence::classify(
            input.location,
            input.accuracy_m,
            input.permission_state,
            age,
            &fence,
            &GeofenceThresholds::from(&settings),
        );

        // 7. Drive the countdown state machine.
        let pending = self
            .machine
            .apply(&session, classification, &settings)
            .await?;

        // 8. Best-effort audit; never fails the heartbeat.
        self.record_audit(&session, &input, received_at, classification)
            .await;

        Ok(match pending {
            Some(countdown) => HeartbeatOutcome::Pending(CountdownView::from(&countdown)),
            None => HeartbeatOutcome::Ok,
        })
    }

    async fn record_audit(
        &self,
        session: &AttendanceSession,
        input: &HeartbeatInput,
        received_at: DateTime<Utc>,
        classification: Classification,
    ) {
        let sample = HeartbeatSample {
            tenant_id: session.tenant_id,
            employee_id: session.employee_id,
            session_id: session.id,
            observed_at: input.observed_at,
            received_at,
            latitude: input.location.map(|p| p.latitude),
            longitude: input.location.map(|p| p.longitude),
            accuracy_m: input.accuracy_m,
            permission_state: input.permission_state,
            classification,
        };
        if let Err(e) = self.audit.record(&sample).await {
            tracing::warn!(session_id = %session.id, error = %e, "heartbeat audit write failed");
        }
    }
}

/// Age of the sample relative to server receipt. A claim from the future (or
/// no claim at all) counts as fresh — client clocks are not trusted enough to
/// penalize, and the permission/absence rules still apply.
fn sample_age(received_at: DateTime<Utc>, observed_at: Option<DateTime<Utc>>) -> Duration {
    match observed_at {
        Some(observed) => (received_at - observed).max(Duration::zero()),
        None => Duration::zero(),
    }
}

fn validate(input: &HeartbeatInput) -> Result<(), AttendanceServiceError> {
    if let Some(point) = &input.location {
        if !point.is_valid() {
            return Err(AttendanceServiceError::Validation(
                "coordinates out of range".to_owned(),
            ));
        }
    }
    if let Some(acc) = input.accuracy_m {
        if !acc.is_finite() || acc < 0.0 {
            return Err(AttendanceServiceError::Validation(
                "accuracy must be a non-negative number".to_owned(),
            ));
        }
    }
    Ok(())
}
