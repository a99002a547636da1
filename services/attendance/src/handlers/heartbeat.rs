use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use presenza_domain::geo::GeoPoint;
use presenza_domain::id::{EmployeeId, SessionId, TenantId};

use crate::error::AttendanceServiceError;
use crate::state::AppState;
use crate::usecase::countdown::CountdownStateMachine;
use crate::usecase::heartbeat::{HeartbeatInput, IngestHeartbeatUseCase};
use crate::domain::types::{CountdownView, HeartbeatOutcome, PermissionState};

#[derive(Deserialize)]
pub struct HeartbeatRequest {
    pub tenant_id: Uuid,
    pub employee_id: Uuid,
    pub session_id: Uuid,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub accuracy_m: Option<f64>,
    pub permission_state: PermissionState,
    pub observed_at: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
pub struct HeartbeatResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub countdown: Option<CountdownView>,
}

// ── POST /attendance/heartbeat ────────────────────────────────────────────────

pub async fn ingest_heartbeat(
    State(state): State<AppState>,
    Json(body): Json<HeartbeatRequest>,
) -> Result<Json<HeartbeatResponse>, AttendanceServiceError> {
    let location = match (body.latitude, body.longitude) {
        (Some(lat), Some(lon)) => Some(GeoPoint::new(lat, lon)),
        (None, None) => None,
        _ => {
            return Err(AttendanceServiceError::Validation(
                "latitude and longitude must be sent together".to_owned(),
            ));
        }
    };

    let usecase = IngestHeartbeatUseCase {
        sessions: state.session_repo(),
        tenants: state.tenant_config_port(),
        branches: state.branch_port(),
        audit: state.audit_port(),
        machine: CountdownStateMachine {
            countdowns: state.countdown_repo(),
            clock: state.clock(),
        },
    };

    let outcome = usecase
        .execute(HeartbeatInput {
            tenant_id: TenantId(body.tenant_id),
            employee_id: EmployeeId(body.employee_id),
            session_id: SessionId(body.session_id),
            location,
            accuracy_m: body.accuracy_m,
            permission_state: body.permission_state,
            observed_at: body.observed_at,
        })
        .await?;

    let response = match outcome {
        HeartbeatOutcome::Ok => HeartbeatResponse {
            status: "OK",
            countdown: None,
        },
        HeartbeatOutcome::Pending(countdown) => HeartbeatResponse {
            status: "PENDING",
            countdown: Some(countdown),
        },
        HeartbeatOutcome::SessionClosed => HeartbeatResponse {
            status: "SESSION_CLOSED",
            countdown: None,
        },
    };
    Ok(Json(response))
}
