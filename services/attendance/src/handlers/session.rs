use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use presenza_domain::id::{BranchId, EmployeeId, SessionId, TenantId};

use crate::domain::types::SessionView;
use crate::error::AttendanceServiceError;
use crate::state::AppState;
use crate::usecase::recovery::ReconcileOnResumeUseCase;
use crate::usecase::session::{CheckInInput, CheckInUseCase, CheckoutOutcome, ManualCheckoutUseCase};

// ── POST /attendance/sessions ─────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CheckInRequest {
    pub tenant_id: Uuid,
    pub employee_id: Uuid,
    pub branch_id: Uuid,
}

#[derive(Serialize)]
pub struct CheckInResponse {
    pub session_id: Uuid,
    #[serde(serialize_with = "presenza_core::serde::to_rfc3339_ms")]
    pub opened_at: DateTime<Utc>,
}

pub async fn check_in(
    State(state): State<AppState>,
    Json(body): Json<CheckInRequest>,
) -> Result<(StatusCode, Json<CheckInResponse>), AttendanceServiceError> {
    let usecase = CheckInUseCase {
        sessions: state.session_repo(),
        clock: state.clock(),
    };
    let session = usecase
        .execute(CheckInInput {
            tenant_id: TenantId(body.tenant_id),
            employee_id: EmployeeId(body.employee_id),
            branch_id: BranchId(body.branch_id),
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(CheckInResponse {
            session_id: session.id.0,
            opened_at: session.opened_at,
        }),
    ))
}

// ── POST /attendance/sessions/{session_id}/checkout ───────────────────────────

#[derive(Serialize)]
pub struct CheckoutResponse {
    pub status: &'static str,
}

pub async fn manual_checkout(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<CheckoutResponse>, AttendanceServiceError> {
    let usecase = ManualCheckoutUseCase {
        sessions: state.session_repo(),
        clock: state.clock(),
    };
    let outcome = usecase.execute(SessionId(session_id)).await?;
    let status = match outcome {
        CheckoutOutcome::Closed => "OK",
        CheckoutOutcome::AlreadyClosed => "ALREADY_CLOSED",
    };
    Ok(Json(CheckoutResponse { status }))
}

// ── GET /attendance/sessions/{session_id} ─────────────────────────────────────

pub async fn session_state(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionView>, AttendanceServiceError> {
    let usecase = ReconcileOnResumeUseCase {
        sessions: state.session_repo(),
        countdowns: state.countdown_repo(),
        clock: state.clock(),
    };
    let view = usecase.execute(SessionId(session_id)).await?;
    Ok(Json(view))
}
