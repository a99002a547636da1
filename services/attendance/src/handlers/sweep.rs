use axum::{Json, extract::State};

use crate::error::AttendanceServiceError;
use crate::state::AppState;
use crate::usecase::sweep::{ExpirySweepUseCase, SweepReport};

// ── POST /attendance/sweep ────────────────────────────────────────────────────

/// Manual trigger for the same pass the background sweep task runs. Safe to
/// call while the background task is mid-pass.
pub async fn run_expiry_sweep(
    State(state): State<AppState>,
) -> Result<Json<SweepReport>, AttendanceServiceError> {
    let usecase = ExpirySweepUseCase {
        countdowns: state.countdown_repo(),
        clock: state.clock(),
    };
    let report = usecase.run().await?;
    Ok(Json(report))
}
