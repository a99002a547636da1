use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Attendance service error variants.
///
/// Benign races (heartbeat for a closed session, sweep losing to a manual
/// checkout) are statuses on the success path, never errors — only conditions
/// the client must change behavior on land here.
#[derive(Debug, thiserror::Error)]
pub enum AttendanceServiceError {
    #[error("invalid heartbeat: {0}")]
    Validation(String),
    #[error("session not found")]
    SessionNotFound,
    #[error("employee already has an open session")]
    AlreadyClockedIn,
    #[error("tenant or employee does not match session")]
    TenantMismatch,
    /// Transient storage failure. All mutations are single conditional
    /// statements or single transactions, so the caller may retry without
    /// risking duplicate side effects.
    #[error("storage unavailable, retry")]
    Storage(#[from] anyhow::Error),
    #[error("internal error")]
    Internal(anyhow::Error),
}

impl AttendanceServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION",
            Self::SessionNotFound => "SESSION_NOT_FOUND",
            Self::AlreadyClockedIn => "ALREADY_CLOCKED_IN",
            Self::TenantMismatch => "TENANT_MISMATCH",
            Self::Storage(_) => "STORAGE_TRANSIENT",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for AttendanceServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::SessionNotFound => StatusCode::NOT_FOUND,
            Self::AlreadyClockedIn => StatusCode::CONFLICT,
            Self::TenantMismatch => StatusCode::FORBIDDEN,
            Self::Storage(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // Log 5xx only — tower-http TraceLayer already records method/uri/status
        // for all requests. 4xx are expected client errors; logging them here
        // would be noise. Storage and internal errors need the anyhow chain
        // logged so the root cause is traceable.
        match &self {
            Self::Storage(e) => tracing::warn!(error = %e, kind = "STORAGE_TRANSIENT", "storage error"),
            Self::Internal(e) => tracing::error!(error = %e, kind = "INTERNAL", "internal error"),
            _ => {}
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
