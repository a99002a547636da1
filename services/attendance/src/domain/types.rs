use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use presenza_domain::id::{BranchId, CountdownId, EmployeeId, SessionId, TenantId};

/// Location permission state reported by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionState {
    Granted,
    Denied,
    Prompt,
}

impl PermissionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Granted => "granted",
            Self::Denied => "denied",
            Self::Prompt => "prompt",
        }
    }
}

/// Result of classifying one heartbeat against the branch geofence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Ok,
    LocationDisabled,
    OutOfBranch,
}

impl Classification {
    /// The violation this classification starts (or sustains), if any.
    pub fn violation_reason(&self) -> Option<ViolationReason> {
        match self {
            Self::Ok => None,
            Self::LocationDisabled => Some(ViolationReason::LocationDisabled),
            Self::OutOfBranch => Some(ViolationReason::OutOfBranch),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::LocationDisabled => "LOCATION_DISABLED",
            Self::OutOfBranch => "OUT_OF_BRANCH",
        }
    }
}

/// Why a countdown was started (and, on expiry, why the session closed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationReason {
    LocationDisabled,
    OutOfBranch,
}

impl ViolationReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LocationDisabled => "LOCATION_DISABLED",
            Self::OutOfBranch => "OUT_OF_BRANCH",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "LOCATION_DISABLED" => Some(Self::LocationDisabled),
            "OUT_OF_BRANCH" => Some(Self::OutOfBranch),
            _ => None,
        }
    }
}

/// Countdown lifecycle state. PENDING is the only live state; CANCELLED and
/// EXECUTED are terminal for the row (a new violation creates a new row).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownStatus {
    Pending,
    Cancelled,
    Executed,
}

impl CountdownStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Cancelled => "CANCELLED",
            Self::Executed => "EXECUTED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(Self::Pending),
            "CANCELLED" => Some(Self::Cancelled),
            "EXECUTED" => Some(Self::Executed),
            _ => None,
        }
    }
}

/// Why a PENDING countdown was cancelled instead of executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    /// A recovering (OK) heartbeat arrived while the countdown was PENDING.
    Recovered,
    /// A manual checkout closed the session before the sweep got to it.
    ManualRace,
}

impl CancelReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Recovered => "RECOVERED",
            Self::ManualRace => "MANUAL_RACE",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "RECOVERED" => Some(Self::Recovered),
            "MANUAL_RACE" => Some(Self::ManualRace),
            _ => None,
        }
    }
}

/// How a session was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseType {
    Manual,
    Auto,
}

impl CloseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manual => "MANUAL",
            Self::Auto => "AUTO",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "MANUAL" => Some(Self::Manual),
            "AUTO" => Some(Self::Auto),
            _ => None,
        }
    }
}

/// One clock-in period. Immutable once `closed_at` is set.
#[derive(Debug, Clone, PartialEq)]
pub struct AttendanceSession {
    pub id: SessionId,
    pub tenant_id: TenantId,
    pub employee_id: EmployeeId,
    pub branch_id: BranchId,
    pub opened_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    pub close_type: Option<CloseType>,
    pub close_reason: Option<ViolationReason>,
}

impl AttendanceSession {
    pub fn is_open(&self) -> bool {
        self.closed_at.is_none()
    }
}

/// Durable state of one auto-checkout countdown. `ends_at` is fixed at
/// creation; no later heartbeat extends or rewinds it.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingCountdown {
    pub id: CountdownId,
    pub tenant_id: TenantId,
    pub employee_id: EmployeeId,
    pub session_id: SessionId,
    pub reason: ViolationReason,
    pub started_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub status: CountdownStatus,
    pub cancel_reason: Option<CancelReason>,
    pub created_at: DateTime<Utc>,
}

impl PendingCountdown {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.ends_at <= now
    }
}

/// Per-tenant reconciliation settings (external master data, read-only here).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TenantSettings {
    pub countdown: Duration,
    pub max_accuracy_m: f64,
    pub staleness: Duration,
    pub enabled: bool,
}

/// One normalized location sample, kept for audit only.
#[derive(Debug, Clone, PartialEq)]
pub struct HeartbeatSample {
    pub tenant_id: TenantId,
    pub employee_id: EmployeeId,
    pub session_id: SessionId,
    pub observed_at: Option<DateTime<Utc>>,
    pub received_at: DateTime<Utc>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub accuracy_m: Option<f64>,
    pub permission_state: PermissionState,
    pub classification: Classification,
}

/// Client-facing view of a live countdown. The client renders remaining time
/// purely as `ends_at - now`; it never runs its own timer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountdownView {
    pub reason: ViolationReason,
    #[serde(serialize_with = "presenza_core::serde::to_rfc3339_ms")]
    pub ends_at: DateTime<Utc>,
}

impl From<&PendingCountdown> for CountdownView {
    fn from(countdown: &PendingCountdown) -> Self {
        Self {
            reason: countdown.reason,
            ends_at: countdown.ends_at,
        }
    }
}

/// Session state reconstructed from durable storage on resume.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionView {
    pub is_open: bool,
    pub countdown: Option<CountdownView>,
}

/// Outcome of ingesting one heartbeat.
#[derive(Debug, Clone, PartialEq)]
pub enum HeartbeatOutcome {
    /// Location trusted and inside the fence (or engine disabled); no live countdown.
    Ok,
    /// A countdown is PENDING for this session (created now or earlier).
    Pending(CountdownView),
    /// The session is closed or unknown; the client should stop sending
    /// heartbeats and refetch session state.
    SessionClosed,
}

/// Maximum countdowns resolved per sweep pass.
pub const SWEEP_BATCH_SIZE: u64 = 100;
