/// Attendance service configuration loaded from environment variables.
#[derive(Debug)]
pub struct AttendanceConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// TCP port to listen on (default 3170). Env var: `ATTENDANCE_PORT`.
    pub attendance_port: u16,
    /// Expiry sweep cadence in seconds (default 5). Env var: `SWEEP_INTERVAL_SECS`.
    pub sweep_interval_secs: u64,
}

impl AttendanceConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            attendance_port: std::env::var("ATTENDANCE_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3170),
            sweep_interval_secs: std::env::var("SWEEP_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
        }
    }
}
