pub mod heartbeat;
pub mod session;
pub mod sweep;
