pub mod countdown;
pub mod heartbeat;
pub mod recovery;
pub mod session;
pub mod sweep;
