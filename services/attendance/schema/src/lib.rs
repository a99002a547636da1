//! sea-orm entities for the attendance service.

pub mod branches;
pub mod heartbeat_log;
pub mod pending_countdowns;
pub mod sessions;
pub mod tenant_configs;
