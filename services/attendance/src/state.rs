use sea_orm::DatabaseConnection;

use presenza_core::clock::SystemClock;

use crate::infra::db::{
    DbBranchPort, DbCountdownRepository, DbHeartbeatAuditPort, DbSessionRepository,
    DbTenantConfigPort,
};

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
}

impl AppState {
    pub fn session_repo(&self) -> DbSessionRepository {
        DbSessionRepository {
            db: self.db.clone(),
        }
    }

    pub fn countdown_repo(&self) -> DbCountdownRepository {
        DbCountdownRepository {
            db: self.db.clone(),
        }
    }

    pub fn tenant_config_port(&self) -> DbTenantConfigPort {
        DbTenantConfigPort {
            db: self.db.clone(),
        }
    }

    pub fn branch_port(&self) -> DbBranchPort {
        DbBranchPort {
            db: self.db.clone(),
        }
    }

    pub fn audit_port(&self) -> DbHeartbeatAuditPort {
        DbHeartbeatAuditPort {
            db: self.db.clone(),
        }
    }

    pub fn clock(&self) -> SystemClock {
        SystemClock
    }
}
