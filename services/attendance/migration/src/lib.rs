pub use sea_orm_migration::prelude::*;

mod m20260815_000001_create_branches;
mod m20260815_000002_create_tenant_configs;
mod m20260815_000003_create_sessions;
mod m20260815_000004_create_pending_countdowns;
mod m20260815_000005_create_heartbeat_log;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260815_000001_create_branches::Migration),
            Box::new(m20260815_000002_create_tenant_configs::Migration),
            Box::new(m20260815_000003_create_sessions::Migration),
            Box::new(m20260815_000004_create_pending_countdowns::Migration),
            Box::new(m20260815_000005_create_heartbeat_log::Migration),
        ]
    }
}
