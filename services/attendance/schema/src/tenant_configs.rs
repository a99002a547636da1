use sea_orm::entity::prelude::*;

/// Per-tenant reconciliation settings. Read-only to this service; provisioned
/// by the tenant management tooling.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "tenant_configs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub tenant_id: Uuid,
    /// Countdown duration in seconds (violation start to auto-checkout).
    pub countdown_secs: i64,
    /// Samples with worse reported accuracy never classify as out-of-branch.
    pub max_accuracy_m: f64,
    /// Samples older than this (server receipt minus client claim) count as
    /// location-disabled.
    pub staleness_secs: i64,
    /// Master switch for the auto-checkout engine.
    pub enabled: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
