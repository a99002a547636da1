use sea_orm::entity::prelude::*;

/// One clock-in period for an employee at a branch.
/// At most one row per employee may have `closed_at = NULL` (partial unique
/// index `uq_sessions_open_employee`); closed rows are immutable.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "sessions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub employee_id: Uuid,
    pub branch_id: Uuid,
    pub opened_at: chrono::DateTime<chrono::Utc>,
    pub closed_at: Option<chrono::DateTime<chrono::Utc>>,
    /// "MANUAL" | "AUTO"; NULL while open.
    pub close_type: Option<String>,
    /// "LOCATION_DISABLED" | "OUT_OF_BRANCH"; NULL while open or on manual close.
    pub close_reason: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
