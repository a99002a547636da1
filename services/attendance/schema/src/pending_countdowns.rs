use sea_orm::entity::prelude::*;

/// Durable state of one auto-checkout countdown.
/// The partial unique index `uq_pending_countdowns_session` on (session_id)
/// WHERE status = 'PENDING' enforces at most one live countdown per session;
/// `ends_at` is written once at creation and never updated.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "pending_countdowns")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub employee_id: Uuid,
    pub session_id: Uuid,
    /// "LOCATION_DISABLED" | "OUT_OF_BRANCH".
    pub reason: String,
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub ends_at: chrono::DateTime<chrono::Utc>,
    /// "PENDING" | "CANCELLED" | "EXECUTED".
    pub status: String,
    /// "RECOVERED" | "MANUAL_RACE"; NULL unless status is CANCELLED.
    pub cancel_reason: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
