use sea_orm::entity::prelude::*;

/// Best-effort audit trail of location samples. Insert-only; a failed write
/// never fails heartbeat ingestion, and nothing reads this table for
/// correctness decisions.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "heartbeat_log")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub employee_id: Uuid,
    pub session_id: Uuid,
    /// Client-claimed sample time; not trusted for countdown arithmetic.
    pub observed_at: Option<chrono::DateTime<chrono::Utc>>,
    /// Server receipt time (authoritative).
    pub received_at: chrono::DateTime<chrono::Utc>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub accuracy_m: Option<f64>,
    /// "granted" | "denied" | "prompt".
    pub permission_state: String,
    /// "OK" | "LOCATION_DISABLED" | "OUT_OF_BRANCH".
    pub classification: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
