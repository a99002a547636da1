use anyhow::Context as _;
use chrono::{DateTime, Duration, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, SqlErr, TransactionTrait, sea_query::Expr,
};
use uuid::Uuid;

use presenza_attendance_schema::{branches, heartbeat_log, pending_countdowns, sessions, tenant_configs};
use presenza_domain::geo::{GeoPoint, Geofence};
use presenza_domain::id::{BranchId, CountdownId, EmployeeId, SessionId, TenantId};

use crate::domain::repository::{
    BranchPort, CountdownRepository, CreateOutcome, ExecuteOutcome, HeartbeatAuditPort,
    SessionRepository, TenantConfigPort,
};
use crate::domain::types::{
    AttendanceSession, CancelReason, CloseType, CountdownStatus, HeartbeatSample,
    PendingCountdown, TenantSettings, ViolationReason,
};
use crate::error::AttendanceServiceError;

// ── Session repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbSessionRepository {
    pub db: DatabaseConnection,
}

impl SessionRepository for DbSessionRepository {
    async fn find_by_id(
        &self,
        id: SessionId,
    ) -> Result<Option<AttendanceSession>, AttendanceServiceError> {
        let model = sessions::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find session by id")?;
        model.map(session_from_model).transpose()
    }

    async fn create(
        &self,
        session: &AttendanceSession,
    ) -> Result<bool, AttendanceServiceError> {
        let result = sessions::ActiveModel {
            id: Set(session.id.0),
            tenant_id: Set(session.tenant_id.0),
            employee_id: Set(session.employee_id.0),
            branch_id: Set(session.branch_id.0),
            opened_at: Set(session.opened_at),
            closed_at: Set(None),
            close_type: Set(None),
            close_reason: Set(None),
        }
        .insert(&self.db)
        .await;
        match result {
            Ok(_) => Ok(true),
            // uq_sessions_open_employee: the employee already has an open session.
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Ok(false)
            }
            Err(e) => Err(anyhow::Error::from(e).context("create session").into()),
        }
    }

    async fn close_if_open(
        &self,
        id: SessionId,
        close_type: CloseType,
        close_reason: Option<ViolationReason>,
        at: DateTime<Utc>,
    ) -> Result<bool, AttendanceServiceError> {
        let result = sessions::Entity::update_many()
            .col_expr(sessions::Column::ClosedAt, Expr::value(Some(at)))
            .col_expr(
                sessions::Column::CloseType,
                Expr::value(Some(close_type.as_str().to_owned())),
            )
            .col_expr(
                sessions::Column::CloseReason,
                Expr::value(close_reason.map(|r| r.as_str().to_owned())),
            )
            .filter(sessions::Column::Id.eq(id.0))
            .filter(sessions::Column::ClosedAt.is_null())
            .exec(&self.db)
            .await
            .context("close session if open")?;
        Ok(result.rows_affected > 0)
    }
}

// ── Countdown repository ──────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbCountdownRepository {
    pub db: DatabaseConnection,
}

impl CountdownRepository for DbCountdownRepository {
    async fn create_if_absent(
        &self,
        countdown: &PendingCountdown,
    ) -> Result<CreateOutcome, AttendanceServiceError> {
        let result = pending_countdowns::ActiveModel {
            id: Set(countdown.id.0),
            tenant_id: Set(countdown.tenant_id.0),
            employee_id: Set(countdown.employee_id.0),
            session_id: Set(countdown.session_id.0),
            reason: Set(countdown.reason.as_str().to_owned()),
            started_at: Set(countdown.started_at),
            ends_at: Set(countdown.ends_at),
            status: Set(CountdownStatus::Pending.as_str().to_owned()),
            cancel_reason: Set(None),
            created_at: Set(countdown.created_at),
        }
        .insert(&self.db)
        .await;

        match result {
            Ok(model) => Ok(CreateOutcome::Created(countdown_from_model(model)?)),
            // uq_pending_countdowns_session: a concurrent heartbeat won the
            // insert. Adopt the winner's row; if it resolved in the meantime,
            // report transient so the client retries on the next tick.
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                let winner = self
                    .find_pending_by_session(countdown.session_id)
                    .await?
                    .ok_or_else(|| {
                        AttendanceServiceError::Storage(anyhow::anyhow!(
                            "pending countdown for session {} resolved mid-create",
                            countdown.session_id
                        ))
                    })?;
                Ok(CreateOutcome::AlreadyPending(winner))
            }
            Err(e) => Err(anyhow::Error::from(e)
                .context("create pending countdown")
                .into()),
        }
    }

    async fn find_pending_by_session(
        &self,
        session_id: SessionId,
    ) -> Result<Option<PendingCountdown>, AttendanceServiceError> {
        let model = pending_countdowns::Entity::find()
            .filter(pending_countdowns::Column::SessionId.eq(session_id.0))
            .filter(pending_countdowns::Column::Status.eq(CountdownStatus::Pending.as_str()))
            .one(&self.db)
            .await
            .context("find pending countdown by session")?;
        model.map(countdown_from_model).transpose()
    }

    async fn cancel_pending(
        &self,
        id: CountdownId,
        reason: CancelReason,
    ) -> Result<bool, AttendanceServiceError> {
        let result = pending_countdowns::Entity::update_many()
            .col_expr(
                pending_countdowns::Column::Status,
                Expr::value(CountdownStatus::Cancelled.as_str()),
            )
            .col_expr(
                pending_countdowns::Column::CancelReason,
                Expr::value(Some(reason.as_str().to_owned())),
            )
            .filter(pending_countdowns::Column::Id.eq(id.0))
            .filter(pending_countdowns::Column::Status.eq(CountdownStatus::Pending.as_str()))
            .exec(&self.db)
            .await
            .context("cancel pending countdown")?;
        Ok(result.rows_affected > 0)
    }

    async fn find_expired_pending(
        &self,
        now: DateTime<Utc>,
        limit: u64,
    ) -> Result<Vec<PendingCountdown>, AttendanceServiceError> {
        let models = pending_countdowns::Entity::find()
            .filter(pending_countdowns::Column::Status.eq(CountdownStatus::Pending.as_str()))
            .filter(pending_countdowns::Column::EndsAt.lte(now))
            .order_by_asc(pending_countdowns::Column::EndsAt)
            .limit(limit)
            .all(&self.db)
            .await
            .context("find expired pending countdowns")?;
        models.into_iter().map(countdown_from_model).collect()
    }

    async fn execute_expired(
        &self,
        id: CountdownId,
        now: DateTime<Utc>,
    ) -> Result<ExecuteOutcome, AttendanceServiceError> {
        let outcome = self
            .db
            .transaction::<_, ExecuteOutcome, sea_orm::DbErr>(|txn| {
                Box::pin(async move {
                    // Claim the countdown first. A recovering heartbeat or a
                    // concurrent executor that got here before us makes this a
                    // no-op, and we must not touch the session.
                    let claimed = pending_countdowns::Entity::update_many()
                        .col_expr(
                            pending_countdowns::Column::Status,
                            Expr::value(CountdownStatus::Executed.as_str()),
                        )
                        .filter(pending_countdowns::Column::Id.eq(id.0))
                        .filter(
                            pending_countdowns::Column::Status
                                .eq(CountdownStatus::Pending.as_str()),
                        )
                        .exec(txn)
                        .await?;
                    if claimed.rows_affected == 0 {
                        return Ok(ExecuteOutcome::AlreadyHandled);
                    }

                    let countdown = pending_countdowns::Entity::find_by_id(id.0)
                        .one(txn)
                        .await?
                        .ok_or_else(|| {
                            sea_orm::DbErr::RecordNotFound(format!(
                                "countdown {} disappeared mid-transaction",
                                id.0
                            ))
                        })?;

                    let closed = sessions::Entity::update_many()
                        .col_expr(sessions::Column::ClosedAt, Expr::value(Some(now)))
                        .col_expr(
                            sessions::Column::CloseType,
                            Expr::value(Some(CloseType::Auto.as_str().to_owned())),
                        )
                        .col_expr(
                            sessions::Column::CloseReason,
                            Expr::value(Some(countdown.reason.clone())),
                        )
                        .filter(sessions::Column::Id.eq(countdown.session_id))
                        .filter(sessions::Column::ClosedAt.is_null())
                        .exec(txn)
                        .await?;

                    if closed.rows_affected == 0 {
                        // Manual checkout won the close. Record the countdown
                        // as cancelled instead; MANUAL is never overwritten.
                        pending_countdowns::Entity::update_many()
                            .col_expr(
                                pending_countdowns::Column::Status,
                                Expr::value(CountdownStatus::Cancelled.as_str()),
                            )
                            .col_expr(
                                pending_countdowns::Column::CancelReason,
                                Expr::value(Some(CancelReason::ManualRace.as_str().to_owned())),
                            )
                            .filter(pending_countdowns::Column::Id.eq(id.0))
                            .exec(txn)
                            .await?;
                        return Ok(ExecuteOutcome::AlreadyHandled);
                    }

                    Ok(ExecuteOutcome::Executed)
                })
            })
            .await
            .context("execute expired countdown")?;
        Ok(outcome)
    }
}

// ── Read-only collaborator ports ──────────────────────────────────────────────

#[derive(Clone)]
pub struct DbTenantConfigPort {
    pub db: DatabaseConnection,
}

impl TenantConfigPort for DbTenantConfigPort {
    async fn settings(
        &self,
        tenant_id: TenantId,
    ) -> Result<Option<TenantSettings>, AttendanceServiceError> {
        let model = tenant_configs::Entity::find_by_id(tenant_id.0)
            .one(&self.db)
            .await
            .context("find tenant config")?;
        Ok(model.map(|m| TenantSettings {
            countdown: Duration::seconds(m.countdown_secs),
            max_accuracy_m: m.max_accuracy_m,
            staleness: Duration::seconds(m.staleness_secs),
            enabled: m.enabled,
        }))
    }
}

#[derive(Clone)]
pub struct DbBranchPort {
    pub db: DatabaseConnection,
}

impl BranchPort for DbBranchPort {
    async fn geofence(
        &self,
        branch_id: BranchId,
    ) -> Result<Option<Geofence>, AttendanceServiceError> {
        let model = branches::Entity::find_by_id(branch_id.0)
            .one(&self.db)
            .await
            .context("find branch geofence")?;
        Ok(model.map(|m| Geofence {
            center: GeoPoint::new(m.latitude, m.longitude),
            radius_m: m.radius_m,
        }))
    }
}

#[derive(Clone)]
pub struct DbHeartbeatAuditPort {
    pub db: DatabaseConnection,
}

impl HeartbeatAuditPort for DbHeartbeatAuditPort {
    async fn record(&self, sample: &HeartbeatSample) -> Result<(), AttendanceServiceError> {
        heartbeat_log::ActiveModel {
            id: Set(Uuid::new_v4()),
            tenant_id: Set(sample.tenant_id.0),
            employee_id: Set(sample.employee_id.0),
            session_id: Set(sample.session_id.0),
            observed_at: Set(sample.observed_at),
            received_at: Set(sample.received_at),
            latitude: Set(sample.latitude),
            longitude: Set(sample.longitude),
            accuracy_m: Set(sample.accuracy_m),
            permission_state: Set(sample.permission_state.as_str().to_owned()),
            classification: Set(sample.classification.as_str().to_owned()),
            created_at: Set(sample.received_at),
        }
        .insert(&self.db)
        .await
        .context("record heartbeat audit")?;
        Ok(())
    }
}

// ── Model ↔ domain converters ─────────────────────────────────────────────────

fn session_from_model(
    model: sessions::Model,
) -> Result<AttendanceSession, AttendanceServiceError> {
    let close_type = model
        .close_type
        .as_deref()
        .map(|s| {
            CloseType::parse(s).ok_or_else(|| unknown_text("close_type", s, model.id))
        })
        .transpose()?;
    let close_reason = model
        .close_reason
        .as_deref()
        .map(|s| {
            ViolationReason::parse(s).ok_or_else(|| unknown_text("close_reason", s, model.id))
        })
        .transpose()?;
    Ok(AttendanceSession {
        id: SessionId(model.id),
        tenant_id: TenantId(model.tenant_id),
        employee_id: EmployeeId(model.employee_id),
        branch_id: BranchId(model.branch_id),
        opened_at: model.opened_at,
        closed_at: model.closed_at,
        close_type,
        close_reason,
    })
}

fn countdown_from_model(
    model: pending_countdowns::Model,
) -> Result<PendingCountdown, AttendanceServiceError> {
    let reason = ViolationReason::parse(&model.reason)
        .ok_or_else(|| unknown_text("reason", &model.reason, model.id))?;
    let status = CountdownStatus::parse(&model.status)
        .ok_or_else(|| unknown_text("status", &model.status, model.id))?;
    let cancel_reason = model
        .cancel_reason
        .as_deref()
        .map(|s| {
            CancelReason::parse(s).ok_or_else(|| unknown_text("cancel_reason", s, model.id))
        })
        .transpose()?;
    Ok(PendingCountdown {
        id: CountdownId(model.id),
        tenant_id: TenantId(model.tenant_id),
        employee_id: EmployeeId(model.employee_id),
        session_id: SessionId(model.session_id),
        reason,
        started_at: model.started_at,
        ends_at: model.ends_at,
        status,
        cancel_reason,
        created_at: model.created_at,
    })
}

fn unknown_text(column: &str, value: &str, row_id: Uuid) -> AttendanceServiceError {
    AttendanceServiceError::Internal(anyhow::anyhow!(
        "unknown {column} {value:?} on row {row_id}"
    ))
}
