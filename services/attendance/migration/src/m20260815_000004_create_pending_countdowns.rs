use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PendingCountdowns::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PendingCountdowns::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PendingCountdowns::TenantId).uuid().not_null())
                    .col(
                        ColumnDef::new(PendingCountdowns::EmployeeId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PendingCountdowns::SessionId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PendingCountdowns::Reason).string().not_null())
                    .col(
                        ColumnDef::new(PendingCountdowns::StartedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PendingCountdowns::EndsAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PendingCountdowns::Status).string().not_null())
                    .col(ColumnDef::new(PendingCountdowns::CancelReason).string())
                    .col(
                        ColumnDef::new(PendingCountdowns::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(PendingCountdowns::Table, PendingCountdowns::SessionId)
                            .to(Sessions::Table, Sessions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(PendingCountdowns::Table)
                    .col(PendingCountdowns::Status)
                    .col(PendingCountdowns::EndsAt)
                    .name("idx_pending_countdowns_status_ends_at")
                    .to_owned(),
            )
            .await?;

        // At most one PENDING countdown per session, enforced by storage so
        // concurrent heartbeat workers cannot double-create. Partial unique
        // indexes need raw SQL (see sessions migration).
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX uq_pending_countdowns_session \
                 ON pending_countdowns (session_id) WHERE status = 'PENDING'",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PendingCountdowns::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum PendingCountdowns {
    Table,
    Id,
    TenantId,
    EmployeeId,
    SessionId,
    Reason,
    StartedAt,
    EndsAt,
    Status,
    CancelReason,
    CreatedAt,
}

#[derive(Iden)]
enum Sessions {
    Table,
    Id,
}
