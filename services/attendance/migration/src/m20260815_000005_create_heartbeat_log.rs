use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(HeartbeatLog::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(HeartbeatLog::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(HeartbeatLog::TenantId).uuid().not_null())
                    .col(ColumnDef::new(HeartbeatLog::EmployeeId).uuid().not_null())
                    .col(ColumnDef::new(HeartbeatLog::SessionId).uuid().not_null())
                    .col(ColumnDef::new(HeartbeatLog::ObservedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(HeartbeatLog::ReceivedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(HeartbeatLog::Latitude).double())
                    .col(ColumnDef::new(HeartbeatLog::Longitude).double())
                    .col(ColumnDef::new(HeartbeatLog::AccuracyM).double())
                    .col(
                        ColumnDef::new(HeartbeatLog::PermissionState)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(HeartbeatLog::Classification)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(HeartbeatLog::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(HeartbeatLog::Table)
                    .col(HeartbeatLog::SessionId)
                    .col(HeartbeatLog::ReceivedAt)
                    .name("idx_heartbeat_log_session_received")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(HeartbeatLog::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum HeartbeatLog {
    Table,
    Id,
    TenantId,
    EmployeeId,
    SessionId,
    ObservedAt,
    ReceivedAt,
    Latitude,
    Longitude,
    AccuracyM,
    PermissionState,
    Classification,
    CreatedAt,
}
