use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Sessions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Sessions::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Sessions::TenantId).uuid().not_null())
                    .col(ColumnDef::new(Sessions::EmployeeId).uuid().not_null())
                    .col(ColumnDef::new(Sessions::BranchId).uuid().not_null())
                    .col(
                        ColumnDef::new(Sessions::OpenedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Sessions::ClosedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Sessions::CloseType).string())
                    .col(ColumnDef::new(Sessions::CloseReason).string())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Sessions::Table, Sessions::BranchId)
                            .to(Branches::Table, Branches::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(Sessions::Table)
                    .col(Sessions::TenantId)
                    .col(Sessions::EmployeeId)
                    .name("idx_sessions_tenant_employee")
                    .to_owned(),
            )
            .await?;

        // One open session per employee. sea-query's index builder has no
        // WHERE clause, so the partial unique index is raw SQL.
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX uq_sessions_open_employee \
                 ON sessions (employee_id) WHERE closed_at IS NULL",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Sessions::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Sessions {
    Table,
    Id,
    TenantId,
    EmployeeId,
    BranchId,
    OpenedAt,
    ClosedAt,
    CloseType,
    CloseReason,
}

#[derive(Iden)]
enum Branches {
    Table,
    Id,
}
