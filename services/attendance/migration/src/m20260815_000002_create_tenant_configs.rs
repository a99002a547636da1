use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TenantConfigs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TenantConfigs::TenantId)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(TenantConfigs::CountdownSecs)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TenantConfigs::MaxAccuracyM)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TenantConfigs::StalenessSecs)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TenantConfigs::Enabled)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TenantConfigs::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum TenantConfigs {
    Table,
    TenantId,
    CountdownSecs,
    MaxAccuracyM,
    StalenessSecs,
    Enabled,
}
