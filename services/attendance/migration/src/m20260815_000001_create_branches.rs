use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Branches::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Branches::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Branches::TenantId).uuid().not_null())
                    .col(ColumnDef::new(Branches::Latitude).double().not_null())
                    .col(ColumnDef::new(Branches::Longitude).double().not_null())
                    .col(ColumnDef::new(Branches::RadiusM).double().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(Branches::Table)
                    .col(Branches::TenantId)
                    .name("idx_branches_tenant_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Branches::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Branches {
    Table,
    Id,
    TenantId,
    Latitude,
    Longitude,
    RadiusM,
}
