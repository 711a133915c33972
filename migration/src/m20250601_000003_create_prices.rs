use sea_orm_migration::prelude::*;

use super::m20250601_000002_create_products::Products;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Prices::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Prices::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Prices::ProductId).integer().not_null())
                    .col(ColumnDef::new(Prices::Price).decimal_len(10, 2).not_null())
                    .col(ColumnDef::new(Prices::StartDate).date().not_null())
                    // NULL end date = open-ended interval
                    .col(ColumnDef::new(Prices::EndDate).date().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_prices_product")
                            .from(Prices::Table, Prices::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Timeline lookups: (product_id, start_date)
        manager
            .create_index(
                Index::create()
                    .name("idx_prices_product_start")
                    .table(Prices::Table)
                    .col(Prices::ProductId)
                    .col(Prices::StartDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_prices_end_date")
                    .table(Prices::Table)
                    .col(Prices::EndDate)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Prices::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Prices {
    Table,
    Id,
    ProductId,
    Price,
    StartDate,
    EndDate,
}
