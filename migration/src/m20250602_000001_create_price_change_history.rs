use sea_orm_migration::prelude::*;

use super::m20250601_000002_create_products::Products;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Append-only: one row per price interval removed from a timeline
        manager
            .create_table(
                Table::create()
                    .table(PriceChangeHistory::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PriceChangeHistory::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PriceChangeHistory::ProductId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PriceChangeHistory::OldPrice)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PriceChangeHistory::StartDate)
                            .date()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PriceChangeHistory::EndDate).date().null())
                    .col(
                        ColumnDef::new(PriceChangeHistory::ChangedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(SimpleExpr::Keyword(Keyword::CurrentTimestamp)),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_price_change_history_product")
                            .from(PriceChangeHistory::Table, PriceChangeHistory::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_price_change_history_product_time")
                    .table(PriceChangeHistory::Table)
                    .col(PriceChangeHistory::ProductId)
                    .col((PriceChangeHistory::ChangedAt, IndexOrder::Desc))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PriceChangeHistory::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum PriceChangeHistory {
    Table,
    Id,
    ProductId,
    OldPrice,
    StartDate,
    EndDate,
    ChangedAt,
}
