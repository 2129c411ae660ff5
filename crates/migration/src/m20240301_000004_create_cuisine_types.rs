//! Create `cuisine_types` table.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CuisineTypes::Table)
                    .if_not_exists()
                    .col(uuid(CuisineTypes::Id).primary_key().default(Expr::cust("gen_random_uuid()")))
                    .col(string_len(CuisineTypes::Name, 100).unique_key())
                    .col(timestamp_with_time_zone(CuisineTypes::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(CuisineTypes::UpdatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone_null(CuisineTypes::DeletedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_cuisine_types_deleted_at")
                    .table(CuisineTypes::Table)
                    .col(CuisineTypes::DeletedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(CuisineTypes::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum CuisineTypes { Table, Id, Name, CreatedAt, UpdatedAt, DeletedAt }
