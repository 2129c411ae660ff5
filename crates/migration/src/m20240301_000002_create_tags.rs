//! Create `tags` table.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Tags::Table)
                    .if_not_exists()
                    .col(uuid(Tags::Id).primary_key().default(Expr::cust("gen_random_uuid()")))
                    .col(string_len(Tags::Name, 100).unique_key())
                    .col(timestamp_with_time_zone(Tags::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(Tags::UpdatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone_null(Tags::DeletedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_tags_deleted_at")
                    .table(Tags::Table)
                    .col(Tags::DeletedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Tags::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Tags { Table, Id, Name, CreatedAt, UpdatedAt, DeletedAt }
