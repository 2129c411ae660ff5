//! Create `preparation_times` table.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PreparationTimes::Table)
                    .if_not_exists()
                    .col(uuid(PreparationTimes::Id).primary_key().default(Expr::cust("gen_random_uuid()")))
                    .col(integer(PreparationTimes::Duration))
                    .col(timestamp_with_time_zone(PreparationTimes::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(PreparationTimes::UpdatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone_null(PreparationTimes::DeletedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_preparation_times_deleted_at")
                    .table(PreparationTimes::Table)
                    .col(PreparationTimes::DeletedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(PreparationTimes::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum PreparationTimes { Table, Id, Duration, CreatedAt, UpdatedAt, DeletedAt }
