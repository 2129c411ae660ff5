//! Create `difficulty_levels` table.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DifficultyLevels::Table)
                    .if_not_exists()
                    .col(uuid(DifficultyLevels::Id).primary_key().default(Expr::cust("gen_random_uuid()")))
                    .col(integer(DifficultyLevels::Level).unique_key())
                    .col(timestamp_with_time_zone(DifficultyLevels::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(DifficultyLevels::UpdatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone_null(DifficultyLevels::DeletedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_difficulty_levels_deleted_at")
                    .table(DifficultyLevels::Table)
                    .col(DifficultyLevels::DeletedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(DifficultyLevels::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum DifficultyLevels { Table, Id, Level, CreatedAt, UpdatedAt, DeletedAt }
