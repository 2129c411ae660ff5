//! Create `recipes` table.
//!
//! `author_id` and `image_name` are written on insert only.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Recipes::Table)
                    .if_not_exists()
                    .col(uuid(Recipes::Id).primary_key().default(Expr::cust("gen_random_uuid()")))
                    .col(text(Recipes::Name))
                    .col(text(Recipes::Description))
                    .col(integer(Recipes::ServingCount).default(0))
                    .col(integer(Recipes::DifficultyLevel).default(0))
                    .col(integer(Recipes::CookingTime).default(0))
                    .col(string_len(Recipes::AuthorId, 255).default(""))
                    .col(string_len(Recipes::ImageName, 255).default(""))
                    .col(timestamp_with_time_zone(Recipes::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(Recipes::UpdatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone_null(Recipes::DeletedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_recipes_deleted_at")
                    .table(Recipes::Table)
                    .col(Recipes::DeletedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Recipes::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Recipes {
    Table,
    Id,
    Name,
    Description,
    ServingCount,
    DifficultyLevel,
    CookingTime,
    AuthorId,
    ImageName,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}
