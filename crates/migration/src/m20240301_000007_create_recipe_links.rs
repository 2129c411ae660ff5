//! Create the join tables linking recipes to metadata.
use sea_orm_migration::{prelude::*, schema::*};

/// (table, metadata column, at most one link per recipe)
const LINKS: [(&str, &str, bool); 5] = [
    ("recipe_categories", "category_id", false),
    ("recipe_tags", "tag_id", false),
    ("recipe_cuisine_types", "cuisine_type_id", false),
    ("recipe_difficulty_levels", "difficulty_level_id", true),
    ("recipe_preparation_times", "preparation_time_id", true),
];

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (table, target, single) in LINKS {
            manager
                .create_table(
                    Table::create()
                        .table(Alias::new(table))
                        .if_not_exists()
                        .col(uuid(Alias::new("recipe_id")))
                        .col(uuid(Alias::new(target)))
                        .col(timestamp_with_time_zone(Alias::new("created_at")).default(Expr::current_timestamp()))
                        .col(timestamp_with_time_zone_null(Alias::new("deleted_at")))
                        .primary_key(Index::create().col(Alias::new("recipe_id")).col(Alias::new(target)))
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name(format!("idx_{table}_deleted_at"))
                        .table(Alias::new(table))
                        .col(Alias::new("deleted_at"))
                        .to_owned(),
                )
                .await?;

            if single {
                manager
                    .create_index(
                        Index::create()
                            .if_not_exists()
                            .unique()
                            .name(format!("idx_{table}_recipe_id"))
                            .table(Alias::new(table))
                            .col(Alias::new("recipe_id"))
                            .to_owned(),
                    )
                    .await?;
            }
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (table, _, _) in LINKS {
            manager.drop_table(Table::drop().table(Alias::new(table)).to_owned()).await?;
        }
        Ok(())
    }
}
