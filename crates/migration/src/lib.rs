//! Schema for both services. Each service owns its tables and keeps its own
//! migration history table so the two can share one database.
pub use sea_orm_migration::prelude::*;

mod m20240301_000001_create_recipes;
mod m20240301_000002_create_tags;
mod m20240301_000003_create_categories;
mod m20240301_000004_create_cuisine_types;
mod m20240301_000005_create_difficulty_levels;
mod m20240301_000006_create_preparation_times;
mod m20240301_000007_create_recipe_links;

/// Tables served by the recipe service.
pub struct RecipeMigrator;

#[async_trait::async_trait]
impl MigratorTrait for RecipeMigrator {
    fn migration_table_name() -> DynIden {
        Alias::new("seaql_migrations_recipe").into_iden()
    }

    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20240301_000001_create_recipes::Migration)]
    }
}

/// Tables served by the metadata service.
pub struct MetadataMigrator;

#[async_trait::async_trait]
impl MigratorTrait for MetadataMigrator {
    fn migration_table_name() -> DynIden {
        Alias::new("seaql_migrations_metadata").into_iden()
    }

    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240301_000002_create_tags::Migration),
            Box::new(m20240301_000003_create_categories::Migration),
            Box::new(m20240301_000004_create_cuisine_types::Migration),
            Box::new(m20240301_000005_create_difficulty_levels::Migration),
            Box::new(m20240301_000006_create_preparation_times::Migration),
            Box::new(m20240301_000007_create_recipe_links::Migration),
        ]
    }
}
