use chrono::Utc;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::resource::{self, present, Resource};

pub const MAX_DESCRIPTION_BYTES: usize = 65_535;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "recipes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub serving_count: i32,
    pub difficulty_level: i32,
    pub cooking_time: i32,
    pub author_id: String,
    pub image_name: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub deleted_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipeDto {
    #[serde(default)]
    pub id: Uuid,
    #[serde(default, alias = "RecipeName")]
    pub name: String,
    #[serde(default, alias = "Description")]
    pub description: String,
    #[serde(default, rename = "servingcount", alias = "ServingCount")]
    pub serving_count: i32,
    #[serde(default, rename = "difficultylevel", alias = "DifficultyLevel")]
    pub difficulty_level: i32,
    /// Minutes.
    #[serde(default, rename = "cooktime", alias = "CookTime")]
    pub cooking_time: i32,
    #[serde(default, alias = "Author")]
    pub author: String,
    #[serde(default, rename = "imagename", alias = "ImageName")]
    pub image_name: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct RecipePatch {
    #[serde(default, alias = "RecipeName")]
    pub name: Option<String>,
    #[serde(default, alias = "Description")]
    pub description: Option<String>,
    #[serde(default, rename = "servingcount", alias = "ServingCount")]
    pub serving_count: Option<i32>,
    #[serde(default, rename = "difficultylevel", alias = "DifficultyLevel")]
    pub difficulty_level: Option<i32>,
    #[serde(default, rename = "cooktime", alias = "CookTime")]
    pub cooking_time: Option<i32>,
    /// Accepted on the wire but never applied.
    #[serde(default, alias = "Author")]
    pub author: Option<String>,
    /// Accepted on the wire but never applied.
    #[serde(default, rename = "imagename", alias = "ImageName")]
    pub image_name: Option<String>,
}

impl From<Model> for RecipeDto {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            description: m.description,
            serving_count: m.serving_count,
            difficulty_level: m.difficulty_level,
            cooking_time: m.cooking_time,
            author: m.author_id,
            image_name: m.image_name,
        }
    }
}

pub struct Recipe;

impl Resource for Recipe {
    type Entity = Entity;
    type Model = Model;
    type ActiveModel = ActiveModel;
    type Dto = RecipeDto;
    type Patch = RecipePatch;

    const NAME: &'static str = "recipe";
    const PLURAL: &'static str = "recipes";
    const PATH: &'static str = "recipes";
    const SERVER_OWNED: &'static [&'static str] = &["author_id", "image_name"];

    fn id_column() -> Column { Column::Id }
    fn created_at_column() -> Column { Column::CreatedAt }
    fn updated_at_column() -> Column { Column::UpdatedAt }
    fn deleted_at_column() -> Column { Column::DeletedAt }

    fn id_of(model: &Model) -> Uuid { model.id }

    fn from_dto(dto: RecipeDto) -> Model {
        let now: DateTimeWithTimeZone = Utc::now().into();
        Model {
            id: dto.id,
            name: dto.name,
            description: dto.description,
            serving_count: dto.serving_count,
            difficulty_level: dto.difficulty_level,
            cooking_time: dto.cooking_time,
            author_id: dto.author,
            image_name: dto.image_name,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    fn merge(stored: &Model, patch: RecipePatch) -> Model {
        Model {
            name: present(patch.name).unwrap_or_else(|| stored.name.clone()),
            description: present(patch.description).unwrap_or_else(|| stored.description.clone()),
            serving_count: patch.serving_count.unwrap_or(stored.serving_count),
            difficulty_level: patch.difficulty_level.unwrap_or(stored.difficulty_level),
            cooking_time: patch.cooking_time.unwrap_or(stored.cooking_time),
            ..stored.clone()
        }
    }

    fn validate_new(dto: &RecipeDto) -> Result<(), ModelError> {
        resource::require_nil_id(dto.id)?;
        resource::require_text("name", &dto.name)?;
        resource::require_text("description", &dto.description)?;
        validate_description(&dto.description)?;
        resource::non_negative("servingcount", dto.serving_count)?;
        resource::non_negative("difficultylevel", dto.difficulty_level)?;
        resource::non_negative("cooktime", dto.cooking_time)
    }

    fn validate_patch(patch: &RecipePatch) -> Result<(), ModelError> {
        // empty means "keep"; whitespace-only would store a blank value
        if let Some(name) = present(patch.name.clone()) {
            resource::require_text("name", &name)?;
        }
        if let Some(description) = present(patch.description.clone()) {
            resource::require_text("description", &description)?;
            validate_description(&description)?;
        }
        for (field, value) in [
            ("servingcount", patch.serving_count),
            ("difficultylevel", patch.difficulty_level),
            ("cooktime", patch.cooking_time),
        ] {
            if let Some(v) = value {
                resource::non_negative(field, v)?;
            }
        }
        Ok(())
    }

    fn stamp_author(dto: &mut RecipeDto, user_id: &str) {
        dto.author = user_id.to_string();
    }
}

fn validate_description(description: &str) -> Result<(), ModelError> {
    if description.len() > MAX_DESCRIPTION_BYTES {
        return Err(ModelError::Validation(format!(
            "description must be at most {MAX_DESCRIPTION_BYTES} bytes"
        )));
    }
    Ok(())
}
