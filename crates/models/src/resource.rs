//! Describes one REST resource to the generic repository, service and handler layers.
use std::fmt::Debug;

use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, EntityTrait, FromQueryResult, IntoActiveModel, ModelTrait,
};
use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;

pub type ColumnOf<R> = <<R as Resource>::Entity as EntityTrait>::Column;

pub trait Resource: Send + Sync + 'static {
    type Entity: EntityTrait<Model = Self::Model, ActiveModel = Self::ActiveModel>;
    /// Persistence shape, carrying audit and soft-delete columns.
    type Model: ModelTrait<Entity = Self::Entity>
        + FromQueryResult
        + IntoActiveModel<Self::ActiveModel>
        + Clone
        + Debug
        + Send
        + Sync
        + 'static;
    type ActiveModel: ActiveModelTrait<Entity = Self::Entity>
        + ActiveModelBehavior
        + Send
        + Sync
        + 'static;
    /// Wire shape.
    type Dto: Serialize
        + DeserializeOwned
        + From<Self::Model>
        + Clone
        + Debug
        + PartialEq
        + Send
        + Sync
        + 'static;
    /// Update input; `None` keeps the stored value.
    type Patch: DeserializeOwned + Clone + Debug + Send + Sync + 'static;

    /// Singular name used in messages, e.g. `recipe not found`.
    const NAME: &'static str;
    /// Plural name used for collection messages.
    const PLURAL: &'static str;
    /// Path segment under `/api/v2`.
    const PATH: &'static str;
    /// Columns owned by the server; never written by an update.
    const SERVER_OWNED: &'static [&'static str] = &[];

    fn id_column() -> ColumnOf<Self>;
    fn created_at_column() -> ColumnOf<Self>;
    fn updated_at_column() -> ColumnOf<Self>;
    fn deleted_at_column() -> ColumnOf<Self>;

    fn id_of(model: &Self::Model) -> Uuid;

    fn from_dto(dto: Self::Dto) -> Self::Model;

    /// Overlay the present fields of `patch` on `stored`. Identity, audit
    /// timestamps and server-owned fields always come from `stored`.
    fn merge(stored: &Self::Model, patch: Self::Patch) -> Self::Model;

    fn validate_new(dto: &Self::Dto) -> Result<(), ModelError>;

    fn validate_patch(patch: &Self::Patch) -> Result<(), ModelError>;

    /// Record the creating principal on a new resource.
    fn stamp_author(_dto: &mut Self::Dto, _user_id: &str) {}
}

pub fn to_dtos<R: Resource>(models: Vec<R::Model>) -> Vec<R::Dto> {
    models.into_iter().map(R::Dto::from).collect()
}

/// Empty strings count as absent in a patch.
pub fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

pub(crate) fn require_nil_id(id: Uuid) -> Result<(), ModelError> {
    if id.is_nil() {
        Ok(())
    } else {
        Err(ModelError::Validation("existing id on new element is not allowed".into()))
    }
}

pub(crate) fn require_text(field: &str, value: &str) -> Result<(), ModelError> {
    if value.trim().is_empty() {
        return Err(ModelError::Validation(format!("{field} is required")));
    }
    Ok(())
}

pub(crate) fn max_chars(field: &str, value: &str, max: usize) -> Result<(), ModelError> {
    if value.chars().count() > max {
        return Err(ModelError::Validation(format!("{field} must be at most {max} characters")));
    }
    Ok(())
}

pub(crate) fn non_negative(field: &str, value: i32) -> Result<(), ModelError> {
    if value < 0 {
        return Err(ModelError::Validation(format!("{field} must not be negative")));
    }
    Ok(())
}
