//! Single-value metadata resources: an id, one client-owned value column and
//! the audit columns. Each resource module is one [`metadata_resource!`] call.
use crate::errors::ModelError;
use crate::resource::{self, present};

pub const MAX_NAME_CHARS: usize = 100;

/// Value column types a metadata resource can carry.
pub trait MetadataValue: Clone + Sized {
    /// The patch value to apply; `None` keeps the stored one.
    fn provided(patch: Option<Self>) -> Option<Self>;
}

impl MetadataValue for String {
    fn provided(patch: Option<String>) -> Option<String> {
        present(patch)
    }
}

impl MetadataValue for i32 {
    fn provided(patch: Option<i32>) -> Option<i32> {
        patch
    }
}

/// Names are required, non-blank and at most [`MAX_NAME_CHARS`] characters.
pub fn check_name(name: &str) -> Result<(), ModelError> {
    resource::require_text("name", name)?;
    resource::max_chars("name", name, MAX_NAME_CHARS)
}

pub(crate) fn check_range(field: &str, value: i32, min: i32, max: i32) -> Result<(), ModelError> {
    if value < min || value > max {
        return Err(ModelError::Validation(format!("{field} must be between {min} and {max}")));
    }
    Ok(())
}

/// Expands to the sea-orm entity, wire DTO, patch DTO and [`Resource`]
/// impl of a single-value metadata resource.
///
/// [`Resource`]: crate::resource::Resource
#[macro_export]
macro_rules! metadata_resource {
    (
        marker: $marker:ident,
        dto: $dto:ident,
        patch: $patch:ident,
        table: $table:tt,
        name: $name:tt,
        plural: $plural:tt,
        path: $path:tt,
        field: $field:ident: $ty:ident = [$($column:tt)*],
        wire: $wire:tt $(| $alias:tt)*,
        check: $check:path $(,)?
    ) => {
        use sea_orm::entity::prelude::*;
        use serde::{Deserialize, Serialize};

        use $crate::errors::ModelError;
        use $crate::metadata::MetadataValue;
        use $crate::resource::{self, Resource};

        #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
        #[sea_orm(table_name = $table)]
        pub struct Model {
            #[sea_orm(primary_key, auto_increment = false)]
            pub id: Uuid,
            #[sea_orm($($column)*)]
            pub $field: $ty,
            pub created_at: DateTimeWithTimeZone,
            pub updated_at: DateTimeWithTimeZone,
            pub deleted_at: Option<DateTimeWithTimeZone>,
        }

        #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
        pub enum Relation {}

        impl ActiveModelBehavior for ActiveModel {}

        #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
        pub struct $dto {
            #[serde(default)]
            pub id: Uuid,
            #[serde(default, rename = $wire $(, alias = $alias)*)]
            pub $field: $ty,
        }

        #[derive(Clone, Debug, Default, Deserialize)]
        pub struct $patch {
            #[serde(default, rename = $wire $(, alias = $alias)*)]
            pub $field: Option<$ty>,
        }

        impl From<Model> for $dto {
            fn from(m: Model) -> Self {
                Self { id: m.id, $field: m.$field }
            }
        }

        pub struct $marker;

        impl Resource for $marker {
            type Entity = Entity;
            type Model = Model;
            type ActiveModel = ActiveModel;
            type Dto = $dto;
            type Patch = $patch;

            const NAME: &'static str = $name;
            const PLURAL: &'static str = $plural;
            const PATH: &'static str = $path;

            fn id_column() -> Column { Column::Id }
            fn created_at_column() -> Column { Column::CreatedAt }
            fn updated_at_column() -> Column { Column::UpdatedAt }
            fn deleted_at_column() -> Column { Column::DeletedAt }

            fn id_of(model: &Model) -> Uuid { model.id }

            fn from_dto(dto: $dto) -> Model {
                let now: DateTimeWithTimeZone = ::chrono::Utc::now().into();
                Model { id: dto.id, $field: dto.$field, created_at: now, updated_at: now, deleted_at: None }
            }

            fn merge(stored: &Model, patch: $patch) -> Model {
                Model {
                    $field: <$ty as MetadataValue>::provided(patch.$field)
                        .unwrap_or_else(|| stored.$field.clone()),
                    ..stored.clone()
                }
            }

            fn validate_new(dto: &$dto) -> Result<(), ModelError> {
                resource::require_nil_id(dto.id)?;
                $check(&dto.$field)
            }

            fn validate_patch(patch: &$patch) -> Result<(), ModelError> {
                match <$ty as MetadataValue>::provided(patch.$field.clone()) {
                    Some(value) => $check(&value),
                    None => Ok(()),
                }
            }
        }
    };
}
