use serde_json::json;
use uuid::Uuid;

use crate::category::{Category, CategoryDto};
use crate::difficulty_level::DifficultyLevelDto;
use crate::preparation_time::{PreparationTimeDto, PreparationTimePatch};
use crate::recipe::{Recipe, RecipeDto};
use crate::resource::{to_dtos, Resource};
use crate::tag::{Tag, TagDto};

fn sample_recipe() -> RecipeDto {
    RecipeDto {
        id: Uuid::new_v4(),
        name: "apple pie".into(),
        description: "pie with apples".into(),
        serving_count: 4,
        difficulty_level: 2,
        cooking_time: 45,
        author: "user-1".into(),
        image_name: "pie.png".into(),
    }
}

#[test]
fn recipe_round_trip_is_lossless() {
    let dto = sample_recipe();
    let back = RecipeDto::from(Recipe::from_dto(dto.clone()));
    assert_eq!(back, dto);
    let again = RecipeDto::from(Recipe::from_dto(back.clone()));
    assert_eq!(again, back);
}

#[test]
fn tag_and_category_round_trip() {
    let tag = TagDto { id: Uuid::new_v4(), name: "vegan".into() };
    assert_eq!(TagDto::from(Tag::from_dto(tag.clone())), tag);
    let cat = CategoryDto { id: Uuid::new_v4(), name: "dessert".into() };
    assert_eq!(CategoryDto::from(Category::from_dto(cat.clone())), cat);
}

#[test]
fn from_dto_leaves_row_live() {
    let model = Recipe::from_dto(sample_recipe());
    assert!(model.deleted_at.is_none());
}

#[test]
fn recipe_wire_keys() {
    let value = serde_json::to_value(sample_recipe()).unwrap();
    let obj = value.as_object().unwrap();
    for key in ["id", "name", "description", "servingcount", "difficultylevel", "cooktime", "author", "imagename"] {
        assert!(obj.contains_key(key), "missing {key}");
    }
    assert!(!obj.contains_key("created_at"));
    assert!(!obj.contains_key("deleted_at"));
}

#[test]
fn recipe_body_without_id_defaults_to_nil() {
    let dto: RecipeDto = serde_json::from_value(json!({
        "name": "apple pie",
        "description": "pie with apples",
        "servingcount": 4
    }))
    .unwrap();
    assert!(dto.id.is_nil());
    assert_eq!(dto.serving_count, 4);
    assert_eq!(dto.cooking_time, 0);
}

#[test]
fn legacy_recipe_keys_are_accepted() {
    let dto: RecipeDto = serde_json::from_value(json!({
        "RecipeName": "soup",
        "Description": "hot",
        "ServingCount": 2,
        "CookTime": 30
    }))
    .unwrap();
    assert_eq!(dto.name, "soup");
    assert_eq!(dto.serving_count, 2);
    assert_eq!(dto.cooking_time, 30);
}

#[test]
fn collections_convert_element_wise() {
    let models = vec![
        Tag::from_dto(TagDto { id: Uuid::new_v4(), name: "a".into() }),
        Tag::from_dto(TagDto { id: Uuid::new_v4(), name: "b".into() }),
    ];
    let dtos = to_dtos::<Tag>(models.clone());
    assert_eq!(dtos.len(), 2);
    assert_eq!(dtos[0].id, models[0].id);
    assert_eq!(dtos[1].name, "b");
}

#[test]
fn numeric_metadata_wire_keys() {
    let level: DifficultyLevelDto = serde_json::from_value(json!({"name": 4})).unwrap();
    assert_eq!(level.level, 4);
    assert_eq!(serde_json::to_value(&level).unwrap(), json!({"id": Uuid::nil(), "level": 4}));

    let time: PreparationTimeDto = serde_json::from_value(json!({"duration": 30})).unwrap();
    assert_eq!(time.duration, 30);
    let patch: PreparationTimePatch = serde_json::from_value(json!({})).unwrap();
    assert_eq!(patch.duration, None);
}
