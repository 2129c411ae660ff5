//! Difficulty scale from 1 (easy) to 5.
pub const MIN_LEVEL: i32 = 1;
pub const MAX_LEVEL: i32 = 5;

fn check_level(level: &i32) -> Result<(), crate::errors::ModelError> {
    crate::metadata::check_range("level", *level, MIN_LEVEL, MAX_LEVEL)
}

crate::metadata_resource! {
    marker: DifficultyLevel,
    dto: DifficultyLevelDto,
    patch: DifficultyLevelPatch,
    table: "difficulty_levels",
    name: "difficulty level",
    plural: "difficulty levels",
    path: "difficulty-level",
    field: level: i32 = [unique],
    wire: "level" | "name",
    check: check_level,
}
