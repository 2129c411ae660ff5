//! Preparation time buckets in minutes.
pub const MIN_MINUTES: i32 = 1;
pub const MAX_MINUTES: i32 = 100;

fn check_duration(minutes: &i32) -> Result<(), crate::errors::ModelError> {
    crate::metadata::check_range("duration", *minutes, MIN_MINUTES, MAX_MINUTES)
}

crate::metadata_resource! {
    marker: PreparationTime,
    dto: PreparationTimeDto,
    patch: PreparationTimePatch,
    table: "preparation_times",
    name: "preparation time",
    plural: "preparation times",
    path: "preparation-time",
    field: duration: i32 = [column_type = "Integer"],
    wire: "duration" | "name",
    check: check_duration,
}
