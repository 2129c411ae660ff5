//! Regional cuisines, e.g. italian or thai.
crate::metadata_resource! {
    marker: CuisineType,
    dto: CuisineTypeDto,
    patch: CuisineTypePatch,
    table: "cuisine_types",
    name: "cuisine type",
    plural: "cuisine types",
    path: "cuisine-type",
    field: name: String = [unique],
    wire: "name",
    check: crate::metadata::check_name,
}
