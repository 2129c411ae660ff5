//! Coarse recipe groupings such as breakfast or dessert.
crate::metadata_resource! {
    marker: Category,
    dto: CategoryDto,
    patch: CategoryPatch,
    table: "categories",
    name: "category",
    plural: "categories",
    path: "category",
    field: name: String = [unique],
    wire: "name",
    check: crate::metadata::check_name,
}
