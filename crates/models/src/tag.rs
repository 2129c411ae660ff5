//! Free-form labels attached to recipes.
crate::metadata_resource! {
    marker: Tag,
    dto: TagDto,
    patch: TagPatch,
    table: "tags",
    name: "tag",
    plural: "tags",
    path: "tag",
    field: name: String = [unique],
    wire: "name",
    check: crate::metadata::check_name,
}
