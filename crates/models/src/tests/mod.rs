/// DTO <-> entity conversion and wire shape
pub mod conversion_tests;
