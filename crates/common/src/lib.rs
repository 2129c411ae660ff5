//! Process-wide helpers shared by both service binaries.

pub mod utils;
