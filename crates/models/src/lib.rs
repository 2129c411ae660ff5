pub mod errors;
pub mod db;
pub mod resource;
pub mod metadata;
pub mod recipe;
pub mod tag;
pub mod category;
pub mod cuisine_type;
pub mod difficulty_level;
pub mod preparation_time;
pub mod search;

#[cfg(test)]
mod tests;
