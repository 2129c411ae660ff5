//! Repository and service layers shared by every resource.
//! - `Repository` and `SearchRepository` are the only seams that speak SQL.
//! - `ResourceService` validates nothing itself; it merges updates and
//!   narrows repository failures to `ServiceError`.
//! - `SearchService` finds recipes by their linked metadata.

pub mod errors;
pub mod resource;
pub mod search;
#[cfg(test)]
pub mod test_support;

pub use resource::repository::{memory::InMemoryRepository, Repository};
pub use resource::repo::seaorm::SeaOrmRepository;
pub use resource::service::ResourceService;
pub use search::{repo::SeaOrmSearchRepository, InMemorySearchRepository, SearchRepository, SearchService};
