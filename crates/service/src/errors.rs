use sea_orm::DbErr;
use thiserror::Error;

/// Outcomes of the persistence layer.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("not found")]
    NotFound,
    #[error("database error: {0}")]
    Db(#[from] DbErr),
}

/// Stable domain vocabulary handed to the HTTP layer.
#[derive(Debug, Error, PartialEq)]
pub enum ServiceError {
    #[error("not found")]
    NotFound,
    #[error("{0}")]
    Internal(String),
}

impl ServiceError {
    pub const INTERNAL_MESSAGE: &'static str = "internal server error";
}
