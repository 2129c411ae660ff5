use std::sync::Arc;

use models::resource::Resource;
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::errors::{RepositoryError, ServiceError};
use crate::resource::repository::Repository;

/// Reads hide driver details behind a fixed message.
fn read_error(resource: &str, e: RepositoryError) -> ServiceError {
    match e {
        RepositoryError::NotFound => ServiceError::NotFound,
        RepositoryError::Db(db) => {
            error!(resource, error = %db, "read failed");
            ServiceError::Internal(ServiceError::INTERNAL_MESSAGE.to_string())
        }
    }
}

fn write_error(e: RepositoryError) -> ServiceError {
    match e {
        RepositoryError::NotFound => ServiceError::NotFound,
        RepositoryError::Db(db) => ServiceError::Internal(db.to_string()),
    }
}

/// Stateless domain service for one resource.
pub struct ResourceService<R: Resource> {
    repo: Arc<dyn Repository<R>>,
}

impl<R: Resource> Clone for ResourceService<R> {
    fn clone(&self) -> Self {
        Self { repo: Arc::clone(&self.repo) }
    }
}

impl<R: Resource> ResourceService<R> {
    pub fn new(repo: Arc<dyn Repository<R>>) -> Self {
        Self { repo }
    }

    #[instrument(skip(self), fields(resource = R::NAME))]
    pub async fn find_all(&self) -> Result<Vec<R::Model>, ServiceError> {
        self.repo.find_all().await.map_err(|e| read_error(R::NAME, e))
    }

    #[instrument(skip(self), fields(resource = R::NAME))]
    pub async fn find_single(&self, id: Uuid) -> Result<R::Model, ServiceError> {
        self.repo.find_single(id).await.map_err(|e| read_error(R::NAME, e))
    }

    /// Identity is expected to be nil; the store assigns it.
    #[instrument(skip_all, fields(resource = R::NAME))]
    pub async fn create(&self, model: R::Model) -> Result<R::Model, ServiceError> {
        let created = self.repo.create(model).await.map_err(write_error)?;
        info!(resource = R::NAME, id = %R::id_of(&created), "resource_created");
        Ok(created)
    }

    /// Load, overlay the patch, persist. Concurrent updates race; the last write wins.
    #[instrument(skip(self, patch), fields(resource = R::NAME))]
    pub async fn update(&self, patch: R::Patch, id: Uuid) -> Result<R::Model, ServiceError> {
        let stored = self.repo.find_single(id).await.map_err(write_error)?;
        let merged = R::merge(&stored, patch);
        let updated = self.repo.update(merged).await.map_err(write_error)?;
        info!(resource = R::NAME, %id, "resource_updated");
        Ok(updated)
    }

    #[instrument(skip(self), fields(resource = R::NAME))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        // TODO: ownership and cascade checks (recipes referencing a tag or category) before deleting.
        self.repo.delete(id).await.map_err(write_error)?;
        info!(resource = R::NAME, %id, "resource_deleted");
        Ok(())
    }
}
