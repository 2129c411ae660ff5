//! Metadata search over the recipe join tables.
pub mod repo;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use models::search::{assemble, matching, LinkKind, RecipeLink, SearchRequest, SearchResult};
use tokio::sync::Mutex;
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::errors::{RepositoryError, ServiceError};

#[async_trait]
pub trait SearchRepository: Send + Sync {
    /// Matching recipes ordered by recipe id; no match is an empty list.
    async fn search(&self, req: &SearchRequest) -> Result<Vec<SearchResult>, RepositoryError>;
}

/// Link rows and preparation time durations held in memory.
#[derive(Default)]
pub struct InMemorySearchRepository {
    links: Mutex<Vec<RecipeLink>>,
    durations: Mutex<HashMap<Uuid, i32>>,
}

impl InMemorySearchRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn link(&self, kind: LinkKind, recipe_id: Uuid, target_id: Uuid) {
        self.links.lock().await.push(RecipeLink { kind, recipe_id, target_id });
    }

    pub async fn set_duration(&self, preparation_time_id: Uuid, minutes: i32) {
        self.durations.lock().await.insert(preparation_time_id, minutes);
    }
}

#[async_trait]
impl SearchRepository for InMemorySearchRepository {
    async fn search(&self, req: &SearchRequest) -> Result<Vec<SearchResult>, RepositoryError> {
        let links = self.links.lock().await;
        let durations = self.durations.lock().await;
        let ids = matching(req, &links, &durations);
        Ok(assemble(&ids, &links))
    }
}

#[derive(Clone)]
pub struct SearchService {
    repo: Arc<dyn SearchRepository>,
}

impl SearchService {
    pub fn new(repo: Arc<dyn SearchRepository>) -> Self {
        Self { repo }
    }

    #[instrument(skip(self))]
    pub async fn search(&self, req: SearchRequest) -> Result<Vec<SearchResult>, ServiceError> {
        let results = self.repo.search(&req).await.map_err(|e| match e {
            RepositoryError::NotFound => ServiceError::NotFound,
            RepositoryError::Db(db) => {
                error!(error = %db, "metadata search failed");
                ServiceError::Internal(ServiceError::INTERNAL_MESSAGE.to_string())
            }
        })?;
        info!(matches = results.len(), "metadata_searched");
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::DbErr;

    struct BrokenSearch;

    #[async_trait]
    impl SearchRepository for BrokenSearch {
        async fn search(&self, _req: &SearchRequest) -> Result<Vec<SearchResult>, RepositoryError> {
            Err(DbErr::Custom("relation does not exist".into()).into())
        }
    }

    #[tokio::test]
    async fn filters_and_groups_links() {
        let repo = Arc::new(InMemorySearchRepository::new());
        let (soup, stew) = (Uuid::new_v4(), Uuid::new_v4());
        let (dinner, spicy, quick) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        repo.link(LinkKind::Category, soup, dinner).await;
        repo.link(LinkKind::Category, stew, dinner).await;
        repo.link(LinkKind::Tag, stew, spicy).await;
        repo.link(LinkKind::PreparationTime, stew, quick).await;
        repo.set_duration(quick, 20).await;

        let svc = SearchService::new(repo);
        let req = SearchRequest { tag_id: Some(spicy), max_prep_time: Some(30), ..Default::default() };
        let results = svc.search(req).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].recipe_id, stew);
        assert_eq!(results[0].category_ids, vec![dinner]);
        assert_eq!(results[0].preparation_time, Some(quick));

        let none = SearchRequest { min_prep_time: Some(25), ..Default::default() };
        assert!(svc.search(none).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn hides_driver_errors() {
        let svc = SearchService::new(Arc::new(BrokenSearch));
        let err = svc.search(SearchRequest::default()).await.unwrap_err();
        assert_eq!(err, ServiceError::Internal("internal server error".into()));
    }
}
