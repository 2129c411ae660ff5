use async_trait::async_trait;
use models::resource::{ColumnOf, Resource};
use sea_orm::{IdenStatic, Iterable, ModelTrait, Value};
use uuid::Uuid;

use crate::errors::RepositoryError;

/// Persistence capabilities for one resource. Soft-deleted rows are invisible
/// to every method.
#[async_trait]
pub trait Repository<R: Resource>: Send + Sync {
    /// All live rows, oldest first. An empty set is `NotFound`.
    async fn find_all(&self) -> Result<Vec<R::Model>, RepositoryError>;
    async fn find_single(&self, id: Uuid) -> Result<R::Model, RepositoryError>;
    /// Insert with store-assigned identity and timestamps.
    async fn create(&self, model: R::Model) -> Result<R::Model, RepositoryError>;
    /// Write the columns returned by [`update_columns`] and bump `updated_at`.
    async fn update(&self, model: R::Model) -> Result<R::Model, RepositoryError>;
    /// Stamp `deleted_at`; rows are never removed.
    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError>;
}

/// Identity and audit columns, assigned by the store.
pub(crate) fn is_store_owned<R: Resource>(col: &ColumnOf<R>) -> bool {
    [R::id_column(), R::created_at_column(), R::updated_at_column(), R::deleted_at_column()]
        .iter()
        .any(|c| c.as_str() == col.as_str())
}

fn is_blank(value: &Value) -> bool {
    matches!(value, Value::String(Some(s)) if s.is_empty())
}

/// Columns an update writes: everything the client may change, minus
/// server-owned columns and blank strings.
pub fn update_columns<R: Resource>(model: &R::Model) -> Vec<(ColumnOf<R>, Value)> {
    <ColumnOf<R> as Iterable>::iter()
        .filter(|c| !is_store_owned::<R>(c))
        .filter(|c| !R::SERVER_OWNED.contains(&c.as_str()))
        .filter_map(|c| {
            let value = model.get(c);
            (!is_blank(&value)).then_some((c, value))
        })
        .collect()
}

/// Columns an insert writes.
pub fn insert_columns<R: Resource>(model: &R::Model) -> Vec<(ColumnOf<R>, Value)> {
    <ColumnOf<R> as Iterable>::iter()
        .filter(|c| !is_store_owned::<R>(c))
        .map(|c| (c, model.get(c)))
        .collect()
}

/// Vec-backed repository mirroring the SQL semantics, for tests and local runs.
pub mod memory {
    use super::*;
    use chrono::Utc;
    use sea_orm::prelude::DateTimeWithTimeZone;
    use tokio::sync::Mutex;

    pub struct InMemoryRepository<R: Resource> {
        rows: Mutex<Vec<R::Model>>,
    }

    impl<R: Resource> Default for InMemoryRepository<R> {
        fn default() -> Self {
            Self { rows: Mutex::new(Vec::new()) }
        }
    }

    impl<R: Resource> InMemoryRepository<R> {
        pub fn new() -> Self {
            Self::default()
        }

        /// Every row including soft-deleted ones.
        pub async fn snapshot(&self) -> Vec<R::Model> {
            self.rows.lock().await.clone()
        }
    }

    fn is_live<R: Resource>(model: &R::Model) -> bool {
        model.get(R::deleted_at_column()) == Value::from(None::<DateTimeWithTimeZone>)
    }

    fn now() -> DateTimeWithTimeZone {
        Utc::now().into()
    }

    #[async_trait]
    impl<R: Resource> Repository<R> for InMemoryRepository<R> {
        async fn find_all(&self) -> Result<Vec<R::Model>, RepositoryError> {
            let rows = self.rows.lock().await;
            let live: Vec<R::Model> = rows.iter().filter(|m| is_live::<R>(m)).cloned().collect();
            if live.is_empty() {
                return Err(RepositoryError::NotFound);
            }
            Ok(live)
        }

        async fn find_single(&self, id: Uuid) -> Result<R::Model, RepositoryError> {
            let rows = self.rows.lock().await;
            rows.iter()
                .find(|m| R::id_of(m) == id && is_live::<R>(m))
                .cloned()
                .ok_or(RepositoryError::NotFound)
        }

        async fn create(&self, model: R::Model) -> Result<R::Model, RepositoryError> {
            let mut row = model;
            let ts = now();
            row.set(R::id_column(), Uuid::new_v4().into());
            row.set(R::created_at_column(), ts.into());
            row.set(R::updated_at_column(), ts.into());
            row.set(R::deleted_at_column(), Value::from(None::<DateTimeWithTimeZone>));
            self.rows.lock().await.push(row.clone());
            Ok(row)
        }

        async fn update(&self, model: R::Model) -> Result<R::Model, RepositoryError> {
            let id = R::id_of(&model);
            let mut rows = self.rows.lock().await;
            let stored = rows
                .iter_mut()
                .find(|m| R::id_of(m) == id && is_live::<R>(m))
                .ok_or(RepositoryError::NotFound)?;
            for (col, value) in update_columns::<R>(&model) {
                stored.set(col, value);
            }
            stored.set(R::updated_at_column(), now().into());
            Ok(stored.clone())
        }

        async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
            let mut rows = self.rows.lock().await;
            let stored = rows
                .iter_mut()
                .find(|m| R::id_of(m) == id && is_live::<R>(m))
                .ok_or(RepositoryError::NotFound)?;
            stored.set(R::deleted_at_column(), Value::from(Some(now())));
            Ok(())
        }
    }
}
