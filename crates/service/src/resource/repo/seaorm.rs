use chrono::Utc;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, TransactionTrait,
};
use std::marker::PhantomData;
use tracing::{debug, warn};
use uuid::Uuid;

use models::resource::Resource;

use crate::errors::RepositoryError;
use crate::resource::repository::{insert_columns, update_columns, Repository};

/// SeaORM-backed repository. Every query carries the `deleted_at IS NULL` filter.
pub struct SeaOrmRepository<R: Resource> {
    pub db: DatabaseConnection,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource> SeaOrmRepository<R> {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db, _resource: PhantomData }
    }

    fn live() -> sea_orm::Condition {
        sea_orm::Condition::all().add(R::deleted_at_column().is_null())
    }
}

async fn finish<T>(txn: DatabaseTransaction, result: Result<T, RepositoryError>) -> Result<T, RepositoryError> {
    match result {
        Ok(v) => {
            txn.commit().await?;
            Ok(v)
        }
        Err(e) => {
            if let Err(rb) = txn.rollback().await {
                warn!(error = %rb, "transaction rollback failed");
            }
            Err(e)
        }
    }
}

#[async_trait::async_trait]
impl<R: Resource> Repository<R> for SeaOrmRepository<R> {
    async fn find_all(&self) -> Result<Vec<R::Model>, RepositoryError> {
        let rows = R::Entity::find()
            .filter(Self::live())
            .order_by_asc(R::created_at_column())
            .all(&self.db)
            .await?;
        if rows.is_empty() {
            return Err(RepositoryError::NotFound);
        }
        Ok(rows)
    }

    async fn find_single(&self, id: Uuid) -> Result<R::Model, RepositoryError> {
        R::Entity::find()
            .filter(R::id_column().eq(id))
            .filter(Self::live())
            .one(&self.db)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    async fn create(&self, model: R::Model) -> Result<R::Model, RepositoryError> {
        let mut am = <R::ActiveModel as ActiveModelTrait>::default();
        for (col, value) in insert_columns::<R>(&model) {
            am.set(col, value);
        }
        let txn = self.db.begin().await?;
        let result = am.insert(&txn).await.map_err(RepositoryError::from);
        let created = finish(txn, result).await?;
        debug!(resource = R::NAME, id = %R::id_of(&created), "row inserted");
        Ok(created)
    }

    async fn update(&self, model: R::Model) -> Result<R::Model, RepositoryError> {
        let id = R::id_of(&model);
        let columns = update_columns::<R>(&model);
        let mut am: R::ActiveModel = model.into_active_model();
        for (col, value) in columns {
            am.set(col, value);
        }
        let now: DateTimeWithTimeZone = Utc::now().into();
        am.set(R::updated_at_column(), now.into());

        let txn = self.db.begin().await?;
        let result = match R::Entity::update(am).filter(Self::live()).exec(&txn).await {
            Ok(updated) => Ok(updated),
            Err(DbErr::RecordNotUpdated) | Err(DbErr::RecordNotFound(_)) => Err(RepositoryError::NotFound),
            Err(e) => Err(e.into()),
        };
        let updated = finish(txn, result).await?;
        debug!(resource = R::NAME, %id, "row updated");
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        let now: DateTimeWithTimeZone = Utc::now().into();
        let txn = self.db.begin().await?;
        let result = R::Entity::update_many()
            .col_expr(R::deleted_at_column(), Expr::value(now))
            .filter(R::id_column().eq(id))
            .filter(Self::live())
            .exec(&txn)
            .await
            .map_err(RepositoryError::from)
            .and_then(|res| {
                if res.rows_affected == 0 {
                    Err(RepositoryError::NotFound)
                } else {
                    Ok(())
                }
            });
        finish(txn, result).await?;
        debug!(resource = R::NAME, %id, "row soft-deleted");
        Ok(())
    }
}
