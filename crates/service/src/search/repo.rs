use models::search::{assemble, LinkKind, RecipeLink, SearchRequest, SearchResult};
use sea_orm::sea_query::{Alias, Expr, Order, Query, SelectStatement};
use sea_orm::{ConnectionTrait, DatabaseConnection};
use tracing::debug;
use uuid::Uuid;

use crate::errors::RepositoryError;
use crate::search::SearchRepository;

/// Searches the join tables in Postgres. Soft-deleted link rows and
/// preparation times never match.
pub struct SeaOrmSearchRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmSearchRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn col(table: &str, column: &str) -> (Alias, Alias) {
    (Alias::new(table), Alias::new(column))
}

/// `SELECT recipe_id FROM <kind table> WHERE deleted_at IS NULL`
fn live_links(kind: LinkKind) -> SelectStatement {
    Query::select()
        .column(col(kind.table(), "recipe_id"))
        .from(Alias::new(kind.table()))
        .and_where(Expr::col(col(kind.table(), "deleted_at")).is_null())
        .to_owned()
}

fn candidates(req: &SearchRequest) -> SelectStatement {
    let base = LinkKind::Category;
    let recipe = col(base.table(), "recipe_id");
    let mut query = live_links(base);
    query.distinct();

    for (kind, id) in req.id_filters() {
        if kind == base {
            query.and_where(Expr::col(col(base.table(), base.column())).eq(id));
        } else {
            let linked = live_links(kind)
                .and_where(Expr::col(col(kind.table(), kind.column())).eq(id))
                .to_owned();
            query.and_where(Expr::col(recipe.clone()).in_subquery(linked));
        }
    }

    if req.has_prep_range() {
        let mut times = Query::select()
            .column(Alias::new("id"))
            .from(Alias::new("preparation_times"))
            .and_where(Expr::col(Alias::new("deleted_at")).is_null())
            .to_owned();
        if let Some(min) = req.min_prep_time {
            times.and_where(Expr::col(Alias::new("duration")).gte(min));
        }
        if let Some(max) = req.max_prep_time {
            times.and_where(Expr::col(Alias::new("duration")).lte(max));
        }
        let prep = LinkKind::PreparationTime;
        let linked = live_links(prep)
            .and_where(Expr::col(col(prep.table(), prep.column())).in_subquery(times))
            .to_owned();
        query.and_where(Expr::col(recipe.clone()).in_subquery(linked));
    }

    query.order_by(recipe, Order::Asc);
    query
}

#[async_trait::async_trait]
impl SearchRepository for SeaOrmSearchRepository {
    async fn search(&self, req: &SearchRequest) -> Result<Vec<SearchResult>, RepositoryError> {
        let backend = self.db.get_database_backend();
        let rows = self.db.query_all(backend.build(&candidates(req))).await?;
        let ids = rows
            .iter()
            .map(|row| row.try_get::<Uuid>("", "recipe_id"))
            .collect::<Result<Vec<_>, _>>()?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut links = Vec::new();
        for kind in LinkKind::ALL {
            let stmt = Query::select()
                .columns([Alias::new("recipe_id"), Alias::new(kind.column())])
                .from(Alias::new(kind.table()))
                .and_where(Expr::col(Alias::new("deleted_at")).is_null())
                .and_where(Expr::col(Alias::new("recipe_id")).is_in(ids.iter().copied()))
                .to_owned();
            for row in self.db.query_all(backend.build(&stmt)).await? {
                links.push(RecipeLink {
                    kind,
                    recipe_id: row.try_get("", "recipe_id")?,
                    target_id: row.try_get("", kind.column())?,
                });
            }
        }
        debug!(recipes = ids.len(), links = links.len(), "metadata links loaded");
        Ok(assemble(&ids, &links))
    }
}
