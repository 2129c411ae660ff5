use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use axum::Router;
use common::utils::{logging::LogHandle, shutdown::shutdown_signal};
use configs::AppConfig;
use migration::{MetadataMigrator, MigratorTrait, RecipeMigrator};
use models::{
    category::Category, cuisine_type::CuisineType, difficulty_level::DifficultyLevel,
    preparation_time::PreparationTime, recipe::Recipe, resource::Resource, tag::Tag,
};
use sea_orm::DatabaseConnection;
use service::{ResourceService, SeaOrmRepository, SeaOrmSearchRepository, SearchService};
use tracing::{info, warn};

use crate::auth::{AuthState, OidcVerifier, TokenVerifier, ADMIN_ROLE};
use crate::routes::{self, mount, mount_search};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceKind {
    /// Tags, categories, cuisine types, difficulty levels, preparation times and search.
    Metadata,
    Recipe,
}

impl ServiceKind {
    pub fn name(&self) -> &'static str {
        match self {
            ServiceKind::Metadata => "metadata-service",
            ServiceKind::Recipe => "recipe-service",
        }
    }
}

fn seaorm_service<R: Resource>(db: &DatabaseConnection) -> ResourceService<R> {
    ResourceService::new(Arc::new(SeaOrmRepository::<R>::new(db.clone())))
}

/// Routes served by `kind`, before the global middleware.
pub fn api_routes(kind: ServiceKind, db: &DatabaseConnection, auth: AuthState) -> Router {
    match kind {
        ServiceKind::Metadata => {
            let router = mount::<Tag>(Router::new(), seaorm_service(db), auth.clone());
            let router = mount::<Category>(router, seaorm_service(db), auth.clone());
            let router = mount::<CuisineType>(router, seaorm_service(db), auth.clone());
            let router = mount::<DifficultyLevel>(router, seaorm_service(db), auth.clone());
            let router = mount::<PreparationTime>(router, seaorm_service(db), auth.clone());
            let search = SearchService::new(Arc::new(SeaOrmSearchRepository::new(db.clone())));
            mount_search(router, search, auth)
        }
        ServiceKind::Recipe => mount::<Recipe>(Router::new(), seaorm_service(db), auth),
    }
}

pub async fn migrate(kind: ServiceKind, db: &DatabaseConnection) -> anyhow::Result<()> {
    match kind {
        ServiceKind::Metadata => MetadataMigrator::up(db, None).await?,
        ServiceKind::Recipe => RecipeMigrator::up(db, None).await?,
    }
    Ok(())
}

/// Connect, migrate, serve until a shutdown signal, then drain.
pub async fn run(kind: ServiceKind, cfg: AppConfig, log: LogHandle) -> anyhow::Result<()> {
    let db = models::db::connect(&cfg.database).await?;
    migrate(kind, &db).await?;
    info!(service = kind.name(), event = "migrated", "schema up to date");

    let verifier = Arc::new(OidcVerifier::new(&cfg.oauth)?);
    if cfg.oauth.disable_security_check {
        warn!(service = kind.name(), "token signature checks are disabled");
    } else if let Err(e) = verifier.refresh().await {
        // tokens are rejected until the key set can be fetched
        warn!(service = kind.name(), error = %e, "initial jwks fetch failed");
    }
    let verifier: Arc<dyn TokenVerifier> = verifier;
    let auth = AuthState::new(verifier, ADMIN_ROLE);

    let app = routes::build_router(api_routes(kind, &db, auth), &cfg);

    let current = Arc::new(ArcSwap::from_pointee(cfg.clone()));
    let watcher = configs::watch(
        configs::config_path(),
        Arc::clone(&current),
        Duration::from_secs(cfg.server.reload_interval_secs),
        move |next| log.set_level(&next.global.log_level),
    );

    let addr = cfg.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(service = kind.name(), event = "listening", %addr, "http server listening");
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    watcher.abort();
    if let Err(e) = db.close().await {
        warn!(error = %e, "closing database pool failed");
    }
    info!(service = kind.name(), event = "drained", "http server stopped");
    Ok(())
}
