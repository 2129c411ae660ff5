use std::any::Any;
use std::time::Duration;

use axum::http::{header, HeaderName, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{middleware, routing::{get, post}, Json, Router};
use configs::{AppConfig, CorsConfig};
use models::resource::Resource;
use service::{ResourceService, SearchService};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    timeout::{RequestBodyTimeoutLayer, TimeoutLayer},
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{error, warn, Level};

use crate::auth::{require_role, AuthState};
use crate::handlers;

/// CRUD routes for one resource, every route behind the role gate.
pub fn resource_routes<R: Resource>(service: ResourceService<R>, auth: AuthState) -> Router {
    Router::new()
        .route("/", get(handlers::get_all::<R>).post(handlers::create::<R>))
        .route(
            "/:id",
            get(handlers::get_single::<R>)
                .put(handlers::update::<R>)
                .delete(handlers::delete::<R>),
        )
        .route_layer(middleware::from_fn_with_state(auth, require_role))
        .with_state(service)
}

/// Mount a resource under `/api/v2/<path>`.
pub fn mount<R: Resource>(router: Router, service: ResourceService<R>, auth: AuthState) -> Router {
    router.nest(&format!("/api/v2/{}", R::PATH), resource_routes(service, auth))
}

/// `POST /api/v2/search`, behind the same role gate.
pub fn mount_search(router: Router, service: SearchService, auth: AuthState) -> Router {
    let search = Router::new()
        .route("/", post(handlers::search))
        .route_layer(middleware::from_fn_with_state(auth, require_role))
        .with_state(service);
    router.nest("/api/v2/search", search)
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    error!(panic = %detail, "handler panicked");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({"error": "internal server error"})),
    )
        .into_response()
}

fn header_values(items: &[String]) -> Vec<HeaderValue> {
    items
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                warn!(origin = %o, "ignoring invalid cors origin");
                None
            }
        })
        .collect()
}

/// CORS policy from configuration. A `*` entry means any; with credentials
/// enabled it mirrors the request instead, since browsers reject `*` there.
pub fn build_cors(cfg: &CorsConfig) -> CorsLayer {
    let wildcard = |items: &[String]| items.iter().any(|i| i.trim() == "*");

    let origins = match (wildcard(&cfg.allowed_origins), cfg.allow_credentials) {
        (true, true) => AllowOrigin::mirror_request(),
        (true, false) => AllowOrigin::any(),
        (false, _) => AllowOrigin::list(header_values(&cfg.allowed_origins)),
    };
    let methods = match (wildcard(&cfg.allowed_methods), cfg.allow_credentials) {
        (true, true) => AllowMethods::mirror_request(),
        (true, false) => AllowMethods::any(),
        (false, _) => AllowMethods::list(
            cfg.allowed_methods
                .iter()
                .filter_map(|m| Method::from_bytes(m.trim().to_ascii_uppercase().as_bytes()).ok()),
        ),
    };
    let headers = match (wildcard(&cfg.allowed_headers), cfg.allow_credentials) {
        (true, true) => AllowHeaders::mirror_request(),
        (true, false) => AllowHeaders::any(),
        (false, _) => AllowHeaders::list(
            cfg.allowed_headers
                .iter()
                .filter_map(|h| HeaderName::from_bytes(h.trim().as_bytes()).ok()),
        ),
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(methods)
        .allow_headers(headers)
        .allow_credentials(cfg.allow_credentials)
        .expose_headers([header::CONTENT_LENGTH])
        .max_age(Duration::from_secs(12 * 60 * 60))
}

/// Wrap the mounted resources with the global middleware chain:
/// trace, panic recovery, timeouts, CORS (outermost first).
pub fn build_router(api: Router, cfg: &AppConfig) -> Router {
    api.layer(build_cors(&cfg.cors))
        .layer(RequestBodyTimeoutLayer::new(Duration::from_secs(cfg.server.read_timeout_secs)))
        .layer(TimeoutLayer::new(Duration::from_secs(cfg.server.write_timeout_secs)))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
