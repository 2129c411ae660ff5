#![allow(dead_code)]
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use configs::AppConfig;
use models::resource::Resource;
use serde_json::Value;
use server::auth::{AuthError, AuthState, AuthUser, TokenVerifier, ADMIN_ROLE};
use service::{InMemoryRepository, ResourceService};
use tower::ServiceExt;

pub const ADMIN: &str = "admin-token";
pub const COOK: &str = "cook-token";

/// Accepts two fixed tokens: an administrator and a principal without roles.
pub struct StubVerifier;

#[async_trait]
impl TokenVerifier for StubVerifier {
    async fn verify(&self, token: &str) -> Result<AuthUser, AuthError> {
        match token {
            ADMIN => Ok(AuthUser {
                user_id: "admin-1".into(),
                username: Some("admin".into()),
                roles: vec![ADMIN_ROLE.into()],
            }),
            COOK => Ok(AuthUser { user_id: "cook-1".into(), username: None, roles: vec!["user".into()] }),
            _ => Err(AuthError::InvalidToken("unknown token".into())),
        }
    }
}

pub fn auth() -> AuthState {
    AuthState::new(Arc::new(StubVerifier), ADMIN_ROLE)
}

pub fn memory_service<R: Resource>() -> ResourceService<R> {
    ResourceService::new(Arc::new(InMemoryRepository::<R>::new()))
}

pub fn app(api: Router) -> Router {
    server::routes::build_router(api, &AppConfig::default())
}

pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> anyhow::Result<(StatusCode, Value)> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(t) = token {
        builder = builder.header("authorization", format!("Bearer {t}"));
    }
    let req = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&json)?))?,
        None => builder.body(Body::empty())?,
    };
    let resp = app.clone().oneshot(req).await?;
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await?;
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes)? };
    Ok((status, value))
}
