//! Bearer-token authentication against an OpenID Connect issuer and the
//! role gate wrapped around every resource route.
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;
use async_trait::async_trait;
use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::http::{header, Extensions, HeaderMap, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

pub const ADMIN_ROLE: &str = "administrator";

/// Minimum spacing between JWKS refetches triggered by unknown key ids.
const REFRESH_COOLDOWN: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing bearer token")]
    MissingToken,
    #[error("invalid token: {0}")]
    InvalidToken(String),
    #[error("key set unavailable: {0}")]
    KeySet(String),
    #[error("insufficient role")]
    Forbidden,
    #[error("no authenticated user found in context")]
    NoUser,
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::MissingToken | AuthError::InvalidToken(_) | AuthError::KeySet(_) => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden => StatusCode::FORBIDDEN,
            AuthError::NoUser => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (self.status(), Json(serde_json::json!({"error": self.to_string()}))).into_response()
    }
}

/// Principal established by [`require_role`].
#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    /// `sub` claim.
    pub user_id: String,
    pub username: Option<String>,
    pub roles: Vec<String>,
}

impl AuthUser {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<AuthUser, AuthError>;
}

fn string_array(value: Option<&Value>) -> impl Iterator<Item = String> + '_ {
    value
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|v| v.as_str().map(str::to_string))
}

/// Build the principal from Keycloak-shaped claims: `realm_access.roles`
/// plus `resource_access.<client>.roles`.
pub fn user_from_claims(claims: &Value, client: &str) -> Result<AuthUser, AuthError> {
    let user_id = claims
        .get("sub")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AuthError::InvalidToken("missing sub claim".into()))?
        .to_string();
    let username = claims.get("preferred_username").and_then(Value::as_str).map(str::to_string);

    let mut roles: Vec<String> = string_array(claims.pointer("/realm_access/roles")).collect();
    if !client.is_empty() {
        if let Some(client_access) = claims.get("resource_access").and_then(|r| r.get(client)) {
            roles.extend(string_array(client_access.get("roles")));
        }
    }
    roles.sort();
    roles.dedup();
    Ok(AuthUser { user_id, username, roles })
}

#[derive(Debug, Deserialize)]
struct Jwk {
    kid: String,
    kty: String,
    n: Option<String>,
    e: Option<String>,
}

#[derive(Debug, Deserialize)]
struct JwkSet {
    keys: Vec<Jwk>,
}

/// Verifies RS256 tokens against the issuer's published key set.
/// Keys are cached and refetched when a token names an unknown `kid`.
pub struct OidcVerifier {
    certs_url: String,
    issuer: String,
    client_id: String,
    insecure: bool,
    http: reqwest::Client,
    keys: ArcSwap<HashMap<String, DecodingKey>>,
    last_refresh: Mutex<Option<Instant>>,
}

impl OidcVerifier {
    pub fn new(cfg: &configs::OauthConfig) -> Result<Self, AuthError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| AuthError::KeySet(e.to_string()))?;
        Ok(Self {
            certs_url: cfg.certs_url(),
            issuer: cfg.issuer(),
            client_id: cfg.service.clone(),
            insecure: cfg.disable_security_check,
            http,
            keys: ArcSwap::from_pointee(HashMap::new()),
            last_refresh: Mutex::new(None),
        })
    }

    /// Fetch the key set and swap it in.
    pub async fn refresh(&self) -> Result<usize, AuthError> {
        let set: JwkSet = self
            .http
            .get(&self.certs_url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AuthError::KeySet(e.to_string()))?
            .json()
            .await
            .map_err(|e| AuthError::KeySet(e.to_string()))?;

        let mut keys = HashMap::new();
        for jwk in set.keys {
            let (Some(n), Some(e)) = (jwk.n.as_deref(), jwk.e.as_deref()) else { continue };
            if jwk.kty != "RSA" {
                continue;
            }
            match DecodingKey::from_rsa_components(n, e) {
                Ok(key) => {
                    keys.insert(jwk.kid, key);
                }
                Err(err) => warn!(kid = %jwk.kid, error = %err, "skipping malformed jwk"),
            }
        }
        let count = keys.len();
        self.keys.store(Arc::new(keys));
        info!(url = %self.certs_url, keys = count, "jwks refreshed");
        Ok(count)
    }

    async fn key_for(&self, kid: &str) -> Result<DecodingKey, AuthError> {
        if let Some(key) = self.keys.load().get(kid) {
            return Ok(key.clone());
        }
        {
            let mut last = self.last_refresh.lock().await;
            // another request may have refreshed while we waited
            if let Some(key) = self.keys.load().get(kid) {
                return Ok(key.clone());
            }
            let cooling = last.map(|t| t.elapsed() < REFRESH_COOLDOWN).unwrap_or(false);
            if !cooling {
                *last = Some(Instant::now());
                self.refresh().await?;
            } else {
                debug!(kid, "jwks refresh throttled");
            }
        }
        self.keys
            .load()
            .get(kid)
            .cloned()
            .ok_or_else(|| AuthError::InvalidToken(format!("unknown key id {kid}")))
    }

    fn decode_unverified(token: &str) -> Result<Value, AuthError> {
        let header = decode_header(token).map_err(|e| AuthError::InvalidToken(e.to_string()))?;
        let mut validation = Validation::new(header.alg);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();
        decode::<Value>(token, &DecodingKey::from_secret(&[]), &validation)
            .map(|data| data.claims)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }
}

#[async_trait]
impl TokenVerifier for OidcVerifier {
    async fn verify(&self, token: &str) -> Result<AuthUser, AuthError> {
        if self.insecure {
            let claims = Self::decode_unverified(token)?;
            return user_from_claims(&claims, &self.client_id);
        }

        let header = decode_header(token).map_err(|e| AuthError::InvalidToken(e.to_string()))?;
        if header.alg != Algorithm::RS256 {
            return Err(AuthError::InvalidToken(format!("unsupported algorithm {:?}", header.alg)));
        }
        let kid = header
            .kid
            .ok_or_else(|| AuthError::InvalidToken("missing kid".into()))?;
        let key = self.key_for(&kid).await?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[self.issuer.as_str()]);
        validation.validate_aud = false;
        let data = decode::<Value>(token, &key, &validation)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;
        user_from_claims(&data.claims, &self.client_id)
    }
}

/// State for the role gate middleware.
#[derive(Clone)]
pub struct AuthState {
    pub verifier: Arc<dyn TokenVerifier>,
    pub role: String,
}

impl AuthState {
    pub fn new(verifier: Arc<dyn TokenVerifier>, role: impl Into<String>) -> Self {
        Self { verifier, role: role.into() }
    }
}

pub fn bearer_token(headers: &HeaderMap) -> Result<String, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingToken)?;
    let (scheme, token) = value.trim().split_once(' ').ok_or(AuthError::MissingToken)?;
    if !scheme.eq_ignore_ascii_case("bearer") || token.trim().is_empty() {
        return Err(AuthError::MissingToken);
    }
    Ok(token.trim().to_string())
}

/// Authenticate the bearer token and assert the configured role.
/// Missing or rejected tokens yield 401, a principal without the role 403.
pub async fn require_role(
    State(auth): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = bearer_token(req.headers())?;
    let user = auth.verifier.verify(&token).await.map_err(|e| {
        debug!(error = %e, "token rejected");
        e
    })?;
    if !user.has_role(&auth.role) {
        warn!(user_id = %user.user_id, role = %auth.role, "role assertion failed");
        return Err(AuthError::Forbidden);
    }
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// Principal placed in the request by [`require_role`].
pub fn user_from_context(extensions: &Extensions) -> Result<AuthUser, AuthError> {
    extensions.get::<AuthUser>().cloned().ok_or(AuthError::NoUser)
}

/// Extractor over [`user_from_context`]; rejects with 500.
pub struct CurrentUser(pub AuthUser);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        user_from_context(&parts.extensions).map(CurrentUser)
    }
}
