//! HTTP adapters shared by every resource. Handlers parse inputs, call the
//! service and choose the status code; nothing below them sees HTTP.
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use models::resource::{to_dtos, Resource};
use models::search::{SearchRequest, SearchResult};
use service::{ResourceService, SearchService};
use tracing::debug;
use uuid::Uuid;

use crate::auth::{AuthError, CurrentUser};
use crate::errors::ApiError;

fn parse_id<R: Resource>(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::invalid_id::<R>())
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    match payload {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => {
            debug!(error = %rejection.body_text(), "malformed request body");
            Err(ApiError::bad_request(rejection.body_text()))
        }
    }
}

pub async fn get_all<R: Resource>(
    State(service): State<ResourceService<R>>,
) -> Result<Json<Vec<R::Dto>>, ApiError> {
    let models = service.find_all().await.map_err(ApiError::collection::<R>)?;
    Ok(Json(to_dtos::<R>(models)))
}

pub async fn get_single<R: Resource>(
    State(service): State<ResourceService<R>>,
    Path(raw): Path<String>,
) -> Result<Json<R::Dto>, ApiError> {
    let id = parse_id::<R>(&raw)?;
    let model = service.find_single(id).await.map_err(ApiError::single::<R>)?;
    Ok(Json(model.into()))
}

pub async fn create<R: Resource>(
    State(service): State<ResourceService<R>>,
    user: Result<CurrentUser, AuthError>,
    payload: Result<Json<R::Dto>, JsonRejection>,
) -> Result<(StatusCode, Json<R::Dto>), ApiError> {
    let mut dto = body(payload)?;
    let CurrentUser(user) = user?;
    R::validate_new(&dto).map_err(ApiError::validation)?;
    R::stamp_author(&mut dto, &user.user_id);
    let created = service.create(R::from_dto(dto)).await.map_err(ApiError::single::<R>)?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

/// Identity comes from the path; the body cannot carry one.
pub async fn update<R: Resource>(
    State(service): State<ResourceService<R>>,
    Path(raw): Path<String>,
    payload: Result<Json<R::Patch>, JsonRejection>,
) -> Result<Json<R::Dto>, ApiError> {
    let id = parse_id::<R>(&raw)?;
    let patch = body(payload)?;
    R::validate_patch(&patch).map_err(ApiError::validation)?;
    let updated = service.update(patch, id).await.map_err(ApiError::single::<R>)?;
    Ok(Json(updated.into()))
}

pub async fn delete<R: Resource>(
    State(service): State<ResourceService<R>>,
    Path(raw): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id::<R>(&raw)?;
    service.delete(id).await.map_err(ApiError::single::<R>)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Recipes matching the metadata filters; no match is an empty list.
pub async fn search(
    State(service): State<SearchService>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<Vec<SearchResult>>, ApiError> {
    let req = body(payload)?;
    req.validate().map_err(ApiError::validation)?;
    Ok(Json(service.search(req).await?))
}
