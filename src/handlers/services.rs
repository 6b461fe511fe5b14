//! Service collection handlers. Each handler validates at the boundary and
//! performs exactly one store call.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    Extension,
};
use axum_extra::extract::WithRejection;
use serde_json::Value;

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::models::{Service, ServicePatch};
use crate::store::{Collection, DeleteResult, InsertResult, QueryField, UpdateResult};
use crate::AppState;

use super::{parse_id, scoped_email_filter, EmailQuery};

/// POST /services - insert a new service offering
pub async fn create(
    State(state): State<AppState>,
    WithRejection(Json(service), _): WithRejection<Json<Service>, ApiError>,
) -> Result<Json<InsertResult>, ApiError> {
    service.validate()?;
    let doc = serde_json::to_value(&service)?;
    let result = state.store.insert(Collection::Services, doc).await?;
    Ok(Json(result))
}

/// GET /services - the public catalog, every service document
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Value>>, ApiError> {
    let services = state.store.find(Collection::Services, None).await?;
    Ok(Json(services))
}

/// GET /userService - services scoped to the calling provider's email
pub async fn list_by_provider(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Query(query), _): WithRejection<Query<EmailQuery>, ApiError>,
) -> Result<Json<Vec<Value>>, ApiError> {
    let filter = scoped_email_filter(QueryField::ServiceProviderEmail, query.email, &user)?;
    let services = state.store.find(Collection::Services, filter).await?;
    Ok(Json(services))
}

/// GET /services/:id - single service document or null
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id)?;
    let service = state.store.find_one(Collection::Services, id).await?;
    Ok(Json(service.unwrap_or(Value::Null)))
}

/// PUT /services/:id - merge-patch the service, upserting on miss
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    WithRejection(Json(patch), _): WithRejection<Json<ServicePatch>, ApiError>,
) -> Result<Json<UpdateResult>, ApiError> {
    let id = parse_id(&id)?;
    patch.validate()?;
    let doc = serde_json::to_value(&patch)?;
    let result = state.store.update(Collection::Services, id, doc).await?;
    Ok(Json(result))
}

/// DELETE /services/:id - idempotent delete
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResult>, ApiError> {
    let id = parse_id(&id)?;
    let result = state.store.delete(Collection::Services, id).await?;
    Ok(Json(result))
}
