//! Booking collection handlers. Bookings have no delete endpoint; they are
//! created, listed from either side of the transaction, and updated.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    Extension,
};
use axum_extra::extract::WithRejection;
use serde_json::Value;

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::models::{Booking, BookingPatch};
use crate::store::{Collection, InsertResult, QueryField, UpdateResult};
use crate::AppState;

use super::{parse_id, scoped_email_filter, EmailQuery};

/// POST /bookings - insert a new booking
pub async fn create(
    State(state): State<AppState>,
    WithRejection(Json(booking), _): WithRejection<Json<Booking>, ApiError>,
) -> Result<Json<InsertResult>, ApiError> {
    booking.validate()?;
    let doc = serde_json::to_value(&booking)?;
    let result = state.store.insert(Collection::Bookings, doc).await?;
    Ok(Json(result))
}

/// GET /bookings - bookings scoped to the calling user's email
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Query(query), _): WithRejection<Query<EmailQuery>, ApiError>,
) -> Result<Json<Vec<Value>>, ApiError> {
    let filter = scoped_email_filter(QueryField::UserEmail, query.email, &user)?;
    let bookings = state.store.find(Collection::Bookings, filter).await?;
    Ok(Json(bookings))
}

/// GET /pendingWorks - bookings addressed to the calling provider
pub async fn pending_works(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Query(query), _): WithRejection<Query<EmailQuery>, ApiError>,
) -> Result<Json<Vec<Value>>, ApiError> {
    let filter = scoped_email_filter(QueryField::ServiceProviderEmail, query.email, &user)?;
    let bookings = state.store.find(Collection::Bookings, filter).await?;
    Ok(Json(bookings))
}

/// PUT /bookings/:id - merge-patch the booking, upserting on miss
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    WithRejection(Json(patch), _): WithRejection<Json<BookingPatch>, ApiError>,
) -> Result<Json<UpdateResult>, ApiError> {
    let id = parse_id(&id)?;
    patch.validate()?;
    let doc = serde_json::to_value(&patch)?;
    let result = state.store.update(Collection::Bookings, id, doc).await?;
    Ok(Json(result))
}
