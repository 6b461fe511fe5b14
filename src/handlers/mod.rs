pub mod bookings;
pub mod services;
pub mod session;

use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::store::{FieldFilter, QueryField};

/// Optional `?email=` query parameter shared by the scoped list endpoints
#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    pub email: Option<String>,
}

/// Parse a path-segment identifier into the store's native id type.
pub(crate) fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw)
        .map_err(|_| ApiError::invalid_identifier(format!("invalid identifier: {}", raw)))
}

/// Build the equality filter for an email-scoped list. Callers may only
/// scope to their own email; asking for someone else's is forbidden.
/// Omitting the parameter keeps the original match-all behavior.
pub(crate) fn scoped_email_filter(
    field: QueryField,
    requested: Option<String>,
    user: &AuthUser,
) -> Result<Option<FieldFilter>, ApiError> {
    match requested {
        Some(email) if email != user.email => Err(ApiError::forbidden("Forbidden Access")),
        Some(email) => Ok(Some(FieldFilter {
            field,
            value: email,
        })),
        None => Ok(None),
    }
}
