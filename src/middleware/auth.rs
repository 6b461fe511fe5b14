use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;

use crate::auth::{self, Claims};
use crate::error::ApiError;
use crate::AppState;

/// Name of the session cookie carrying the signed token
pub const TOKEN_COOKIE: &str = "token";

/// Authenticated caller context extracted from the session token
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub email: String,
    pub name: Option<String>,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            email: claims.email,
            name: claims.name,
        }
    }
}

/// Token gate for protected routes. Reads the `token` cookie, verifies it,
/// and injects the decoded identity into request extensions. Missing and
/// invalid tokens are both rejected with 401 before any handler runs.
pub async fn require_auth(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = jar
        .get(TOKEN_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .ok_or_else(|| ApiError::unauthorized("Unauthorized Access"))?;

    let claims = auth::verify_token(&token, &state.config.security.token_secret).map_err(|e| {
        tracing::debug!("token verification failed: {}", e);
        ApiError::unauthorized("Unauthorized Access")
    })?;

    request.extensions_mut().insert(AuthUser::from(claims));
    Ok(next.run(request).await)
}
