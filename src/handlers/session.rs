//! Session endpoints: token issuance, logout, liveness, health.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use axum_extra::extract::WithRejection;
use serde_json::json;

use crate::auth::{self, Claims};
use crate::error::ApiError;
use crate::middleware::TOKEN_COOKIE;
use crate::models::Identity;
use crate::AppState;

/// POST /jwt - sign a token for the submitted identity and set the session
/// cookie. There is no server-side user store; the identity is whatever the
/// client presents, validated for shape only.
pub async fn issue_token(
    State(state): State<AppState>,
    WithRejection(Json(identity), _): WithRejection<Json<Identity>, ApiError>,
) -> Result<Response, ApiError> {
    identity.validate()?;

    let expiry_secs = state.config.security.token_expiry_secs;
    let claims = Claims::new(identity, expiry_secs);
    let token = auth::generate_token(&claims, &state.config.security.token_secret)?;

    Ok((
        [(header::SET_COOKIE, session_cookie(&token, expiry_secs))],
        Json(json!({ "success": true })),
    )
        .into_response())
}

/// POST /logOut - clear the session cookie. The removal cookie is sent
/// unconditionally and carries the same attributes as issuance; a cross-site
/// browser drops a removal cookie that is not Secure + SameSite=None.
pub async fn log_out() -> impl IntoResponse {
    (
        [(header::SET_COOKIE, clear_session_cookie())],
        Json(json!({ "success": true })),
    )
}

/// GET / - plain-text liveness probe
pub async fn root() -> &'static str {
    "Service booking API is running"
}

/// GET /health - liveness plus a store connectivity check
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "success": true, "data": { "status": "ok", "store": "ok" } })),
        ),
        Err(e) => {
            tracing::error!("store health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "success": false, "error": "store unavailable" })),
            )
        }
    }
}

/// Session cookie contract: HttpOnly, Secure, cross-site allowed, one-hour
/// max-age by default.
fn session_cookie(token: &str, max_age_secs: u64) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; Secure; SameSite=None; Max-Age={}",
        TOKEN_COOKIE, token, max_age_secs
    )
}

/// Empty value plus Max-Age=0 expires the cookie immediately.
fn clear_session_cookie() -> String {
    session_cookie("", 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_cookie_carries_required_attributes() {
        let cookie = session_cookie("abc.def.ghi", 3600);
        assert!(cookie.starts_with("token=abc.def.ghi;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Secure"));
        assert!(cookie.contains("SameSite=None"));
        assert!(cookie.contains("Max-Age=3600"));
    }

    #[test]
    fn clear_cookie_expires_with_matching_attributes() {
        let cookie = clear_session_cookie();
        assert!(cookie.starts_with("token=;"));
        assert!(cookie.contains("Max-Age=0"));
        assert!(cookie.contains("Secure"));
        assert!(cookie.contains("SameSite=None"));
        assert!(cookie.contains("Path=/"));
    }
}
