pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod store;

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use config::AppConfig;
use store::DocumentStore;

/// Shared application state, dependency-injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn DocumentStore>,
}

/// Build the full router. Public surface: liveness, health, token issuance,
/// logout, and the service catalog. Everything that mutates state or reads
/// caller-scoped data sits behind the token gate.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(public_routes())
        .merge(protected_routes(&state))
        .layer(cors_layer(&state.config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    use handlers::{services, session};

    Router::new()
        .route("/", get(session::root))
        .route("/health", get(session::health))
        .route("/jwt", post(session::issue_token))
        .route("/logOut", post(session::log_out))
        .route("/services", get(services::list))
}

fn protected_routes(state: &AppState) -> Router<AppState> {
    use handlers::{bookings, services};

    Router::new()
        .route("/services", post(services::create))
        .route("/userService", get(services::list_by_provider))
        .route(
            "/services/:id",
            get(services::get)
                .put(services::update)
                .delete(services::delete),
        )
        .route("/bookings", post(bookings::create).get(bookings::list))
        .route("/pendingWorks", get(bookings::pending_works))
        .route("/bookings/:id", put(bookings::update))
        .route_layer(from_fn_with_state(state.clone(), middleware::require_auth))
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    // The cookie contract requires credentialed cross-origin requests, so the
    // origin must be explicit rather than a wildcard.
    let origin = config
        .server
        .cors_origin
        .parse::<HeaderValue>()
        .unwrap_or_else(|_| HeaderValue::from_static("http://localhost:5173"));

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}
