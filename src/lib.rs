pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod resources;
pub mod state;
pub mod validation;
pub mod views;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderName, HeaderValue};
use axum::response::Redirect;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::api::{ApiClient, ApiError};
use crate::auth::LOGIN_PATH;
use crate::config::Config;
use crate::state::{AppState, SharedState};

pub fn build_app(config: Config) -> Result<Router, ApiError> {
    let api = ApiClient::new(&config)?;
    tracing::info!(api = api.base_url(), "Backend API configured");

    let max_upload_size = config.max_upload_size;
    let state: SharedState = Arc::new(AppState { config, api });

    let app = Router::new()
        .merge(views::view_routes(&state))
        .route("/health", axum::routing::get(health))
        // Unknown paths go to the login page
        .fallback(|| async { Redirect::to(LOGIN_PATH) })
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_upload_size))
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-content-type-options"),
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-frame-options"),
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("referrer-policy"),
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ))
        .with_state(state);

    Ok(app)
}

async fn health() -> &'static str {
    "ok"
}
