use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{any, get, post},
};
use http::{HeaderValue, Method, header};
use std::time::Duration;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::{handlers, state::AppState};

/// Largest accepted request body.
const BODY_LIMIT_BYTES: usize = 64 * 1024;

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/api", get(handlers::health::health))
        .route("/api/payu/checkout", post(handlers::checkout::checkout))
        .route("/api/payu/confirm", post(handlers::notifications::confirm))
        .with_state(state.clone());

    let browser_routes = Router::new()
        .route("/payu/redirect/{token}", get(handlers::checkout::redirect))
        .route("/payu/response", any(handlers::notifications::response))
        .with_state(state.clone());

    let app = Router::new()
        .merge(api_routes)
        .merge(browser_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(true))
                .on_request(DefaultOnRequest::default().level(Level::DEBUG))
                .on_response(DefaultOnResponse::default().level(Level::DEBUG))
                .on_failure(DefaultOnFailure::default().level(Level::ERROR)),
        )
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES));

    match cors_layer(&state.config.cors_origins) {
        Some(cors) => app.layer(cors),
        None => app,
    }
}

fn cors_layer(origins: &[String]) -> Option<CorsLayer> {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("⚠️  Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    if origins.is_empty() {
        return None;
    }

    Some(
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
            .max_age(Duration::from_secs(86400)),
    )
}
