use axum::http::{header, HeaderValue};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::{create_cors_layer, create_security_headers_layer, Config};
use crate::handlers::{health_check, not_found, pricing, snapshots};
use crate::state::AppState;

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/pricing/quote", post(pricing::quote))
        .route("/pricing/schedule", get(pricing::schedule))
        .route("/pricing/policy", get(pricing::policy))
        .route(
            "/events/:event_id/fee-snapshots",
            post(snapshots::create).get(snapshots::list),
        )
        // Quotes depend on live sold counts and must never be served stale
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
}

pub fn create_routes(config: &Config, state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .fallback(not_found)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(create_security_headers_layer(config.production))
        .layer(create_cors_layer(&config.cors_allowed_origins))
}
