use std::sync::Arc;

use axum::{
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;
use service::registration::RegistrationService;

use crate::{observability, openapi};

pub mod admin;
pub mod public;

/// Shared handler state. The registration service carries the catalog, the
/// counter store, and the admin credential.
#[derive(Clone)]
pub struct ServerState {
    pub service: Arc<RegistrationService>,
}

#[utoipa::path(get, path = "/", tag = "health", responses((status = 200, description = "OK")))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router, including public and admin routes
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    // Public routes (liveness, registration API, status view)
    let public_routes = Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/check-limit/:program", get(public::check_limit))
        .route("/register/:program", post(public::register))
        .route("/status", get(public::status_page))
        .route("/metrics", get(observability::metrics))
        .route("/api-docs/openapi.json", get(openapi::serve));

    // Admin routes, key-protected per handler
    let admin_routes = Router::new()
        .route("/admin", get(admin::admin_view))
        .route("/admin/add/:program", post(admin::admin_add))
        .route("/admin/cancel/:program", post(admin::admin_cancel))
        .route("/admin/set/:program", post(admin::admin_set));

    public_routes
        .merge(admin_routes)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // One span per request with method and path, at INFO
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                // Response events carry status and latency
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
