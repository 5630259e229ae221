//! Route definitions for the engine API.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::{handlers, state::AppState};

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health endpoints
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/live", get(handlers::liveness_check))
        // Evaluation endpoints
        .nest("/v1", evaluation_routes())
        // Admin endpoints
        .nest("/admin", admin_routes())
        // Apply middleware
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        // Add state
        .with_state(state)
}

/// Per-request evaluation routes
fn evaluation_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/workspaces/:workspace/route",
            post(handlers::route_request),
        )
        .route(
            "/workspaces/:workspace/failover/:config_id/execute",
            post(handlers::execute_failover),
        )
        .route(
            "/workspaces/:workspace/failover/:config_id/test",
            post(handlers::test_failover),
        )
}

/// Admin/management routes
fn admin_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/workspaces/:workspace/rules",
            get(handlers::list_rules).post(handlers::create_rule),
        )
        .route(
            "/workspaces/:workspace/rules/:rule_id",
            get(handlers::get_rule)
                .patch(handlers::update_rule)
                .delete(handlers::delete_rule),
        )
        .route(
            "/workspaces/:workspace/failover",
            get(handlers::list_configs).post(handlers::create_config),
        )
        .route(
            "/workspaces/:workspace/failover/:config_id",
            get(handlers::get_config)
                .patch(handlers::update_config)
                .delete(handlers::delete_config),
        )
        .route(
            "/workspaces/:workspace/events",
            get(handlers::list_events),
        )
        .route("/stats", get(handlers::engine_stats))
}
