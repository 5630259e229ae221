//! HTTP request handlers for the engine API.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use routing_core::{
    CancelToken, ConfigId, ProviderId, RequestDescriptor, RuleId, WorkspaceId,
};
use routing_failover::{
    ConfigUpdate, ExecutionMode, FailoverConfig, FailoverReport, FailoverStatus,
};
use routing_rules::{select, RoutingRule, RuleUpdate};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::{error::ApiError, state::AppState};

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Version
    pub version: String,
    /// Uptime in seconds
    pub uptime_seconds: u64,
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
    })
}

/// Readiness check endpoint
pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    if state.registry.is_empty() {
        (StatusCode::SERVICE_UNAVAILABLE, "no providers registered")
    } else {
        (StatusCode::OK, "ready")
    }
}

/// Liveness check endpoint
pub async fn liveness_check() -> impl IntoResponse {
    (StatusCode::OK, "alive")
}

// =============================================================================
// Routing rules
// =============================================================================

/// List a workspace's routing rules
#[instrument(skip(state))]
pub async fn list_rules(
    State(state): State<AppState>,
    Path(workspace): Path<WorkspaceId>,
) -> Json<Vec<RoutingRule>> {
    Json(state.store.snapshot().rules_for(&workspace).to_vec())
}

/// Create a routing rule
#[instrument(skip(state, rule), fields(rule_name = %rule.name))]
pub async fn create_rule(
    State(state): State<AppState>,
    Path(workspace): Path<WorkspaceId>,
    Json(rule): Json<RoutingRule>,
) -> Result<(StatusCode, Json<RoutingRule>), ApiError> {
    let created = state.store.create_rule(&workspace, rule)?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Fetch a routing rule
#[instrument(skip(state))]
pub async fn get_rule(
    State(state): State<AppState>,
    Path((workspace, rule_id)): Path<(WorkspaceId, RuleId)>,
) -> Result<Json<RoutingRule>, ApiError> {
    Ok(Json(state.store.get_rule(&workspace, &rule_id)?))
}

/// Apply a partial update to a routing rule
#[instrument(skip(state, update))]
pub async fn update_rule(
    State(state): State<AppState>,
    Path((workspace, rule_id)): Path<(WorkspaceId, RuleId)>,
    Json(update): Json<RuleUpdate>,
) -> Result<Json<RoutingRule>, ApiError> {
    Ok(Json(state.store.update_rule(&workspace, &rule_id, update)?))
}

/// Delete a routing rule
#[instrument(skip(state))]
pub async fn delete_rule(
    State(state): State<AppState>,
    Path((workspace, rule_id)): Path<(WorkspaceId, RuleId)>,
) -> Result<StatusCode, ApiError> {
    state.store.delete_rule(&workspace, &rule_id)?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Failover configs
// =============================================================================

/// List a workspace's failover configs
#[instrument(skip(state))]
pub async fn list_configs(
    State(state): State<AppState>,
    Path(workspace): Path<WorkspaceId>,
) -> Json<Vec<FailoverConfig>> {
    Json(state.store.snapshot().configs_for(&workspace).to_vec())
}

/// Create a failover config
#[instrument(skip(state, config), fields(primary = %config.primary_provider))]
pub async fn create_config(
    State(state): State<AppState>,
    Path(workspace): Path<WorkspaceId>,
    Json(config): Json<FailoverConfig>,
) -> Result<(StatusCode, Json<FailoverConfig>), ApiError> {
    let created = state.store.create_config(&workspace, config)?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Fetch a failover config
#[instrument(skip(state))]
pub async fn get_config(
    State(state): State<AppState>,
    Path((workspace, config_id)): Path<(WorkspaceId, ConfigId)>,
) -> Result<Json<FailoverConfig>, ApiError> {
    Ok(Json(state.store.get_config(&workspace, &config_id)?))
}

/// Apply a partial update to a failover config
#[instrument(skip(state, update))]
pub async fn update_config(
    State(state): State<AppState>,
    Path((workspace, config_id)): Path<(WorkspaceId, ConfigId)>,
    Json(update): Json<ConfigUpdate>,
) -> Result<Json<FailoverConfig>, ApiError> {
    Ok(Json(state.store.update_config(&workspace, &config_id, update)?))
}

/// Delete a failover config
#[instrument(skip(state))]
pub async fn delete_config(
    State(state): State<AppState>,
    Path((workspace, config_id)): Path<(WorkspaceId, ConfigId)>,
) -> Result<StatusCode, ApiError> {
    state.store.delete_config(&workspace, &config_id)?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Evaluation
// =============================================================================

/// Response for the route evaluation endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct RouteResponse {
    /// Whether a rule matched
    pub matched: bool,
    /// Winning rule, when one matched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<RuleId>,
    /// Provider the request routes to
    pub provider: ProviderId,
    /// Whether the configured default provider was used
    pub used_default: bool,
}

/// POST /v1/workspaces/:workspace/route - evaluate the rule selector
#[instrument(skip(state, request), fields(model = %request.model))]
pub async fn route_request(
    State(state): State<AppState>,
    Path(workspace): Path<WorkspaceId>,
    Json(request): Json<RequestDescriptor>,
) -> Result<Json<RouteResponse>, ApiError> {
    request.validate()?;

    let snapshot = state.store.snapshot();
    let rules = snapshot.rules_for(&workspace);

    if let Some(rule) = select(rules, &request) {
        info!(
            workspace = %workspace,
            request_id = %request.id,
            rule_id = %rule.id,
            provider = %rule.target_provider,
            "Request routed by rule"
        );
        return Ok(Json(RouteResponse {
            matched: true,
            rule_id: Some(rule.id.clone()),
            provider: rule.target_provider.clone(),
            used_default: false,
        }));
    }

    match &state.default_provider {
        Some(default) => {
            debug!(
                workspace = %workspace,
                request_id = %request.id,
                provider = %default,
                "No rule matched, using default provider"
            );
            Ok(Json(RouteResponse {
                matched: false,
                rule_id: None,
                provider: default.clone(),
                used_default: true,
            }))
        }
        None => Err(ApiError::not_found(
            "no routing rule matched and no default provider is configured",
        )),
    }
}

/// POST /v1/workspaces/:workspace/failover/:config_id/execute - live run
///
/// Exhaustion is surfaced as 502 with the full report attached; it is
/// never swallowed into a success response.
#[instrument(skip(state, request), fields(model = %request.model))]
pub async fn execute_failover(
    State(state): State<AppState>,
    Path((workspace, config_id)): Path<(WorkspaceId, ConfigId)>,
    Json(request): Json<RequestDescriptor>,
) -> Result<Response, ApiError> {
    request.validate()?;
    let config = state.store.get_config(&workspace, &config_id)?;

    let report = state
        .executor
        .execute(&config, &request, ExecutionMode::Live, &CancelToken::new())
        .await?;

    Ok(report_response(report))
}

/// POST /v1/workspaces/:workspace/failover/:config_id/test - test harness
///
/// Runs the same executor with `event_type = test` events and without
/// touching live health state. Always 200: the report itself is the
/// diagnostic product.
#[instrument(skip(state, request), fields(model = %request.model))]
pub async fn test_failover(
    State(state): State<AppState>,
    Path((workspace, config_id)): Path<(WorkspaceId, ConfigId)>,
    Json(request): Json<RequestDescriptor>,
) -> Result<Json<FailoverReport>, ApiError> {
    request.validate()?;
    let config = state.store.get_config(&workspace, &config_id)?;

    let report = state
        .executor
        .execute(&config, &request, ExecutionMode::Test, &CancelToken::new())
        .await?;

    Ok(Json(report))
}

fn report_response(report: FailoverReport) -> Response {
    let status = match report.status {
        FailoverStatus::Done => StatusCode::OK,
        FailoverStatus::Exhausted => StatusCode::BAD_GATEWAY,
        FailoverStatus::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
    };
    (status, Json(report)).into_response()
}

// =============================================================================
// Events and stats
// =============================================================================

/// Query parameters for the event history endpoint
#[derive(Debug, Default, Deserialize)]
pub struct EventsQuery {
    /// Restrict to one failover config
    #[serde(default)]
    pub config_id: Option<ConfigId>,
    /// Maximum events returned (default 100)
    #[serde(default)]
    pub limit: Option<usize>,
}

/// GET /admin/workspaces/:workspace/events - failover history, newest first
#[instrument(skip(state))]
pub async fn list_events(
    State(state): State<AppState>,
    Path(workspace): Path<WorkspaceId>,
    Query(query): Query<EventsQuery>,
) -> Result<Json<Vec<routing_core::FailoverEvent>>, ApiError> {
    let limit = query.limit.unwrap_or(100);

    if let Some(config_id) = &query.config_id {
        // Resolving through the store scopes the history to the workspace
        state.store.get_config(&workspace, config_id)?;
        return Ok(Json(state.events.for_config(config_id, limit)));
    }

    let snapshot = state.store.snapshot();
    let workspace_configs: Vec<ConfigId> = snapshot
        .configs_for(&workspace)
        .iter()
        .map(|config| config.id.clone())
        .collect();

    let events = state
        .events
        .recent(usize::MAX)
        .into_iter()
        .filter(|event| workspace_configs.contains(&event.config_id))
        .take(limit)
        .collect();

    Ok(Json(events))
}

/// Engine statistics response
#[derive(Debug, Serialize)]
pub struct EngineStats {
    /// Total routing rules across workspaces
    pub rules: usize,
    /// Total failover configs across workspaces
    pub configs: usize,
    /// Registered providers
    pub providers: usize,
    /// Retained failover events
    pub events: usize,
}

/// GET /admin/stats - engine counters
pub async fn engine_stats(State(state): State<AppState>) -> Json<EngineStats> {
    let snapshot = state.store.snapshot();
    Json(EngineStats {
        rules: snapshot.rule_count(),
        configs: snapshot.config_count(),
        providers: state.registry.len(),
        events: state.events.len(),
    })
}
