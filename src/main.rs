//! # LLM Routing Engine
//!
//! Provider routing and failover decision engine for LLM gateways.
//!
//! ## Features
//!
//! - Priority-ordered routing rules with condition matching
//! - Primary/fallback failover chains with trigger-based advancement
//! - Snapshot-consistent rule store with per-workspace isolation
//! - Append-only failover event history
//!
//! ## Usage
//!
//! ```bash
//! # Start with default configuration
//! llm-routing-engine
//!
//! # Start with a custom config file
//! ROUTING_ENGINE_CONFIG=/etc/routing-engine.yaml llm-routing-engine
//!
//! # Start with environment overrides
//! ROUTING_ENGINE_PORT=9000 llm-routing-engine
//! ```

use anyhow::Context;
use routing_config::{load_config, EngineConfig};
use routing_failover::HealthLedger;
use routing_providers::{HttpProviderClient, HttpProviderConfig, ProviderRegistry};
use routing_server::{AppState, Server, ServerConfig};
use routing_store::{InMemoryEventLog, RuleStore};
use routing_telemetry::{init_logging, LoggingConfig};
use std::env;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Application entry point
#[tokio::main]
async fn main() {
    // Initialize logging first
    if let Err(e) = init_logging(&LoggingConfig::new().with_level("info")) {
        eprintln!("Failed to initialize logging: {e}");
    }

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting LLM Routing Engine"
    );

    // Run the application
    if let Err(e) = run().await {
        error!(error = %e, "Application failed");
        std::process::exit(1);
    }
}

/// Main application logic
async fn run() -> anyhow::Result<()> {
    // Load configuration
    let config = load_config().await.context("failed to load configuration")?;

    info!(
        host = %config.server.host,
        port = config.server.port,
        providers = config.providers.len(),
        "Configuration loaded"
    );

    // Create provider registry
    let registry = create_provider_registry(&config)?;

    info!(providers = registry.len(), "Provider registry initialized");

    // Build application state
    let store = Arc::new(RuleStore::new());
    let events = Arc::new(InMemoryEventLog::new(config.routing.event_capacity));
    let health = Arc::new(HealthLedger::new(config.routing.health_window));

    let mut builder = AppState::builder()
        .store(store)
        .events(events)
        .registry(Arc::new(registry))
        .health(health)
        .attempt_timeout(config.routing.attempt_timeout);

    if let Some(default) = config.routing.default_provider.clone() {
        builder = builder.default_provider(default);
    }

    let state = builder.build();

    // Create server
    let server_config = ServerConfig::new()
        .with_host(&config.server.host)
        .with_port(config.server.port)
        .with_shutdown_grace(config.server.shutdown_grace);

    let server = Server::new(server_config, state);

    // Run server
    server.run().await?;

    Ok(())
}

/// Create the provider registry from configuration
fn create_provider_registry(config: &EngineConfig) -> anyhow::Result<ProviderRegistry> {
    let registry = ProviderRegistry::new();

    for entry in config.enabled_providers() {
        let api_key = entry
            .api_key_env
            .as_ref()
            .and_then(|variable| env::var(variable).ok());

        if entry.api_key_env.is_some() && api_key.is_none() {
            warn!(
                provider = %entry.id,
                variable = entry.api_key_env.as_deref().unwrap_or_default(),
                "API key variable not set, registering provider without credentials"
            );
        }

        let mut provider_config = HttpProviderConfig::new(entry.id.clone(), &entry.endpoint)
            .with_context(|| format!("invalid endpoint for provider {}", entry.id))?;

        if let Some(api_key) = api_key {
            provider_config = provider_config.with_api_key(api_key);
        }
        if let Some(path) = &entry.probe_path {
            provider_config = provider_config.with_probe_path(path);
        }

        let client = HttpProviderClient::new(provider_config)
            .with_context(|| format!("failed to build client for provider {}", entry.id))?;
        registry
            .register(Arc::new(client))
            .with_context(|| format!("failed to register provider {}", entry.id))?;
    }

    if registry.is_empty() {
        warn!("No providers configured; routing decisions will have nothing to execute against");
    }

    Ok(registry)
}
