//! Engine configuration model.

use routing_core::ProviderId;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Top-level engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerSection,

    /// Routing and failover defaults
    #[serde(default)]
    pub routing: RoutingSection,

    /// Upstream providers
    #[serde(default)]
    pub providers: Vec<ProviderEntry>,
}

impl EngineConfig {
    /// Validate the configuration
    ///
    /// # Errors
    /// Returns a message naming the offending field
    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == 0 {
            return Err("server.port must not be zero".to_string());
        }

        let mut seen = std::collections::HashSet::new();
        for provider in &self.providers {
            if provider.id.is_empty() {
                return Err("providers[].id must not be empty".to_string());
            }
            if provider.endpoint.trim().is_empty() {
                return Err(format!("provider {} has an empty endpoint", provider.id));
            }
            if !seen.insert(&provider.id) {
                return Err(format!("duplicate provider id {}", provider.id));
            }
        }

        if let Some(default) = &self.routing.default_provider {
            let known = self
                .providers
                .iter()
                .any(|provider| provider.enabled && provider.id == *default);
            if !known {
                return Err(format!(
                    "routing.default_provider {default} is not an enabled provider"
                ));
            }
        }

        Ok(())
    }

    /// Enabled providers only
    pub fn enabled_providers(&self) -> impl Iterator<Item = &ProviderEntry> {
        self.providers.iter().filter(|provider| provider.enabled)
    }
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSection {
    /// Bind host
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port
    #[serde(default = "default_port")]
    pub port: u16,

    /// How long to drain in-flight requests on shutdown
    #[serde(default = "default_shutdown_grace", with = "humantime_serde")]
    pub shutdown_grace: Duration,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            shutdown_grace: default_shutdown_grace(),
        }
    }
}

/// Routing and failover defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingSection {
    /// Provider used when no routing rule matches
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_provider: Option<ProviderId>,

    /// Attempt timeout used when a failover config sets no latency ceiling
    #[serde(default = "default_attempt_timeout", with = "humantime_serde")]
    pub attempt_timeout: Duration,

    /// Samples retained per provider in the health ledger
    #[serde(default = "default_health_window")]
    pub health_window: usize,

    /// Failover events retained in the in-memory history
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
}

impl Default for RoutingSection {
    fn default() -> Self {
        Self {
            default_provider: None,
            attempt_timeout: default_attempt_timeout(),
            health_window: default_health_window(),
            event_capacity: default_event_capacity(),
        }
    }
}

/// One upstream provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderEntry {
    /// Provider identifier referenced by rules and failover chains
    pub id: ProviderId,

    /// Base endpoint URL
    pub endpoint: String,

    /// Environment variable holding the API key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,

    /// Path probed on the endpoint, when non-standard
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probe_path: Option<String>,

    /// Disabled providers are not registered
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_shutdown_grace() -> Duration {
    Duration::from_secs(30)
}

fn default_attempt_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_health_window() -> usize {
    50
}

fn default_event_capacity() -> usize {
    10_000
}

fn default_enabled() -> bool {
    true
}
