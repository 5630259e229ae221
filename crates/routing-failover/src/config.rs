//! Failover configuration types.

use chrono::{DateTime, Utc};
use routing_core::{ConfigId, EngineError, EngineResult, ProviderId, WorkspaceId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Trigger thresholds for a failover chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailoverConditions {
    /// Per-attempt latency ceiling in milliseconds; exceeding it counts as
    /// a failure trigger
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,

    /// Error-rate ceiling in `0.0..=1.0`; a provider whose observed rate
    /// exceeds it is skipped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_rate: Option<f64>,

    /// Minimum number of recorded samples before the error-rate gate may
    /// trip for a provider
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,
}

fn default_retry_count() -> u32 {
    3
}

impl Default for FailoverConditions {
    fn default() -> Self {
        Self {
            latency_ms: None,
            error_rate: None,
            retry_count: default_retry_count(),
        }
    }
}

impl FailoverConditions {
    /// Validate the thresholds
    ///
    /// # Errors
    /// Returns a validation error naming the offending field
    pub fn validate(&self) -> EngineResult<()> {
        if self.latency_ms == Some(0) {
            return Err(EngineError::validation(
                "latency_ms must be greater than zero",
                Some("failover_conditions.latency_ms".to_string()),
                "invalid_latency_ceiling",
            ));
        }

        if let Some(rate) = self.error_rate {
            if !rate.is_finite() || !(0.0..=1.0).contains(&rate) {
                return Err(EngineError::validation(
                    format!("error_rate must be between 0.0 and 1.0, got {rate}"),
                    Some("failover_conditions.error_rate".to_string()),
                    "invalid_error_rate",
                ));
            }
        }

        if self.retry_count == 0 {
            return Err(EngineError::validation(
                "retry_count must be at least 1",
                Some("failover_conditions.retry_count".to_string()),
                "invalid_retry_count",
            ));
        }

        Ok(())
    }
}

/// A primary provider with an ordered fallback chain
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailoverConfig {
    /// Unique identifier; generated by the store when the payload omits it
    #[serde(default)]
    pub id: ConfigId,

    /// Workspace the configuration belongs to; the admin API fills this
    /// from the request path
    #[serde(default)]
    pub workspace_id: WorkspaceId,

    /// Provider attempted first
    pub primary_provider: ProviderId,

    /// Fallback providers in attempt order
    #[serde(default)]
    pub fallback_providers: Vec<ProviderId>,

    /// Trigger thresholds
    #[serde(default)]
    pub failover_conditions: FailoverConditions,

    /// Disabled configurations cannot be executed
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Creation time
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,

    /// Last modification time
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

fn default_enabled() -> bool {
    true
}

impl FailoverConfig {
    /// Create a new enabled configuration with an empty fallback chain
    pub fn new(
        id: impl Into<ConfigId>,
        workspace_id: impl Into<WorkspaceId>,
        primary_provider: impl Into<ProviderId>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            workspace_id: workspace_id.into(),
            primary_provider: primary_provider.into(),
            fallback_providers: Vec::new(),
            failover_conditions: FailoverConditions::default(),
            enabled: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the fallback chain
    #[must_use]
    pub fn with_fallbacks<I, P>(mut self, fallbacks: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<ProviderId>,
    {
        self.fallback_providers = fallbacks.into_iter().map(Into::into).collect();
        self
    }

    /// Set the trigger thresholds
    #[must_use]
    pub fn with_conditions(mut self, conditions: FailoverConditions) -> Self {
        self.failover_conditions = conditions;
        self
    }

    /// Disable the configuration
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// The full attempt chain: primary first, then fallbacks in order
    pub fn chain(&self) -> impl Iterator<Item = &ProviderId> {
        std::iter::once(&self.primary_provider).chain(self.fallback_providers.iter())
    }

    /// Number of providers in the attempt chain
    #[must_use]
    pub fn chain_len(&self) -> usize {
        1 + self.fallback_providers.len()
    }

    /// Validate the configuration
    ///
    /// # Errors
    /// Returns a validation error naming the offending field
    pub fn validate(&self) -> EngineResult<()> {
        if self.id.is_empty() {
            return Err(EngineError::validation(
                "config id must not be empty",
                Some("id".to_string()),
                "empty_config_id",
            ));
        }

        if self.workspace_id.is_empty() {
            return Err(EngineError::validation(
                "workspace_id must not be empty",
                Some("workspace_id".to_string()),
                "empty_workspace_id",
            ));
        }

        if self.primary_provider.is_empty() {
            return Err(EngineError::validation(
                "primary_provider must not be empty",
                Some("primary_provider".to_string()),
                "empty_primary_provider",
            ));
        }

        let mut seen = HashSet::new();
        for fallback in &self.fallback_providers {
            if fallback.is_empty() {
                return Err(EngineError::validation(
                    "fallback provider ids must not be empty",
                    Some("fallback_providers".to_string()),
                    "empty_fallback_provider",
                ));
            }
            if *fallback == self.primary_provider {
                return Err(EngineError::validation(
                    format!(
                        "primary provider {} must not appear in its own fallback chain",
                        self.primary_provider
                    ),
                    Some("fallback_providers".to_string()),
                    "primary_in_fallbacks",
                ));
            }
            if !seen.insert(fallback.clone()) {
                return Err(EngineError::validation(
                    format!("duplicate fallback provider {fallback}"),
                    Some("fallback_providers".to_string()),
                    "duplicate_fallback_provider",
                ));
            }
        }

        self.failover_conditions.validate()
    }
}

/// Partial update applied to an existing configuration via the admin API
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigUpdate {
    /// New primary provider
    #[serde(default)]
    pub primary_provider: Option<ProviderId>,
    /// Replacement fallback chain
    #[serde(default)]
    pub fallback_providers: Option<Vec<ProviderId>>,
    /// Replacement trigger thresholds
    #[serde(default)]
    pub failover_conditions: Option<FailoverConditions>,
    /// Enable or disable the configuration
    #[serde(default)]
    pub enabled: Option<bool>,
}

impl ConfigUpdate {
    /// Apply the update to a configuration, bumping `updated_at`
    #[must_use]
    pub fn apply(self, mut config: FailoverConfig) -> FailoverConfig {
        if let Some(primary) = self.primary_provider {
            config.primary_provider = primary;
        }
        if let Some(fallbacks) = self.fallback_providers {
            config.fallback_providers = fallbacks;
        }
        if let Some(conditions) = self.failover_conditions {
            config.failover_conditions = conditions;
        }
        if let Some(enabled) = self.enabled {
            config.enabled = enabled;
        }
        config.updated_at = Utc::now();
        config
    }
}
