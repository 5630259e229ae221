//! Routing rule definitions.

use crate::conditions::RuleConditions;
use chrono::{DateTime, Utc};
use routing_core::{EngineError, EngineResult, ProviderId, RuleId};
use serde::{Deserialize, Serialize};

/// A named, prioritized condition-to-provider mapping
///
/// Rules are created and edited through the admin API and evaluated
/// read-only per inference request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingRule {
    /// Unique identifier within the workspace; generated by the store when
    /// the payload omits it
    #[serde(default)]
    pub id: RuleId,

    /// Display name shown in the admin console
    pub name: String,

    /// Evaluation priority; higher values are evaluated first
    #[serde(default)]
    pub priority: i32,

    /// Conditions a request must satisfy; empty means match everything
    #[serde(default)]
    pub conditions: RuleConditions,

    /// Provider requests matching this rule are routed to
    pub target_provider: ProviderId,

    /// Disabled rules never match
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

impl RoutingRule {
    /// Create a new enabled rule with no conditions
    pub fn new(
        id: impl Into<RuleId>,
        name: impl Into<String>,
        target_provider: impl Into<ProviderId>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            name: name.into(),
            priority: 0,
            conditions: RuleConditions::default(),
            target_provider: target_provider.into(),
            enabled: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the priority
    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Set the conditions
    #[must_use]
    pub fn with_conditions(mut self, conditions: RuleConditions) -> Self {
        self.conditions = conditions;
        self
    }

    /// Disable the rule
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Validate the rule
    ///
    /// # Errors
    /// Returns a validation error naming the offending field
    pub fn validate(&self) -> EngineResult<()> {
        if self.id.is_empty() {
            return Err(EngineError::validation(
                "rule id must not be empty",
                Some("id".to_string()),
                "empty_rule_id",
            ));
        }

        if self.name.trim().is_empty() {
            return Err(EngineError::validation(
                "rule name must not be empty",
                Some("name".to_string()),
                "empty_rule_name",
            ));
        }

        if self.target_provider.is_empty() {
            return Err(EngineError::validation(
                "target_provider must not be empty",
                Some("target_provider".to_string()),
                "empty_target_provider",
            ));
        }

        self.conditions.validate()
    }
}

/// Partial update applied to an existing rule via the admin API
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RuleUpdate {
    /// New display name
    #[serde(default)]
    pub name: Option<String>,
    /// New priority
    #[serde(default)]
    pub priority: Option<i32>,
    /// Replacement condition set
    #[serde(default)]
    pub conditions: Option<RuleConditions>,
    /// New target provider
    #[serde(default)]
    pub target_provider: Option<ProviderId>,
    /// Enable or disable the rule
    #[serde(default)]
    pub enabled: Option<bool>,
}

impl RuleUpdate {
    /// Apply the update to a rule, bumping `updated_at`
    #[must_use]
    pub fn apply(self, mut rule: RoutingRule) -> RoutingRule {
        if let Some(name) = self.name {
            rule.name = name;
        }
        if let Some(priority) = self.priority {
            rule.priority = priority;
        }
        if let Some(conditions) = self.conditions {
            rule.conditions = conditions;
        }
        if let Some(target) = self.target_provider {
            rule.target_provider = target;
        }
        if let Some(enabled) = self.enabled {
            rule.enabled = enabled;
        }
        rule.updated_at = Utc::now();
        rule
    }
}
