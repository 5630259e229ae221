//! Rule conditions and the condition matcher.
//!
//! A condition field is satisfied when absent (wildcard) or when the
//! request's corresponding value falls within the specified bound. All
//! present fields must hold for the rule to match.

use routing_core::{EngineError, EngineResult, RequestDescriptor};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A model name filter: exact match or a simple glob with a single `*`
/// at the start or end of the pattern
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelPattern(String);

impl ModelPattern {
    /// Create a pattern from its string form
    pub fn new(pattern: impl Into<String>) -> Self {
        Self(pattern.into())
    }

    /// The raw pattern string
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Validate the pattern shape
    ///
    /// # Errors
    /// Returns a validation error when the pattern is empty or uses `*`
    /// anywhere other than the first or last position
    pub fn validate(&self) -> EngineResult<()> {
        if self.0.is_empty() {
            return Err(EngineError::validation(
                "model pattern must not be empty",
                Some("conditions.model".to_string()),
                "empty_model_pattern",
            ));
        }

        let stars = self.0.matches('*').count();
        let valid = match stars {
            0 => true,
            1 => self.0.starts_with('*') || self.0.ends_with('*'),
            _ => self.0 == "*",
        };

        if !valid {
            return Err(EngineError::validation(
                format!(
                    "model pattern '{}' may only use '*' as a prefix or suffix",
                    self.0
                ),
                Some("conditions.model".to_string()),
                "invalid_model_pattern",
            ));
        }

        Ok(())
    }

    /// Whether the given model name matches this pattern
    #[must_use]
    pub fn matches(&self, model: &str) -> bool {
        if self.0 == "*" {
            return true;
        }
        if let Some(suffix) = self.0.strip_prefix('*') {
            return model.ends_with(suffix);
        }
        if let Some(prefix) = self.0.strip_suffix('*') {
            return model.starts_with(prefix);
        }
        model == self.0
    }
}

impl fmt::Display for ModelPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModelPattern {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Optional bounds a request must satisfy for a rule to apply
///
/// Ranges are inclusive at both ends; a single bound leaves the other side
/// open.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleConditions {
    /// Model name filter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<ModelPattern>,

    /// Minimum prompt length (characters, inclusive)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_prompt_length: Option<u32>,

    /// Maximum prompt length (characters, inclusive)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_prompt_length: Option<u32>,

    /// Ceiling on the request's declared cost budget, in dollars
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_cost: Option<f64>,

    /// The rule applies only when the request's declared latency
    /// requirement is at most this many milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_latency_ms: Option<u64>,
}

impl RuleConditions {
    /// A condition set that matches every request
    #[must_use]
    pub fn any() -> Self {
        Self::default()
    }

    /// Whether no bounds are specified
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.model.is_none()
            && self.min_prompt_length.is_none()
            && self.max_prompt_length.is_none()
            && self.max_cost.is_none()
            && self.max_latency_ms.is_none()
    }

    /// Validate the condition set
    ///
    /// Malformed conditions are rejected here, at rule-creation time;
    /// evaluation assumes validated rules.
    ///
    /// # Errors
    /// Returns a validation error naming the offending field
    pub fn validate(&self) -> EngineResult<()> {
        if let Some(pattern) = &self.model {
            pattern.validate()?;
        }

        if let (Some(min), Some(max)) = (self.min_prompt_length, self.max_prompt_length) {
            if min > max {
                return Err(EngineError::validation(
                    format!("min_prompt_length {min} exceeds max_prompt_length {max}"),
                    Some("conditions.min_prompt_length".to_string()),
                    "inverted_prompt_length_range",
                ));
            }
        }

        if let Some(cost) = self.max_cost {
            if !cost.is_finite() || cost < 0.0 {
                return Err(EngineError::validation(
                    format!("max_cost must be a non-negative number, got {cost}"),
                    Some("conditions.max_cost".to_string()),
                    "invalid_max_cost",
                ));
            }
        }

        if self.max_latency_ms == Some(0) {
            return Err(EngineError::validation(
                "max_latency_ms must be greater than zero",
                Some("conditions.max_latency_ms".to_string()),
                "invalid_max_latency",
            ));
        }

        Ok(())
    }

    /// Evaluate the conditions against a request descriptor
    ///
    /// Pure function: no side effects, no hidden state. A request that
    /// omits an optional field (cost budget, latency requirement) satisfies
    /// any bound on that field.
    #[must_use]
    pub fn matches(&self, request: &RequestDescriptor) -> bool {
        if let Some(pattern) = &self.model {
            if !pattern.matches(&request.model) {
                return false;
            }
        }

        if let Some(min) = self.min_prompt_length {
            if request.prompt_length < min {
                return false;
            }
        }

        if let Some(max) = self.max_prompt_length {
            if request.prompt_length > max {
                return false;
            }
        }

        if let (Some(ceiling), Some(budget)) = (self.max_cost, request.cost_budget) {
            if budget > ceiling {
                return false;
            }
        }

        if let (Some(ceiling), Some(required)) =
            (self.max_latency_ms, request.latency_requirement_ms)
        {
            if required > ceiling {
                return false;
            }
        }

        true
    }
}
