//! Request descriptors.
//!
//! A [`RequestDescriptor`] is the ephemeral, per-evaluation view of an
//! inference request: just the fields the condition matcher and failover
//! executor need, none of the payload.

use crate::error::{EngineError, EngineResult};
use crate::types::RequestId;
use serde::{Deserialize, Serialize};

/// The input to a routing or failover evaluation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestDescriptor {
    /// Unique request identifier, generated when the caller omits one
    #[serde(default = "RequestId::generate")]
    pub id: RequestId,

    /// Target model name (e.g. "gpt-4o", "claude-3-opus")
    pub model: String,

    /// Prompt length in characters
    pub prompt_length: u32,

    /// Declared cost budget for this request, in dollars
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_budget: Option<f64>,

    /// Declared latency requirement in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latency_requirement_ms: Option<u64>,
}

impl RequestDescriptor {
    /// Create a new builder for `RequestDescriptor`
    #[must_use]
    pub fn builder() -> RequestDescriptorBuilder {
        RequestDescriptorBuilder::default()
    }

    /// Validate the descriptor
    ///
    /// # Errors
    /// Returns a validation error if any field is out of range
    pub fn validate(&self) -> EngineResult<()> {
        if self.model.trim().is_empty() {
            return Err(EngineError::validation(
                "model must not be empty",
                Some("model".to_string()),
                "empty_model",
            ));
        }

        if let Some(budget) = self.cost_budget {
            if !budget.is_finite() || budget < 0.0 {
                return Err(EngineError::validation(
                    format!("cost_budget must be a non-negative number, got {budget}"),
                    Some("cost_budget".to_string()),
                    "invalid_cost_budget",
                ));
            }
        }

        if self.latency_requirement_ms == Some(0) {
            return Err(EngineError::validation(
                "latency_requirement_ms must be greater than zero",
                Some("latency_requirement_ms".to_string()),
                "invalid_latency_requirement",
            ));
        }

        Ok(())
    }
}

/// Builder for [`RequestDescriptor`]
#[derive(Debug, Default)]
pub struct RequestDescriptorBuilder {
    id: Option<RequestId>,
    model: Option<String>,
    prompt_length: u32,
    cost_budget: Option<f64>,
    latency_requirement_ms: Option<u64>,
}

impl RequestDescriptorBuilder {
    /// Set the request ID
    #[must_use]
    pub fn id(mut self, id: RequestId) -> Self {
        self.id = Some(id);
        self
    }

    /// Set the model name
    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the prompt length
    #[must_use]
    pub fn prompt_length(mut self, length: u32) -> Self {
        self.prompt_length = length;
        self
    }

    /// Set the cost budget
    #[must_use]
    pub fn cost_budget(mut self, budget: f64) -> Self {
        self.cost_budget = Some(budget);
        self
    }

    /// Set the latency requirement
    #[must_use]
    pub fn latency_requirement_ms(mut self, latency: u64) -> Self {
        self.latency_requirement_ms = Some(latency);
        self
    }

    /// Build and validate the descriptor
    ///
    /// # Errors
    /// Returns a validation error if required fields are missing or invalid
    pub fn build(self) -> EngineResult<RequestDescriptor> {
        let descriptor = RequestDescriptor {
            id: self.id.unwrap_or_else(RequestId::generate),
            model: self.model.ok_or_else(|| {
                EngineError::validation(
                    "model is required",
                    Some("model".to_string()),
                    "missing_model",
                )
            })?,
            prompt_length: self.prompt_length,
            cost_budget: self.cost_budget,
            latency_requirement_ms: self.latency_requirement_ms,
        };
        descriptor.validate()?;
        Ok(descriptor)
    }
}
