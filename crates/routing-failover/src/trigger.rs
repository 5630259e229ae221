//! Trigger classification.
//!
//! A trigger is the measured condition that causes the executor to advance
//! past a provider. The variants carry the observation so event reasons and
//! reports stay self-describing.

use routing_core::EngineError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why the failover chain advanced past a provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TriggerReason {
    /// The attempt exceeded the configured latency ceiling
    LatencyExceeded {
        /// Ceiling that was breached, in milliseconds
        limit_ms: u64,
    },
    /// The provider returned an error or was unreachable
    ProviderError {
        /// Failure description
        message: String,
        /// HTTP status, when the failure came off the wire
        #[serde(default, skip_serializing_if = "Option::is_none")]
        status_code: Option<u16>,
    },
    /// The provider's observed error rate tripped the gate
    ErrorRateExceeded {
        /// Observed failure rate over the sample window
        observed: f64,
        /// Configured ceiling
        limit: f64,
    },
    /// The caller cancelled the evaluation
    Cancelled,
}

impl TriggerReason {
    /// Classify a failed provider attempt
    #[must_use]
    pub fn from_error(error: &EngineError) -> Self {
        match error {
            EngineError::Timeout { elapsed } => Self::LatencyExceeded {
                limit_ms: elapsed.as_millis() as u64,
            },
            EngineError::Provider {
                message,
                status_code,
                ..
            } => Self::ProviderError {
                message: message.clone(),
                status_code: *status_code,
            },
            other => Self::ProviderError {
                message: other.to_string(),
                status_code: None,
            },
        }
    }
}

impl fmt::Display for TriggerReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LatencyExceeded { limit_ms } => {
                write!(f, "latency ceiling of {limit_ms}ms exceeded")
            }
            Self::ProviderError {
                message,
                status_code: Some(code),
            } => write!(f, "provider error (status {code}): {message}"),
            Self::ProviderError {
                message,
                status_code: None,
            } => write!(f, "provider error: {message}"),
            Self::ErrorRateExceeded { observed, limit } => {
                write!(f, "error rate {observed:.2} above ceiling {limit:.2}")
            }
            Self::Cancelled => f.write_str("cancelled"),
        }
    }
}
