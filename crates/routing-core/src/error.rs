//! Error types for the routing engine.
//!
//! A single error enum covers every fallible surface so that `?` composes
//! across crate boundaries. Constructor helpers keep call sites terse.

use std::time::Duration;
use thiserror::Error;

/// Result alias used throughout the engine
pub type EngineResult<T> = Result<T, EngineError>;

/// Unified error type for the routing engine
#[derive(Debug, Error)]
pub enum EngineError {
    /// Input failed creation-time validation
    #[error("validation failed: {message}")]
    Validation {
        /// Human-readable description
        message: String,
        /// Offending field, when known
        field: Option<String>,
        /// Stable machine-readable code
        code: String,
    },

    /// A referenced entity does not exist
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Entity kind ("rule", "failover config", ...)
        kind: &'static str,
        /// Identifier that failed to resolve
        id: String,
    },

    /// An upstream provider attempt failed
    #[error("provider {provider} failed: {message}")]
    Provider {
        /// Provider identifier
        provider: String,
        /// Failure description
        message: String,
        /// HTTP status, when the failure came off the wire
        status_code: Option<u16>,
        /// Whether the failure is worth failing over for
        retryable: bool,
    },

    /// A provider attempt exceeded its latency bound
    #[error("provider attempt timed out after {elapsed:?}")]
    Timeout {
        /// How long the attempt ran before being cut off
        elapsed: Duration,
    },

    /// Every provider in the failover chain failed
    #[error("failover chain exhausted for config {config_id}: {attempts} providers tried")]
    Exhausted {
        /// The failover configuration that ran out of providers
        config_id: String,
        /// Number of chain positions consumed
        attempts: usize,
    },

    /// The caller cancelled the evaluation
    #[error("evaluation cancelled")]
    Cancelled,

    /// The rule store could not serve the evaluation
    #[error("rule store unavailable: {message}")]
    Store {
        /// Failure description
        message: String,
    },

    /// Invariant violation inside the engine
    #[error("internal error: {message}")]
    Internal {
        /// Failure description
        message: String,
    },
}

impl EngineError {
    /// Create a validation error
    pub fn validation(
        message: impl Into<String>,
        field: Option<String>,
        code: impl Into<String>,
    ) -> Self {
        Self::Validation {
            message: message.into(),
            field,
            code: code.into(),
        }
    }

    /// Create a not-found error
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Create a provider failure error
    pub fn provider(
        provider: impl Into<String>,
        message: impl Into<String>,
        status_code: Option<u16>,
        retryable: bool,
    ) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
            status_code,
            retryable,
        }
    }

    /// Create a timeout error
    #[must_use]
    pub fn timeout(elapsed: Duration) -> Self {
        Self::Timeout { elapsed }
    }

    /// Create an exhausted-chain error
    pub fn exhausted(config_id: impl Into<String>, attempts: usize) -> Self {
        Self::Exhausted {
            config_id: config_id.into(),
            attempts,
        }
    }

    /// Create a store-unavailable error
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether failing over to another provider could help
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Provider { retryable, .. } => *retryable,
            Self::Timeout { .. } => true,
            Self::Validation { .. }
            | Self::NotFound { .. }
            | Self::Exhausted { .. }
            | Self::Cancelled
            | Self::Store { .. }
            | Self::Internal { .. } => false,
        }
    }
}
