//! Failover event contracts.
//!
//! Every failover transition, recovery, and test run appends an immutable
//! [`FailoverEvent`] through an [`EventSink`]. The history is the audit
//! surface the admin console renders.

use crate::error::EngineResult;
use crate::types::{ConfigId, ProviderId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of failover event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailoverEventType {
    /// The chain advanced away from a failing provider during live traffic
    Failover,
    /// A previously failing provider served live traffic again
    Recovery,
    /// The event was produced by the explicit test harness
    Test,
}

impl std::fmt::Display for FailoverEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Failover => f.write_str("failover"),
            Self::Recovery => f.write_str("recovery"),
            Self::Test => f.write_str("test"),
        }
    }
}

/// A single entry in the append-only failover history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailoverEvent {
    /// Failover configuration the event belongs to
    pub config_id: ConfigId,
    /// When the event was recorded
    pub timestamp: DateTime<Utc>,
    /// Event kind
    pub event_type: FailoverEventType,
    /// Provider the chain was on when the event fired
    pub from_provider: ProviderId,
    /// Provider the chain advanced to, absent on terminal events
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_provider: Option<ProviderId>,
    /// Human-readable trigger description
    pub reason: String,
    /// Whether the chain could advance (or, for test events, the outcome)
    pub success: bool,
}

impl FailoverEvent {
    /// Record a live failover transition
    ///
    /// `success` is derived from whether a next provider exists.
    pub fn failover(
        config_id: ConfigId,
        from: ProviderId,
        to: Option<ProviderId>,
        reason: impl Into<String>,
    ) -> Self {
        let success = to.is_some();
        Self {
            config_id,
            timestamp: Utc::now(),
            event_type: FailoverEventType::Failover,
            from_provider: from,
            to_provider: to,
            reason: reason.into(),
            success,
        }
    }

    /// Record a provider recovering on live traffic
    pub fn recovery(config_id: ConfigId, provider: ProviderId, reason: impl Into<String>) -> Self {
        Self {
            config_id,
            timestamp: Utc::now(),
            event_type: FailoverEventType::Recovery,
            from_provider: provider,
            to_provider: None,
            reason: reason.into(),
            success: true,
        }
    }

    /// Record an event produced by the test harness
    pub fn test(
        config_id: ConfigId,
        from: ProviderId,
        to: Option<ProviderId>,
        reason: impl Into<String>,
        success: bool,
    ) -> Self {
        Self {
            config_id,
            timestamp: Utc::now(),
            event_type: FailoverEventType::Test,
            from_provider: from,
            to_provider: to,
            reason: reason.into(),
            success,
        }
    }
}

/// Destination for failover events
///
/// The store crate provides the in-memory implementation; anything that can
/// durably append (a database, a webhook fan-out) can stand in behind this
/// trait.
pub trait EventSink: Send + Sync {
    /// Append an event to the history
    ///
    /// # Errors
    /// Returns a store error if the history cannot accept the event; the
    /// executor treats that as fatal for the evaluation.
    fn append(&self, event: FailoverEvent) -> EngineResult<()>;
}
