//! Decision-trail reports.
//!
//! The reporter packages an executor run into a [`FailoverReport`] consumed
//! identically by the live and test endpoints, so test mode is
//! representative of production behavior.

use crate::trigger::TriggerReason;
use chrono::{DateTime, Utc};
use routing_core::{ConfigId, EngineError, EngineResult, ProviderId, RequestId};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Whether an executor run serves live traffic or the test harness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// Production path: events are `failover`/`recovery`, health samples
    /// are recorded
    Live,
    /// Test harness: events are `test`, live state is left untouched
    Test,
}

impl std::fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Live => f.write_str("live"),
            Self::Test => f.write_str("test"),
        }
    }
}

/// Terminal state of an executor run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailoverStatus {
    /// A provider served the request
    Done,
    /// Every provider in the chain failed
    Exhausted,
    /// The caller cancelled between attempts
    Cancelled,
}

/// What happened to a single chain position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptOutcome {
    /// The provider answered within bounds
    Succeeded,
    /// The attempt hit the latency ceiling
    TimedOut,
    /// The provider returned an error
    Failed,
    /// The error-rate gate skipped the provider without a live call
    Skipped,
    /// Cancellation arrived before this attempt started
    Cancelled,
}

/// One entry in the decision trail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderAttempt {
    /// Provider at this chain position
    pub provider: ProviderId,
    /// Outcome of the attempt
    pub outcome: AttemptOutcome,
    /// Observed latency, when a live call completed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    /// Trigger that advanced the chain, absent on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger: Option<TriggerReason>,
    /// Error description, when the attempt failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProviderAttempt {
    /// Record a successful attempt
    #[must_use]
    pub fn succeeded(provider: ProviderId, latency: Duration) -> Self {
        Self {
            provider,
            outcome: AttemptOutcome::Succeeded,
            latency_ms: Some(latency.as_millis() as u64),
            trigger: None,
            error: None,
        }
    }

    /// Record an attempt cut off by the latency ceiling
    #[must_use]
    pub fn timed_out(provider: ProviderId, limit_ms: u64) -> Self {
        Self {
            provider,
            outcome: AttemptOutcome::TimedOut,
            latency_ms: Some(limit_ms),
            trigger: Some(TriggerReason::LatencyExceeded { limit_ms }),
            error: None,
        }
    }

    /// Record a failed attempt
    #[must_use]
    pub fn failed(provider: ProviderId, error: String, trigger: TriggerReason) -> Self {
        Self {
            provider,
            outcome: AttemptOutcome::Failed,
            latency_ms: None,
            trigger: Some(trigger),
            error: Some(error),
        }
    }

    /// Record a provider skipped by the error-rate gate
    #[must_use]
    pub fn skipped(provider: ProviderId, trigger: TriggerReason) -> Self {
        Self {
            provider,
            outcome: AttemptOutcome::Skipped,
            latency_ms: None,
            trigger: Some(trigger),
            error: None,
        }
    }

    /// Record an attempt pre-empted by cancellation
    #[must_use]
    pub fn cancelled(provider: ProviderId) -> Self {
        Self {
            provider,
            outcome: AttemptOutcome::Cancelled,
            latency_ms: None,
            trigger: Some(TriggerReason::Cancelled),
            error: None,
        }
    }
}

/// The packaged decision trail of one executor run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailoverReport {
    /// Configuration that was executed
    pub config_id: ConfigId,
    /// Request the run served
    pub request_id: RequestId,
    /// Live or test
    pub mode: ExecutionMode,
    /// Terminal state
    pub status: FailoverStatus,
    /// Attempted providers in chain order
    pub attempts: Vec<ProviderAttempt>,
    /// Provider that served the request, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_provider: Option<ProviderId>,
    /// Human-readable summary of the run
    pub reason: String,
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// Total run duration in milliseconds
    pub duration_ms: u64,
}

impl FailoverReport {
    /// Providers consumed by the run, in attempt order
    #[must_use]
    pub fn providers_tried(&self) -> Vec<&ProviderId> {
        self.attempts.iter().map(|attempt| &attempt.provider).collect()
    }

    /// Whether a provider served the request
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == FailoverStatus::Done
    }

    /// Convert to a hard result for callers that need the winning provider
    ///
    /// # Errors
    /// Returns the exhaustion or cancellation error for terminal failures
    pub fn into_result(self) -> EngineResult<ProviderId> {
        match self.status {
            FailoverStatus::Done => self.final_provider.ok_or_else(|| {
                EngineError::internal("report marked done without a final provider")
            }),
            FailoverStatus::Exhausted => Err(EngineError::exhausted(
                self.config_id.as_str(),
                self.attempts.len(),
            )),
            FailoverStatus::Cancelled => Err(EngineError::Cancelled),
        }
    }
}
