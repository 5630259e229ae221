//! Per-provider health ledger.
//!
//! A sliding window of attempt outcomes per provider, shared across
//! executor runs. The error-rate gate trips once a provider has at least
//! `retry_count` samples and its failure rate exceeds the configured
//! ceiling; the executor then skips the provider instead of burning a live
//! attempt on it.

use crate::config::FailoverConditions;
use dashmap::DashMap;
use routing_core::ProviderId;
use std::collections::VecDeque;

/// Default number of samples retained per provider
pub const DEFAULT_WINDOW_SIZE: usize = 50;

/// Sliding-window health state for all known providers
#[derive(Debug)]
pub struct HealthLedger {
    windows: DashMap<ProviderId, SampleWindow>,
    window_size: usize,
}

#[derive(Debug, Default)]
struct SampleWindow {
    /// true = failed attempt
    samples: VecDeque<bool>,
    consecutive_failures: u32,
}

impl SampleWindow {
    fn push(&mut self, failed: bool, capacity: usize) {
        if self.samples.len() == capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(failed);
        if failed {
            self.consecutive_failures += 1;
        } else {
            self.consecutive_failures = 0;
        }
    }

    fn error_rate(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let failures = self.samples.iter().filter(|failed| **failed).count();
        failures as f64 / self.samples.len() as f64
    }
}

/// Point-in-time health view of a single provider
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderHealth {
    /// Number of samples currently in the window
    pub samples: usize,
    /// Failure rate over the window
    pub error_rate: f64,
    /// Consecutive failures since the last success
    pub consecutive_failures: u32,
}

impl Default for HealthLedger {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_SIZE)
    }
}

impl HealthLedger {
    /// Create a ledger retaining up to `window_size` samples per provider
    #[must_use]
    pub fn new(window_size: usize) -> Self {
        Self {
            windows: DashMap::new(),
            window_size: window_size.max(1),
        }
    }

    /// Record a successful attempt
    ///
    /// Returns `true` when the provider had consecutive failures before
    /// this success, i.e. it just recovered.
    pub fn record_success(&self, provider: &ProviderId) -> bool {
        let mut window = self.windows.entry(provider.clone()).or_default();
        let recovered = window.consecutive_failures > 0;
        window.push(false, self.window_size);
        recovered
    }

    /// Record a failed attempt
    pub fn record_failure(&self, provider: &ProviderId) {
        let mut window = self.windows.entry(provider.clone()).or_default();
        window.push(true, self.window_size);
    }

    /// Current health view of a provider, if any samples exist
    #[must_use]
    pub fn health(&self, provider: &ProviderId) -> Option<ProviderHealth> {
        self.windows.get(provider).map(|window| ProviderHealth {
            samples: window.samples.len(),
            error_rate: window.error_rate(),
            consecutive_failures: window.consecutive_failures,
        })
    }

    /// Whether the error-rate gate trips for a provider
    ///
    /// Returns the observed rate when the provider has at least
    /// `retry_count` samples and its failure rate exceeds the configured
    /// ceiling. Providers with no ceiling configured never trip.
    #[must_use]
    pub fn is_tripped(&self, provider: &ProviderId, conditions: &FailoverConditions) -> Option<f64> {
        let ceiling = conditions.error_rate?;
        let window = self.windows.get(provider)?;

        if window.samples.len() < conditions.retry_count as usize {
            return None;
        }

        let observed = window.error_rate();
        (observed > ceiling).then_some(observed)
    }

    /// Drop all samples for a provider
    pub fn reset(&self, provider: &ProviderId) {
        self.windows.remove(provider);
    }

    /// Number of providers with recorded samples
    #[must_use]
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    /// Whether any samples have been recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}
