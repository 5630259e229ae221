//! Shared application state.

use routing_core::{EventSink, ProviderId, ProviderLookup};
use routing_failover::{FailoverExecutor, HealthLedger};
use routing_providers::ProviderRegistry;
use routing_store::{InMemoryEventLog, RuleStore};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// State shared by every handler
#[derive(Clone)]
pub struct AppState {
    /// Rule and failover-config store
    pub store: Arc<RuleStore>,
    /// Failover event history
    pub events: Arc<InMemoryEventLog>,
    /// Registered provider clients
    pub registry: Arc<ProviderRegistry>,
    /// Failover executor
    pub executor: Arc<FailoverExecutor>,
    /// Provider used when no routing rule matches
    pub default_provider: Option<ProviderId>,
    /// Process start time, for uptime reporting
    pub started_at: Instant,
}

impl AppState {
    /// Create a builder
    #[must_use]
    pub fn builder() -> AppStateBuilder {
        AppStateBuilder::default()
    }
}

/// Builder for [`AppState`]
#[derive(Default)]
pub struct AppStateBuilder {
    store: Option<Arc<RuleStore>>,
    events: Option<Arc<InMemoryEventLog>>,
    registry: Option<Arc<ProviderRegistry>>,
    health: Option<Arc<HealthLedger>>,
    default_provider: Option<ProviderId>,
    attempt_timeout: Option<Duration>,
}

impl AppStateBuilder {
    /// Set the rule store
    #[must_use]
    pub fn store(mut self, store: Arc<RuleStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the event history
    #[must_use]
    pub fn events(mut self, events: Arc<InMemoryEventLog>) -> Self {
        self.events = Some(events);
        self
    }

    /// Set the provider registry
    #[must_use]
    pub fn registry(mut self, registry: Arc<ProviderRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Set the health ledger backing the error-rate gate
    #[must_use]
    pub fn health(mut self, health: Arc<HealthLedger>) -> Self {
        self.health = Some(health);
        self
    }

    /// Set the default provider used when no rule matches
    #[must_use]
    pub fn default_provider(mut self, provider: ProviderId) -> Self {
        self.default_provider = Some(provider);
        self
    }

    /// Set the attempt timeout used when a config sets no latency ceiling
    #[must_use]
    pub fn attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = Some(timeout);
        self
    }

    /// Build the state, wiring an executor over the configured pieces
    #[must_use]
    pub fn build(self) -> AppState {
        let store = self.store.unwrap_or_else(|| Arc::new(RuleStore::new()));
        let events = self
            .events
            .unwrap_or_else(|| Arc::new(InMemoryEventLog::default()));
        let registry = self
            .registry
            .unwrap_or_else(|| Arc::new(ProviderRegistry::new()));
        let health = self
            .health
            .unwrap_or_else(|| Arc::new(HealthLedger::default()));

        let lookup: Arc<dyn ProviderLookup> = registry.clone();
        let sink: Arc<dyn EventSink> = events.clone();
        let mut executor = FailoverExecutor::new(lookup, sink, health);
        if let Some(timeout) = self.attempt_timeout {
            executor = executor.with_attempt_timeout(timeout);
        }

        AppState {
            store,
            events,
            registry,
            executor: Arc::new(executor),
            default_provider: self.default_provider,
            started_at: Instant::now(),
        }
    }
}
