//! Provider traits and attempt outcomes.
//!
//! The failover executor never talks to a concrete provider type; it goes
//! through [`ProviderClient`] for single attempts and [`ProviderLookup`] to
//! resolve identifiers from a registry.

use crate::descriptor::RequestDescriptor;
use crate::error::EngineResult;
use crate::types::ProviderId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Outcome of a successful provider attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderResponse {
    /// Provider that served the attempt
    pub provider: ProviderId,
    /// Observed round-trip latency
    pub latency: Duration,
}

impl ProviderResponse {
    /// Create a new provider response
    pub fn new(provider: impl Into<ProviderId>, latency: Duration) -> Self {
        Self {
            provider: provider.into(),
            latency,
        }
    }
}

/// A client capable of one bounded attempt against an upstream provider
///
/// Implementations must not retry internally; the failover executor owns
/// the decision to move on to the next provider.
#[async_trait]
pub trait ProviderClient: Send + Sync {
    /// Identifier of the provider this client talks to
    fn id(&self) -> &ProviderId;

    /// Perform a single attempt for the given request
    ///
    /// # Errors
    /// Returns a provider or timeout error describing the failed attempt
    async fn probe(&self, request: &RequestDescriptor) -> EngineResult<ProviderResponse>;
}

/// Resolves provider identifiers to clients
pub trait ProviderLookup: Send + Sync {
    /// Look up a provider client by identifier
    fn get(&self, id: &ProviderId) -> Option<Arc<dyn ProviderClient>>;

    /// Whether a provider is registered
    fn contains(&self, id: &ProviderId) -> bool {
        self.get(id).is_some()
    }
}
