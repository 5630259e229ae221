//! Provider registry.

use dashmap::DashMap;
use routing_core::{EngineError, EngineResult, ProviderClient, ProviderId, ProviderLookup};
use std::sync::Arc;
use tracing::info;

/// Concurrent map of provider identifiers to clients
///
/// Registered once at startup and read by every evaluation; the map itself
/// is lock-free for readers.
#[derive(Default)]
pub struct ProviderRegistry {
    providers: DashMap<ProviderId, Arc<dyn ProviderClient>>,
}

impl ProviderRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider client
    ///
    /// # Errors
    /// Returns a validation error if a client with the same id already
    /// exists
    pub fn register(&self, client: Arc<dyn ProviderClient>) -> EngineResult<()> {
        let id = client.id().clone();
        if self.providers.contains_key(&id) {
            return Err(EngineError::validation(
                format!("provider {id} is already registered"),
                Some("id".to_string()),
                "duplicate_provider",
            ));
        }

        info!(provider = %id, "Provider registered");
        self.providers.insert(id, client);
        Ok(())
    }

    /// Remove a provider client
    pub fn deregister(&self, id: &ProviderId) -> Option<Arc<dyn ProviderClient>> {
        self.providers.remove(id).map(|(_, client)| client)
    }

    /// All registered provider identifiers
    #[must_use]
    pub fn provider_ids(&self) -> Vec<ProviderId> {
        self.providers.iter().map(|entry| entry.key().clone()).collect()
    }

    /// Number of registered providers
    #[must_use]
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Whether the registry is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl ProviderLookup for ProviderRegistry {
    fn get(&self, id: &ProviderId) -> Option<Arc<dyn ProviderClient>> {
        self.providers.get(id).map(|entry| entry.value().clone())
    }
}
