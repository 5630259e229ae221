//! Scripted in-process providers for integration testing
//!
//! The executor only sees the [`ProviderClient`] trait, so tests drive it
//! with deterministic scripted clients instead of network mocks.

use async_trait::async_trait;
use routing_core::{
    EngineError, EngineResult, ProviderClient, ProviderId, ProviderResponse, RequestDescriptor,
};
use routing_providers::ProviderRegistry;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// How a scripted provider responds to every probe
#[derive(Debug, Clone)]
pub enum ProviderBehavior {
    /// Succeed quickly
    Healthy,
    /// Return a retryable upstream failure
    Failing {
        /// HTTP status attached to the failure
        status: Option<u16>,
    },
    /// Return a non-retryable authentication failure
    AuthFailing,
    /// Sleep before answering, to trip latency ceilings
    Slow(Duration),
}

/// A deterministic in-process provider
pub struct ScriptedProvider {
    id: ProviderId,
    behavior: ProviderBehavior,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    /// Create a provider with the given behavior
    pub fn new(id: impl Into<ProviderId>, behavior: ProviderBehavior) -> Self {
        Self {
            id: id.into(),
            behavior,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of probes this provider has received
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProviderClient for ScriptedProvider {
    fn id(&self) -> &ProviderId {
        &self.id
    }

    async fn probe(&self, _request: &RequestDescriptor) -> EngineResult<ProviderResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        match &self.behavior {
            ProviderBehavior::Healthy => {
                Ok(ProviderResponse::new(self.id.clone(), Duration::from_millis(5)))
            }
            ProviderBehavior::Failing { status } => Err(EngineError::provider(
                self.id.as_str(),
                "scripted upstream failure",
                *status,
                true,
            )),
            ProviderBehavior::AuthFailing => Err(EngineError::provider(
                self.id.as_str(),
                "invalid credentials",
                Some(401),
                false,
            )),
            ProviderBehavior::Slow(delay) => {
                tokio::time::sleep(*delay).await;
                Ok(ProviderResponse::new(self.id.clone(), *delay))
            }
        }
    }
}

/// Build a registry of scripted providers
///
/// Returns the registry plus handles for call-count assertions.
pub fn scripted_registry(
    specs: Vec<(&str, ProviderBehavior)>,
) -> (Arc<ProviderRegistry>, HashMap<String, Arc<ScriptedProvider>>) {
    let registry = ProviderRegistry::new();
    let mut handles = HashMap::new();

    for (id, behavior) in specs {
        let provider = Arc::new(ScriptedProvider::new(id, behavior));
        handles.insert(id.to_string(), provider.clone());
        registry
            .register(provider)
            .expect("duplicate scripted provider");
    }

    (Arc::new(registry), handles)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_provider_counts_calls() {
        let provider = ScriptedProvider::new("mock", ProviderBehavior::Healthy);
        let request = RequestDescriptor::builder()
            .model("gpt-4o")
            .build()
            .unwrap();

        assert!(provider.probe(&request).await.is_ok());
        assert!(provider.probe(&request).await.is_ok());
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn test_failing_provider_is_retryable() {
        let provider = ScriptedProvider::new("down", ProviderBehavior::Failing { status: Some(503) });
        let request = RequestDescriptor::builder()
            .model("gpt-4o")
            .build()
            .unwrap();

        assert!(provider.probe(&request).await.unwrap_err().is_retryable());
    }

    #[tokio::test]
    async fn test_auth_failing_provider_is_not_retryable() {
        let provider = ScriptedProvider::new("locked", ProviderBehavior::AuthFailing);
        let request = RequestDescriptor::builder()
            .model("gpt-4o")
            .build()
            .unwrap();

        assert!(!provider.probe(&request).await.unwrap_err().is_retryable());
    }
}
