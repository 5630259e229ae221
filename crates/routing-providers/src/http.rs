//! HTTP probe client.
//!
//! Issues one bounded POST against a provider's endpoint per attempt and
//! classifies the response for the failover executor. No internal retries;
//! advancing past failures is the executor's job.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use routing_core::{
    EngineError, EngineResult, ProviderClient, ProviderId, ProviderResponse, RequestDescriptor,
};
use secrecy::{ExposeSecret, SecretString};
use std::time::{Duration, Instant};
use tracing::{debug, trace, warn};
use url::Url;

/// Default per-request timeout for the underlying HTTP client
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default path probed on the provider endpoint
pub const DEFAULT_PROBE_PATH: &str = "/v1/chat/completions";

/// HTTP provider client configuration
#[derive(Debug, Clone)]
pub struct HttpProviderConfig {
    /// Provider instance ID
    pub id: ProviderId,
    /// Base endpoint URL (e.g. `https://api.openai.com`)
    pub endpoint: Url,
    /// Bearer token sent with each probe, if any
    pub api_key: Option<SecretString>,
    /// Hard client-side timeout per probe
    pub timeout: Duration,
    /// Path appended to the endpoint for probes
    pub probe_path: String,
}

impl HttpProviderConfig {
    /// Create a new configuration
    ///
    /// # Errors
    /// Returns a validation error if the endpoint is not a valid URL
    pub fn new(id: impl Into<ProviderId>, endpoint: &str) -> EngineResult<Self> {
        let endpoint = Url::parse(endpoint).map_err(|e| {
            EngineError::validation(
                format!("invalid provider endpoint '{endpoint}': {e}"),
                Some("endpoint".to_string()),
                "invalid_endpoint",
            )
        })?;

        Ok(Self {
            id: id.into(),
            endpoint,
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
            probe_path: DEFAULT_PROBE_PATH.to_string(),
        })
    }

    /// Set the API key
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::new(api_key.into()));
        self
    }

    /// Set the timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the probe path
    #[must_use]
    pub fn with_probe_path(mut self, path: impl Into<String>) -> Self {
        self.probe_path = path.into();
        self
    }

    /// Full probe URL
    #[must_use]
    pub fn probe_url(&self) -> String {
        let base = self.endpoint.as_str().trim_end_matches('/');
        format!("{}{}", base, self.probe_path)
    }
}

/// A [`ProviderClient`] backed by a real HTTP endpoint
pub struct HttpProviderClient {
    config: HttpProviderConfig,
    client: Client,
}

impl HttpProviderClient {
    /// Create a new client
    ///
    /// # Errors
    /// Returns an internal error if the HTTP client cannot be constructed
    pub fn new(config: HttpProviderConfig) -> EngineResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| EngineError::internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    /// The client configuration
    #[must_use]
    pub fn config(&self) -> &HttpProviderConfig {
        &self.config
    }

    fn classify_status(&self, status: StatusCode) -> EngineError {
        let retryable = status.as_u16() == 408
            || status == StatusCode::TOO_MANY_REQUESTS
            || status.is_server_error();

        EngineError::provider(
            self.config.id.as_str(),
            format!("probe returned status {status}"),
            Some(status.as_u16()),
            retryable,
        )
    }
}

#[async_trait]
impl ProviderClient for HttpProviderClient {
    fn id(&self) -> &ProviderId {
        &self.config.id
    }

    async fn probe(&self, request: &RequestDescriptor) -> EngineResult<ProviderResponse> {
        let url = self.config.probe_url();
        let body = serde_json::json!({
            "model": request.model,
            "prompt_length": request.prompt_length,
            "probe": true,
        });

        trace!(provider = %self.config.id, url = %url, "Sending provider probe");
        let start = Instant::now();

        let mut builder = self.client.post(&url).json(&body);
        if let Some(api_key) = &self.config.api_key {
            builder = builder.bearer_auth(api_key.expose_secret());
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                EngineError::timeout(self.config.timeout)
            } else {
                warn!(provider = %self.config.id, error = %e, "Provider unreachable");
                EngineError::provider(
                    self.config.id.as_str(),
                    format!("request failed: {e}"),
                    None,
                    true,
                )
            }
        })?;

        let latency = start.elapsed();
        let status = response.status();

        if status.is_success() {
            debug!(
                provider = %self.config.id,
                status = status.as_u16(),
                latency_ms = latency.as_millis(),
                "Provider probe succeeded"
            );
            return Ok(ProviderResponse::new(self.config.id.clone(), latency));
        }

        Err(self.classify_status(status))
    }
}
