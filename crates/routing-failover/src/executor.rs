//! The failover executor.
//!
//! One invocation walks a config's provider chain sequentially: attempt the
//! primary, advance past trigger-matching failures, stop on the first
//! success or when the chain runs out. Attempts never overlap and each
//! provider is attempted at most once per run.

use crate::config::FailoverConfig;
use crate::health::HealthLedger;
use crate::report::{ExecutionMode, FailoverReport, FailoverStatus, ProviderAttempt};
use crate::trigger::TriggerReason;
use chrono::Utc;
use routing_core::{
    CancelToken, EngineError, EngineResult, EventSink, FailoverEvent, ProviderId, ProviderLookup,
    RequestDescriptor,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Attempt timeout used when a config sets no latency ceiling
pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(30);

/// Walks failover chains for live requests and test runs
pub struct FailoverExecutor {
    providers: Arc<dyn ProviderLookup>,
    events: Arc<dyn EventSink>,
    health: Arc<HealthLedger>,
    default_attempt_timeout: Duration,
}

impl FailoverExecutor {
    /// Create a new executor
    pub fn new(
        providers: Arc<dyn ProviderLookup>,
        events: Arc<dyn EventSink>,
        health: Arc<HealthLedger>,
    ) -> Self {
        Self {
            providers,
            events,
            health,
            default_attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
        }
    }

    /// Override the fallback attempt timeout
    #[must_use]
    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.default_attempt_timeout = timeout;
        self
    }

    /// The health ledger backing the error-rate gate
    #[must_use]
    pub fn health(&self) -> &Arc<HealthLedger> {
        &self.health
    }

    /// Execute the chain for one request
    ///
    /// Providers are attempted strictly in order; cancellation is honored
    /// between attempts. Trigger-matching failures advance the chain;
    /// non-retryable provider errors (e.g. authentication failures) abort
    /// the run and propagate.
    ///
    /// # Errors
    /// Returns an error when the config is disabled, an attempt fails
    /// non-retryably, or the event history cannot accept an entry.
    /// Exhaustion and cancellation are reported through the returned
    /// [`FailoverReport`]; use [`FailoverReport::into_result`] to convert
    /// them into hard errors.
    pub async fn execute(
        &self,
        config: &FailoverConfig,
        request: &RequestDescriptor,
        mode: ExecutionMode,
        cancel: &CancelToken,
    ) -> EngineResult<FailoverReport> {
        if !config.enabled {
            return Err(EngineError::validation(
                format!("failover config {} is disabled", config.id),
                Some("enabled".to_string()),
                "config_disabled",
            ));
        }

        let started_at = Utc::now();
        let run_start = Instant::now();
        let chain: Vec<&ProviderId> = config.chain().collect();
        let attempt_timeout = config
            .failover_conditions
            .latency_ms
            .map_or(self.default_attempt_timeout, Duration::from_millis);

        let mut attempts: Vec<ProviderAttempt> = Vec::with_capacity(chain.len());

        debug!(
            config_id = %config.id,
            request_id = %request.id,
            mode = %mode,
            chain_len = chain.len(),
            attempt_timeout_ms = attempt_timeout.as_millis(),
            "Starting failover run"
        );

        for (position, provider_id) in chain.iter().enumerate() {
            let provider_id = (*provider_id).clone();
            let next = chain.get(position + 1).map(|id| (*id).clone());

            if cancel.is_cancelled() {
                attempts.push(ProviderAttempt::cancelled(provider_id.clone()));
                self.record_transition(mode, config, &provider_id, None, "cancelled")?;
                warn!(
                    config_id = %config.id,
                    request_id = %request.id,
                    provider = %provider_id,
                    "Failover run cancelled before attempt"
                );
                return Ok(self.finish(
                    config,
                    request,
                    mode,
                    FailoverStatus::Cancelled,
                    attempts,
                    None,
                    "cancelled by caller".to_string(),
                    started_at,
                    run_start,
                ));
            }

            if let Some(observed) =
                self.health.is_tripped(&provider_id, &config.failover_conditions)
            {
                let trigger = TriggerReason::ErrorRateExceeded {
                    observed,
                    limit: config.failover_conditions.error_rate.unwrap_or_default(),
                };
                warn!(
                    config_id = %config.id,
                    provider = %provider_id,
                    observed_rate = observed,
                    "Provider skipped by error-rate gate"
                );
                self.record_transition(
                    mode,
                    config,
                    &provider_id,
                    next.clone(),
                    &trigger.to_string(),
                )?;
                attempts.push(ProviderAttempt::skipped(provider_id, trigger));
                continue;
            }

            let outcome = match self.providers.get(&provider_id) {
                Some(client) => {
                    let attempt_start = Instant::now();
                    match tokio::time::timeout(attempt_timeout, client.probe(request)).await {
                        Ok(Ok(_response)) => Ok(attempt_start.elapsed()),
                        Ok(Err(error)) => Err(error),
                        Err(_elapsed) => Err(EngineError::timeout(attempt_timeout)),
                    }
                }
                None => Err(EngineError::provider(
                    provider_id.as_str(),
                    "provider not registered",
                    None,
                    true,
                )),
            };

            match outcome {
                Ok(latency) => {
                    if mode == ExecutionMode::Live {
                        let recovered = self.health.record_success(&provider_id);
                        if recovered && position == 0 {
                            self.events.append(FailoverEvent::recovery(
                                config.id.clone(),
                                provider_id.clone(),
                                "primary serving traffic again",
                            ))?;
                        }
                    }

                    attempts.push(ProviderAttempt::succeeded(provider_id.clone(), latency));
                    let reason = success_reason(&provider_id, position);

                    if mode == ExecutionMode::Test {
                        self.events.append(FailoverEvent::test(
                            config.id.clone(),
                            provider_id.clone(),
                            None,
                            &reason,
                            true,
                        ))?;
                    }

                    info!(
                        config_id = %config.id,
                        request_id = %request.id,
                        provider = %provider_id,
                        position = position,
                        latency_ms = latency.as_millis(),
                        "Failover run served"
                    );

                    return Ok(self.finish(
                        config,
                        request,
                        mode,
                        FailoverStatus::Done,
                        attempts,
                        Some(provider_id),
                        reason,
                        started_at,
                        run_start,
                    ));
                }
                Err(error) => {
                    if !error.is_retryable() {
                        warn!(
                            config_id = %config.id,
                            request_id = %request.id,
                            provider = %provider_id,
                            error = %error,
                            "Non-retryable provider failure, aborting chain"
                        );
                        return Err(error);
                    }

                    if mode == ExecutionMode::Live {
                        self.health.record_failure(&provider_id);
                    }

                    let trigger = TriggerReason::from_error(&error);
                    warn!(
                        config_id = %config.id,
                        request_id = %request.id,
                        provider = %provider_id,
                        next = next.as_ref().map_or("none", ProviderId::as_str),
                        trigger = %trigger,
                        "Provider attempt failed, advancing chain"
                    );

                    self.record_transition(
                        mode,
                        config,
                        &provider_id,
                        next.clone(),
                        &trigger.to_string(),
                    )?;

                    let attempt = match trigger {
                        TriggerReason::LatencyExceeded { limit_ms } => {
                            ProviderAttempt::timed_out(provider_id, limit_ms)
                        }
                        other => ProviderAttempt::failed(provider_id, error.to_string(), other),
                    };
                    attempts.push(attempt);
                }
            }
        }

        let reason = format!(
            "failover chain exhausted: all {} providers failed",
            attempts.len()
        );
        warn!(
            config_id = %config.id,
            request_id = %request.id,
            providers_tried = attempts.len(),
            "Failover chain exhausted"
        );

        Ok(self.finish(
            config,
            request,
            mode,
            FailoverStatus::Exhausted,
            attempts,
            None,
            reason,
            started_at,
            run_start,
        ))
    }

    /// Append the transition event for an advancing (or terminal) failure
    fn record_transition(
        &self,
        mode: ExecutionMode,
        config: &FailoverConfig,
        from: &ProviderId,
        to: Option<ProviderId>,
        reason: &str,
    ) -> EngineResult<()> {
        let event = match mode {
            ExecutionMode::Live => {
                FailoverEvent::failover(config.id.clone(), from.clone(), to, reason)
            }
            ExecutionMode::Test => {
                let success = to.is_some();
                FailoverEvent::test(config.id.clone(), from.clone(), to, reason, success)
            }
        };
        self.events.append(event)
    }

    #[allow(clippy::too_many_arguments)]
    fn finish(
        &self,
        config: &FailoverConfig,
        request: &RequestDescriptor,
        mode: ExecutionMode,
        status: FailoverStatus,
        attempts: Vec<ProviderAttempt>,
        final_provider: Option<ProviderId>,
        reason: String,
        started_at: chrono::DateTime<Utc>,
        run_start: Instant,
    ) -> FailoverReport {
        FailoverReport {
            config_id: config.id.clone(),
            request_id: request.id.clone(),
            mode,
            status,
            attempts,
            final_provider,
            reason,
            started_at,
            duration_ms: run_start.elapsed().as_millis() as u64,
        }
    }
}

fn success_reason(provider: &ProviderId, position: usize) -> String {
    match position {
        0 => format!("served by primary {provider}"),
        1 => format!("served by fallback {provider} after 1 failover"),
        n => format!("served by fallback {provider} after {n} failovers"),
    }
}
