//! # Routing Failover
//!
//! Failover execution for the LLM Routing Engine.
//!
//! This crate provides:
//! - Failover configurations with primary/fallback chains
//! - Trigger classification (latency, provider errors, error-rate gating)
//! - A per-provider health ledger with a sliding sample window
//! - The sequential failover executor
//! - Decision-trail reports shared by the live and test paths

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod executor;
pub mod health;
pub mod report;
pub mod trigger;

// Re-export main types
pub use config::{ConfigUpdate, FailoverConditions, FailoverConfig};
pub use executor::FailoverExecutor;
pub use health::{HealthLedger, ProviderHealth, DEFAULT_WINDOW_SIZE};
pub use report::{AttemptOutcome, ExecutionMode, FailoverReport, FailoverStatus, ProviderAttempt};
pub use trigger::TriggerReason;
