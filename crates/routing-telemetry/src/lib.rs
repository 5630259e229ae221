//! # Routing Telemetry
//!
//! Structured logging for the LLM Routing Engine.
//!
//! Every decision point in the engine logs structured fields through
//! `tracing`; this crate installs the subscriber.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod logging;

// Re-export main types
pub use logging::{init_logging, LogFormat, LoggingConfig, TelemetryError};
