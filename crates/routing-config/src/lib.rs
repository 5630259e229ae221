//! # Routing Config
//!
//! Configuration management for the LLM Routing Engine.
//!
//! This crate provides:
//! - The engine configuration model (server, routing, providers)
//! - YAML and TOML file loading with environment overrides
//! - Startup-time validation

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod loader;

// Re-export main types
pub use config::{EngineConfig, ProviderEntry, RoutingSection, ServerSection};
pub use loader::{load_config, load_from_path, ConfigError};
