//! # Routing Providers
//!
//! Provider clients for the LLM Routing Engine.
//!
//! This crate provides:
//! - A concurrent provider registry resolving identifiers to clients
//! - An HTTP probe client for real provider endpoints

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod http;
pub mod registry;

// Re-export main types
pub use http::{HttpProviderClient, HttpProviderConfig};
pub use registry::ProviderRegistry;
