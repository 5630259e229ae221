//! # Routing Core
//!
//! Core types, traits, and error handling for the LLM Routing Engine.
//!
//! This crate provides the foundational types used throughout the engine:
//! - Request descriptors and identifier newtypes
//! - Provider traits and attempt outcomes
//! - Failover event contracts
//! - Error types and handling
//! - Cooperative cancellation

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cancel;
pub mod descriptor;
pub mod error;
pub mod events;
pub mod provider;
pub mod types;

// Re-export commonly used types
pub use cancel::CancelToken;
pub use descriptor::{RequestDescriptor, RequestDescriptorBuilder};
pub use error::{EngineError, EngineResult};
pub use events::{EventSink, FailoverEvent, FailoverEventType};
pub use provider::{ProviderClient, ProviderLookup, ProviderResponse};
pub use types::{ConfigId, ProviderId, RequestId, RuleId, WorkspaceId};
