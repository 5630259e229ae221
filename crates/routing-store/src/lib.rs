//! # Routing Store
//!
//! Rule and failover-config storage for the LLM Routing Engine.
//!
//! This crate provides:
//! - A per-workspace store with copy-on-write snapshots; rule edits are
//!   never visible mid-evaluation
//! - Creation-time validation for rules and configs
//! - The append-only in-memory failover event history

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod events;
pub mod store;

// Re-export main types
pub use events::{InMemoryEventLog, DEFAULT_EVENT_CAPACITY};
pub use store::{RuleStore, StoreSnapshot};
