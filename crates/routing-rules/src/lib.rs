//! # Routing Rules
//!
//! Rule-based routing for the LLM Routing Engine.
//!
//! This crate provides:
//! - Routing rule and condition types mirroring the admin API shapes
//! - Model name pattern matching (exact or simple glob)
//! - A pure condition matcher
//! - Deterministic priority-ordered rule selection

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod conditions;
pub mod rule;
pub mod selector;

// Re-export main types
pub use conditions::{ModelPattern, RuleConditions};
pub use rule::{RoutingRule, RuleUpdate};
pub use selector::select;
