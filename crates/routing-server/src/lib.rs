//! # Routing Server
//!
//! HTTP server implementation for the LLM Routing Engine.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - Admin CRUD endpoints for rules and failover configs
//! - Route evaluation and failover execute/test endpoints
//! - Failover event history endpoints
//! - Graceful shutdown handling

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod handlers;
pub mod routes;
pub mod server;
pub mod shutdown;
pub mod state;

// Re-export main types
pub use error::ApiError;
pub use routes::create_router;
pub use server::{Server, ServerConfig};
pub use state::{AppState, AppStateBuilder};
