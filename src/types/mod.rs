//! Core types for the FeedMob MCP server.
//!
//! This module provides foundational types used throughout the system:
//! - **IDs**: Per-invocation request identifiers
//! - **Errors**: Domain error taxonomy with thiserror derives
//! - **Config**: Startup configuration (API base, credentials, logging)

mod config;
mod errors;
mod ids;

pub use config::{ApiConfig, Config, ObservabilityConfig, DEFAULT_REQUEST_TIMEOUT};
pub use errors::{Error, ErrorKind, Result};
pub use ids::RequestId;
