//! # FeedMob MCP
//!
//! Exposes the FeedMob reporting and spend API as MCP tools over stdio:
//! - Short-lived HS256 credentials minted per request
//! - Request assembly for the fixed operation catalog
//! - Classified upstream failures, never retried
//! - Tool dispatch that turns every failure into an error envelope
//!
//! ## Architecture
//!
//! ```text
//!   MCP client ─stdio─▶ mcp::McpServer ─▶ tools::ToolDispatcher
//!                                              │
//!                                              ▼
//!                                      api::FeedmobClient
//!                              ┌───────────┼────────────┐
//!                         TokenIssuer   request::*   Transport ─HTTP─▶ FeedMob
//! ```

// Enforce strict safety at compile time
#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]

pub mod api;
pub mod mcp;
pub mod tools;
pub mod types;

// Internal utilities
pub mod observability;

pub use types::{Config, Error, Result};
