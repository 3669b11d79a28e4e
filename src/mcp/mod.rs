//! MCP over stdio: newline-delimited JSON-RPC 2.0.
//!
//! ```text
//!   stdin ─▶ codec::read_message ─▶ server (one task per request)
//!                                      │
//!                                      ▼
//!                             router::route_request ─▶ ToolDispatcher
//!                                      │
//!   stdout ◀─ codec::write_message ◀───┘  (single writer task)
//! ```
//! Only protocol traffic goes to stdout. Logs go to stderr.

pub mod codec;
pub mod prompts;
pub mod router;
pub mod server;

pub use router::{route_request, RpcError, MCP_PROTOCOL_VERSION, SERVER_NAME};
pub use server::McpServer;
