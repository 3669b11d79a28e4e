//! Tool infrastructure: catalog metadata and dispatch onto the API client.

pub mod catalog;
pub mod dispatch;

pub use catalog::{ParamDef, ParamType, ToolCatalog, ToolEntry};
pub use dispatch::{ToolDispatcher, ToolOutcome};
