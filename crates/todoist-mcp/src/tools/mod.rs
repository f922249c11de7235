//! MCP tool parameter types and per-entity tool implementations.
//!
//! Parameter structs derive `Deserialize + JsonSchema` for MCP tool registration.
//! Tool functions take the injected [`todoist_client::TodoistApi`] and return
//! a [`todoist_sdk::ToolResult`]; the server renders them to text.

pub mod comments;
pub mod params;
pub mod projects;
pub mod sections;
pub mod tasks;

pub use params::*;
