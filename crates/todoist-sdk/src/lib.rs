//! Shared SDK for the Todoist tool surface.
//!
//! # Modules
//!
//! - [`operational`]: argument normalization, pagination, name resolution,
//!   move commands, result formatting, and the tool outcome boundary

pub mod operational;

pub use operational::enums::OutputFormat;
pub use operational::outcome::{render, ToolError, ToolResult};
