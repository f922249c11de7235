//! Operational layer between the tool surface and the Todoist client.
//!
//! Normalizes tool arguments, aggregates paged reads, resolves by-name
//! lookups, submits move commands, and formats results. Consumed by
//! `todoist-mcp`.

pub mod commands;
pub mod enums;
pub mod normalize;
pub mod outcome;
pub mod pagination;
pub mod resolve;
pub mod responses;
