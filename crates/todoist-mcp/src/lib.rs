//! Todoist MCP Server library.
//!
//! Provides the [`server::TodoistMcpServer`] MCP server handler and the tool
//! parameter types. Used by the `todoist-mcp` binary and available for
//! integration testing.

pub mod server;
pub mod tools;
