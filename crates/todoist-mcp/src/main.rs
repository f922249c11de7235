//! Todoist MCP Server
//!
//! Model Context Protocol server exposing a Todoist account (projects,
//! sections, tasks, comments) to LLM agents over stdio.

use std::sync::Arc;

use clap::Parser;
use rmcp::ServiceExt;
use todoist_client::{ClientConfig, RestClient};
use todoist_mcp::server::TodoistMcpServer;
use todoist_sdk::OutputFormat;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "todoist-mcp", version, about = "MCP server for Todoist")]
struct Args {
    /// Result shape for every tool: json or text.
    #[arg(long, env = "TODOIST_MCP_FORMAT", default_value = "json")]
    format: OutputFormat,

    /// Emit logs as JSON lines.
    #[arg(long, env = "TODOIST_MCP_LOG_JSON")]
    log_json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::from_default_env().add_directive("todoist_mcp=info".parse()?);
    let logs = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if args.log_json {
        logs.json().init();
    } else {
        logs.init();
    }

    tracing::info!(format = %args.format, "todoist-mcp starting (stdio transport)");

    let config = ClientConfig::from_env()?;
    let client = RestClient::new(config)?;
    let server = TodoistMcpServer::new(Arc::new(client), args.format);
    let transport = rmcp::transport::io::stdio();

    let service = server.serve(transport).await?;
    service.waiting().await?;

    Ok(())
}
