//! MCP server for the Gitcoin gas dashboard and town square.
//!
//! This module provides the MCP protocol server that exposes the view
//! handlers to AI assistants through the Model Context Protocol.

pub mod handlers;

pub use handlers::GitcoinMcpServer;

use anyhow::Result;
use rmcp::transport::io::stdio;
use rmcp::ServiceExt;

/// Run the server with stdio transport until the client disconnects.
pub async fn run_server(server: GitcoinMcpServer) -> Result<()> {
    let service = server.serve(stdio()).await?;
    service.waiting().await?;
    Ok(())
}
