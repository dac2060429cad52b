//! Picsum MCP Image Server
//!
//! MCP server for generating and fetching images from picsum.photos.

use anyhow::Result;
use clap::Parser;
use picsum_mcp_common::tracing::init_tracing;
use picsum_mcp_common::{Config, McpServerBuilder, TransportArgs};
use picsum_mcp_image::PicsumServer;

/// Command-line arguments for the image server.
#[derive(Parser, Debug)]
#[command(name = "picsum-mcp-image")]
#[command(about = "MCP server for images from picsum.photos")]
struct Args {
    /// Transport configuration
    #[command(flatten)]
    transport: TransportArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    tracing::info!("picsum-mcp-image server starting...");

    let args = Args::parse();

    let config = Config::from_env()?;
    tracing::info!(
        base_url = %config.base_url,
        api_url = %config.api_url,
        timeout_secs = config.timeout_secs,
        "Configuration loaded"
    );

    let server = PicsumServer::new(config)?;

    McpServerBuilder::new(server)
        .with_transport(args.transport.into_transport())
        .run()
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
