//! FeedMob MCP server: main entry point.
//!
//! Speaks MCP (JSON-RPC 2.0, one message per line) on stdin/stdout. Logs go
//! to stderr.

use clap::{Parser, ValueEnum};
use feedmob_mcp::api::FeedmobClient;
use feedmob_mcp::mcp::McpServer;
use feedmob_mcp::tools::ToolDispatcher;
use feedmob_mcp::Config;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "feedmob-mcp", version, about = "FeedMob reporting and spend tools over MCP")]
struct Cli {
    /// FeedMob API base URL.
    #[arg(long, env = "FEEDMOB_API_BASE")]
    api_base: String,

    /// FeedMob API key.
    #[arg(long, env = "FEEDMOB_KEY")]
    key: String,

    /// Secret used to sign request tokens.
    #[arg(long, env = "FEEDMOB_SECRET", hide_env_values = true)]
    secret: String,

    /// Log output format.
    #[arg(long, env = "FEEDMOB_LOG_FORMAT", value_enum, default_value = "text")]
    log_format: LogFormat,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = Config::new(&cli.api_base, &cli.key, &cli.secret)?;
    config.observability.json_logs = cli.log_format == LogFormat::Json;

    feedmob_mcp::observability::init_tracing(&config.observability);

    let client = FeedmobClient::new(&config.api)?;
    let dispatcher = Arc::new(ToolDispatcher::new(Arc::new(client)));
    let server = McpServer::new(dispatcher.clone());

    tracing::info!(
        base_url = %config.api.base_url,
        tools = dispatcher.catalog().len(),
        "FeedMob MCP server starting"
    );

    let cancel = server.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received");
            cancel.cancel();
        }
    });

    server.serve(tokio::io::stdin(), tokio::io::stdout()).await?;

    tracing::info!("FeedMob MCP server stopped");
    // Tokio's stdin reader may still be parked on a blocking read; don't wait for it.
    std::process::exit(0)
}
