use anyhow::Context as _;
use clap::Parser as _;
use obs_mcp_adapter::config::{Cli, Settings, Transport};
use obs_mcp_adapter::{BridgeClient, BridgeServer, ToolAdapter, serve};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.log_json);

    let settings = Settings::resolve(&cli).context("resolve settings")?;
    tracing::info!(
        bridge_url = %settings.bridge.base_url,
        timeout = ?settings.bridge.timeout,
        tools = ?settings.tools,
        "starting obs-bridge MCP adapter"
    );

    let bridge = BridgeClient::new(settings.bridge).context("create bridge client")?;
    let server = BridgeServer::new(Arc::new(ToolAdapter::new(bridge, settings.tools)));

    match cli.transport {
        Transport::Stdio => serve::serve_stdio(server).await.context("stdio transport")?,
        Transport::Http => serve::serve_http(server, cli.bind)
            .await
            .context("http transport")?,
    }
    Ok(())
}

/// Logs go to stderr; stdout carries MCP messages in stdio mode.
fn init_tracing(level: &str, json: bool) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.with_ansi(false).init();
    }
}
