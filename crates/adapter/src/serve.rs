//! Transport wiring: stdio (default) or streamable HTTP.

use crate::error::{AdapterError, Result};
use crate::server::BridgeServer;
use axum::Router;
use axum::routing::get;
use rmcp::ServiceExt as _;
use rmcp::transport::stdio;
use rmcp::transport::streamable_http_server::session::local::LocalSessionManager;
use rmcp::transport::streamable_http_server::{StreamableHttpServerConfig, StreamableHttpService};
use std::net::SocketAddr;
use tokio_util::sync::CancellationToken;

/// Serve one MCP session over stdin/stdout until the client disconnects.
///
/// # Errors
///
/// Returns an error if the MCP handshake fails or the service task panics.
pub async fn serve_stdio(server: BridgeServer) -> Result<()> {
    let service = server
        .serve(stdio())
        .await
        .map_err(|e| AdapterError::Startup(format!("stdio transport: {e}")))?;
    tracing::info!("obs-bridge MCP server listening on stdio");

    let reason = service
        .waiting()
        .await
        .map_err(|e| AdapterError::Startup(format!("stdio service task: {e}")))?;
    tracing::info!(?reason, "stdio session ended");
    Ok(())
}

/// HTTP router with `/mcp` (streamable HTTP) and `/health`.
///
/// Cancelling `shutdown` terminates every open MCP session.
pub fn router(server: BridgeServer, shutdown: CancellationToken) -> Router {
    let mcp = StreamableHttpService::new(
        move || Ok(server.clone()),
        LocalSessionManager::default().into(),
        StreamableHttpServerConfig {
            cancellation_token: shutdown,
            ..Default::default()
        },
    );

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .nest_service("/mcp", mcp)
}

/// Serve streamable HTTP on `bind` until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the listener cannot be bound or the server fails.
pub async fn serve_http(server: BridgeServer, bind: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .map_err(|e| AdapterError::Startup(format!("bind {bind}: {e}")))?;
    tracing::info!(%bind, "obs-bridge MCP server listening on http (/mcp)");

    serve_http_until(server, listener, async {
        let _ = tokio::signal::ctrl_c().await;
        tracing::info!("shutdown requested");
    })
    .await
}

/// Serve streamable HTTP on an already bound listener until `shutdown` resolves, then close the
/// MCP sessions and let in-flight requests finish.
///
/// # Errors
///
/// Returns an error if the server fails.
pub async fn serve_http_until(
    server: BridgeServer,
    listener: tokio::net::TcpListener,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let sessions = CancellationToken::new();
    let app = router(server, sessions.clone());

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.await;
            sessions.cancel();
        })
        .await?;
    tracing::info!("http server stopped");
    Ok(())
}
