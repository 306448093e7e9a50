//! Test helpers shared by the adapter's unit and integration tests.
//!
//! The centerpiece is [`MockBridge`], a stand-in for the local OBS HTTP bridge that records every
//! request it receives and answers with a configurable reply.

use anyhow::Context as _;
use axum::Router;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use parking_lot::Mutex;
use std::net::TcpListener;
use std::process::Child;
use std::sync::Arc;
use std::time::{Duration, Instant};

pub struct KillOnDrop(pub Child);

impl Drop for KillOnDrop {
    fn drop(&mut self) {
        let _ = self.0.kill();
    }
}

/// Pick an unused TCP port on localhost.
///
/// Note: this does not reserve the port; it's still possible for another process to bind it
/// before you do.
///
/// # Errors
///
/// Returns an error if binding an ephemeral localhost port fails or if the bound socket's
/// local address cannot be read.
pub fn pick_unused_port() -> anyhow::Result<u16> {
    let listener = TcpListener::bind("127.0.0.1:0").context("bind ephemeral port")?;
    Ok(listener.local_addr()?.port())
}

/// Poll an HTTP URL until it returns a success status (2xx/3xx).
///
/// # Errors
///
/// Returns an error if the timeout elapses before the endpoint returns a success status.
pub async fn wait_http_ok(url: &str, timeout_dur: Duration) -> anyhow::Result<()> {
    let client = reqwest::Client::new();
    let start = Instant::now();
    loop {
        if start.elapsed() > timeout_dur {
            anyhow::bail!("timed out waiting for {url}");
        }

        match client.get(url).send().await {
            Ok(resp) if resp.status().is_success() => return Ok(()),
            _ => tokio::time::sleep(Duration::from_millis(200)).await,
        }
    }
}

/// How the mock bridge answers `POST /call/{command}`.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// `200 {"status":"ok"}`, like the real bridge.
    Ok,
    /// Arbitrary status with a plain-text body.
    Status(u16, String),
    /// Never answer.
    Hang,
}

/// One request observed by the mock bridge.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub command: String,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl RecordedCall {
    /// Parse the recorded body as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not valid JSON.
    pub fn json(&self) -> anyhow::Result<serde_json::Value> {
        serde_json::from_slice(&self.body).context("recorded body is not JSON")
    }
}

struct MockState {
    reply: MockReply,
    calls: Mutex<Vec<RecordedCall>>,
    server_error: Mutex<Option<String>>,
}

/// In-process fake of the OBS HTTP bridge, served on an ephemeral localhost port.
///
/// The server task is aborted on drop.
pub struct MockBridge {
    addr: std::net::SocketAddr,
    state: Arc<MockState>,
    task: tokio::task::JoinHandle<()>,
}

impl MockBridge {
    /// Start a mock bridge that answers every call with `reply`.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound.
    pub async fn start(reply: MockReply) -> anyhow::Result<Self> {
        let state = Arc::new(MockState {
            reply,
            calls: Mutex::new(Vec::new()),
            server_error: Mutex::new(None),
        });

        let app = Router::new()
            .route("/call/{command}", post(handle_call))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .context("bind mock bridge")?;
        let addr = listener.local_addr().context("mock bridge local_addr")?;

        let task = tokio::spawn({
            let state = state.clone();
            async move {
                if let Err(e) = axum::serve(listener, app).await {
                    eprintln!("mock bridge on {addr} failed: {e}");
                    *state.server_error.lock() = Some(e.to_string());
                }
            }
        });

        Ok(Self { addr, state, task })
    }

    /// Base URL to hand to the adapter (`http://127.0.0.1:<port>/call`).
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}/call", self.addr)
    }

    /// Snapshot of every call received so far, in arrival order.
    ///
    /// # Panics
    ///
    /// Panics if the mock server stopped with an error, so a dead bridge is not mistaken for
    /// "no calls".
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        if let Some(e) = self.server_error() {
            panic!("mock bridge server failed: {e}");
        }
        self.state.calls.lock().clone()
    }

    /// The error the mock server stopped with, if any.
    #[must_use]
    pub fn server_error(&self) -> Option<String> {
        self.state.server_error.lock().clone()
    }
}

impl Drop for MockBridge {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn handle_call(
    State(state): State<Arc<MockState>>,
    Path(command): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, String) {
    let content_type = headers
        .get(axum::http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    state.calls.lock().push(RecordedCall {
        command,
        content_type,
        body: body.to_vec(),
    });

    match &state.reply {
        MockReply::Ok => (StatusCode::OK, r#"{"status":"ok"}"#.to_string()),
        MockReply::Status(code, text) => (
            StatusCode::from_u16(*code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            text.clone(),
        ),
        MockReply::Hang => std::future::pending().await,
    }
}

/// A localhost URL whose port has nothing listening on it.
///
/// # Errors
///
/// Returns an error if no ephemeral port can be picked.
pub fn unreachable_bridge_url() -> anyhow::Result<String> {
    let port = pick_unused_port()?;
    Ok(format!("http://127.0.0.1:{port}/call"))
}
