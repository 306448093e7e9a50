use anyhow::Context as _;
use serde_json::json;
use std::process::{Child, Command, Stdio};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt as _, AsyncWriteExt as _, BufReader, Lines};
use tokio::process::{ChildStdin, ChildStdout};

#[allow(unused_imports)]
pub use obs_mcp_test_support::{
    KillOnDrop, MockBridge, MockReply, pick_unused_port, unreachable_bridge_url, wait_http_ok,
};

const BIN: &str = env!("CARGO_BIN_EXE_obs-mcp-adapter");

/// Spawn the adapter in streamable HTTP mode, pointed at `bridge_url`.
#[allow(dead_code)]
pub fn spawn_adapter_http(bridge_url: &str, port: u16, extra: &[&str]) -> anyhow::Result<Child> {
    Command::new(BIN)
        .arg("--transport")
        .arg("http")
        .arg("--bind")
        .arg(format!("127.0.0.1:{port}"))
        .arg("--bridge-url")
        .arg(bridge_url)
        .arg("--log-level")
        .arg("info")
        .args(extra)
        .stdout(Stdio::null())
        .spawn()
        .context("spawn adapter")
}

/// Newline-delimited JSON-RPC session with an adapter child speaking MCP over stdio.
#[allow(dead_code)]
pub struct StdioSession {
    _child: tokio::process::Child,
    stdin: ChildStdin,
    stdout: Lines<BufReader<ChildStdout>>,
}

#[allow(dead_code)]
impl StdioSession {
    pub async fn spawn(bridge_url: &str, extra: &[&str]) -> anyhow::Result<Self> {
        let mut child = tokio::process::Command::new(BIN)
            .arg("--bridge-url")
            .arg(bridge_url)
            .args(extra)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .context("spawn adapter (stdio)")?;

        let stdin = child.stdin.take().context("adapter stdin")?;
        let stdout = child.stdout.take().context("adapter stdout")?;

        let mut session = Self {
            _child: child,
            stdin,
            stdout: BufReader::new(stdout).lines(),
        };

        let init = session
            .request(
                0,
                "initialize",
                json!({
                    "protocolVersion": "2024-11-05",
                    "capabilities": {},
                    "clientInfo": { "name": "obs-mcp-adapter-integration-tests", "version": "0" }
                }),
                Duration::from_secs(10),
            )
            .await?;
        anyhow::ensure!(
            init.pointer("/result/serverInfo/name") == Some(&json!("obs-bridge")),
            "unexpected initialize result: {init}"
        );

        session
            .send(&json!({"jsonrpc": "2.0", "method": "notifications/initialized"}))
            .await?;
        Ok(session)
    }

    async fn send(&mut self, msg: &serde_json::Value) -> anyhow::Result<()> {
        let mut line = serde_json::to_string(msg)?;
        line.push('\n');
        self.stdin
            .write_all(line.as_bytes())
            .await
            .context("write to adapter stdin")?;
        self.stdin.flush().await.context("flush adapter stdin")
    }

    /// Send a request and wait for the response with the same id, skipping notifications.
    pub async fn request(
        &mut self,
        id: u64,
        method: &str,
        params: serde_json::Value,
        timeout_dur: Duration,
    ) -> anyhow::Result<serde_json::Value> {
        self.send(&json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        }))
        .await?;

        tokio::time::timeout(timeout_dur, self.read_response(id))
            .await
            .context("timeout waiting for stdio response")?
    }

    async fn read_response(&mut self, id: u64) -> anyhow::Result<serde_json::Value> {
        loop {
            let line = self
                .stdout
                .next_line()
                .await
                .context("read adapter stdout")?
                .context("adapter closed stdout")?;
            if line.trim().is_empty() {
                continue;
            }
            let msg: serde_json::Value =
                serde_json::from_str(&line).context("parse adapter stdout line")?;
            if msg.get("id") == Some(&json!(id)) {
                return Ok(msg);
            }
        }
    }
}

/// Text of `result.content[0]` in a `tools/call` response.
#[allow(dead_code)]
pub fn tool_call_text(msg: &serde_json::Value) -> anyhow::Result<String> {
    msg.pointer("/result/content/0/text")
        .and_then(serde_json::Value::as_str)
        .map(str::to_string)
        .context("tools/call missing result.content[0].text")
}

/// `result.isError` in a `tools/call` response (absent counts as `false`).
#[allow(dead_code)]
pub fn tool_call_is_error(msg: &serde_json::Value) -> bool {
    msg.pointer("/result/isError")
        .and_then(serde_json::Value::as_bool)
        .unwrap_or(false)
}
