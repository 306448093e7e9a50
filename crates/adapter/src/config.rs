//! Command line, environment and config-file settings.
//!
//! Precedence: CLI flag / env var, then the optional YAML config file, then built-in defaults.
//! Settings are resolved once at startup and never change afterwards.

use crate::error::{AdapterError, Result};
use crate::tools::ToolKind;
use clap::{Parser, ValueEnum};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

pub const DEFAULT_BRIDGE_URL: &str = "http://localhost:8888/call";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Transport {
    /// One MCP session over stdin/stdout.
    Stdio,
    /// Streamable HTTP on `--bind`, served at `/mcp`.
    Http,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "obs-mcp-adapter", version, about = "Expose a local OBS HTTP bridge as MCP tools")]
pub struct Cli {
    /// Optional YAML config file.
    #[arg(long, env = "OBS_MCP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Base URL of the bridge; tool endpoints are appended as `/<Command>`.
    #[arg(long, env = "OBS_BRIDGE_URL")]
    pub bridge_url: Option<String>,

    /// Per-call bridge timeout in milliseconds (0 disables it).
    #[arg(long, env = "OBS_BRIDGE_TIMEOUT_MS")]
    pub timeout_ms: Option<u64>,

    /// Tools to expose (comma separated). Defaults to all of them.
    #[arg(long, env = "OBS_MCP_TOOLS", value_enum, value_delimiter = ',')]
    pub tools: Vec<ToolKind>,

    #[arg(long, env = "OBS_MCP_TRANSPORT", value_enum, default_value_t = Transport::Stdio)]
    pub transport: Transport,

    /// Listen address for `--transport http`.
    #[arg(long, env = "OBS_MCP_BIND", default_value = "127.0.0.1:8090")]
    pub bind: SocketAddr,

    #[arg(long, env = "OBS_MCP_LOG", default_value = "info")]
    pub log_level: String,

    /// Emit logs as JSON lines.
    #[arg(long)]
    pub log_json: bool,
}

/// Contents of the YAML config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub bridge_url: Option<String>,
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    #[serde(default)]
    pub tools: Option<Vec<ToolKind>>,
}

impl ConfigFile {
    /// Read and parse a config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid config YAML.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AdapterError::Config(format!("read config {}: {e}", path.display()))
        })?;
        Self::parse(&raw)
    }

    /// Parse config YAML. An empty document yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error on invalid YAML or unknown keys.
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(raw)?)
    }
}

/// Where and how to reach the bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeSettings {
    pub base_url: Url,
    /// `None` waits for the bridge indefinitely.
    pub timeout: Option<Duration>,
}

impl BridgeSettings {
    /// # Errors
    ///
    /// Returns an error if `base_url` is not an absolute `http(s)` URL.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| AdapterError::Config(format!("Invalid bridge URL '{base_url}': {e}")))?;
        let scheme = base_url.scheme();
        if scheme != "http" && scheme != "https" {
            return Err(AdapterError::Config(format!(
                "Invalid bridge URL '{base_url}': unsupported scheme '{scheme}'"
            )));
        }
        if base_url.host_str().is_none() {
            return Err(AdapterError::Config(format!(
                "Invalid bridge URL '{base_url}': missing host"
            )));
        }
        Ok(Self { base_url, timeout })
    }

    /// Full URL for a bridge command.
    #[must_use]
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }
}

/// Fully resolved adapter settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub bridge: BridgeSettings,
    pub tools: Vec<ToolKind>,
}

impl Settings {
    /// Resolve settings from the CLI, loading the config file it points at (if any).
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be loaded or the merged settings are invalid.
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => ConfigFile::load(path)?,
            None => ConfigFile::default(),
        };
        Self::merge(cli, file)
    }

    /// Merge CLI values over a parsed config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the bridge URL is invalid or the tool list ends up empty.
    pub fn merge(cli: &Cli, file: ConfigFile) -> Result<Self> {
        let base_url = cli
            .bridge_url
            .clone()
            .or(file.bridge_url)
            .unwrap_or_else(|| DEFAULT_BRIDGE_URL.to_string());

        let timeout_ms = cli
            .timeout_ms
            .or(file.timeout_ms)
            .unwrap_or(DEFAULT_TIMEOUT_MS);
        let timeout = (timeout_ms > 0).then(|| Duration::from_millis(timeout_ms));

        let mut tools = if cli.tools.is_empty() {
            file.tools.unwrap_or_else(|| ToolKind::ALL.to_vec())
        } else {
            cli.tools.clone()
        };
        let mut seen = Vec::with_capacity(tools.len());
        tools.retain(|t| {
            if seen.contains(t) {
                false
            } else {
                seen.push(*t);
                true
            }
        });
        if tools.is_empty() {
            return Err(AdapterError::Config(
                "at least one tool must be enabled".to_string(),
            ));
        }

        Ok(Self {
            bridge: BridgeSettings::new(&base_url, timeout)?,
            tools,
        })
    }
}
