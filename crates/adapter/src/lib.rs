//! MCP adapter for a local OBS HTTP bridge.
//!
//! Exposes `set_obs_text` and `set_obs_item_visibility` as MCP tools. Each call is validated
//! against the tool's input shape and forwarded as a single JSON `POST` to the bridge; the
//! outcome comes back to the agent as a short text message.

pub mod adapter;
pub mod bridge;
pub mod config;
pub mod error;
pub mod serve;
pub mod server;
pub mod tools;

pub use adapter::{ToolAdapter, ToolResult};
pub use bridge::{BridgeClient, BridgeFailure};
pub use error::{AdapterError, Result};
pub use server::BridgeServer;
pub use tools::{ToolCall, ToolKind};
