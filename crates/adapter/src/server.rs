//! rmcp server handler exposing the adapter's tools.

use crate::adapter::ToolAdapter;
use crate::error::AdapterError;
use rmcp::model::{
    CallToolRequestParams, CallToolResult, ErrorData, Implementation, ListToolsResult,
    PaginatedRequestParams, ServerCapabilities, ServerInfo,
};
use rmcp::service::{RequestContext, RoleServer};
use rmcp::ServerHandler;
use serde_json::{Value, json};
use std::sync::Arc;

pub const SERVER_NAME: &str = "obs-bridge";

#[derive(Clone)]
pub struct BridgeServer {
    adapter: Arc<ToolAdapter>,
}

impl BridgeServer {
    #[must_use]
    pub fn new(adapter: Arc<ToolAdapter>) -> Self {
        Self { adapter }
    }
}

/// Map invocation errors onto JSON-RPC `invalid_params` with a structured `data` payload.
fn to_mcp_error(e: &AdapterError) -> ErrorData {
    let data = match e {
        AdapterError::UnknownTool(tool) => json!({
            "type": "unknown-tool",
            "tool": tool,
        }),
        AdapterError::InvalidArguments { tool, reason } => json!({
            "type": "invalid-arguments",
            "tool": tool,
            "reason": reason,
        }),
        other => json!({ "type": "internal", "reason": other.to_string() }),
    };
    ErrorData::invalid_params(e.to_string(), Some(data))
}

impl ServerHandler for BridgeServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(
                "Controls OBS through a local HTTP bridge: change the text of a source or show/hide a scene item."
                    .to_string(),
            ),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        Ok(ListToolsResult::with_all_items(self.adapter.definitions()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        let arguments = Value::Object(request.arguments.unwrap_or_default());
        match self.adapter.invoke(&request.name, arguments).await {
            Ok(result) => Ok(result.into_call_tool_result()),
            Err(e) => Err(to_mcp_error(&e)),
        }
    }
}
