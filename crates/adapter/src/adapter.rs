//! The tool adapter: validate an invocation, forward it to the bridge, report the outcome.

use crate::bridge::{BridgeClient, BridgeFailure};
use crate::error::{AdapterError, Result};
use crate::tools::{ToolCall, ToolKind};
use rmcp::model::{CallToolResult, Content, Tool};
use serde_json::Value;

/// Outcome of one tool invocation, as reported back to the agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolResult {
    Success { message: String },
    Failure(BridgeFailure),
}

impl ToolResult {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Success { message } => message.clone(),
            Self::Failure(failure) => failure.to_string(),
        }
    }

    /// Render as an MCP tool result. Failures are flagged with `isError`.
    #[must_use]
    pub fn into_call_tool_result(self) -> CallToolResult {
        match self {
            Self::Success { message } => CallToolResult::success(vec![Content::text(message)]),
            Self::Failure(failure) => CallToolResult::error(vec![Content::text(failure.to_string())]),
        }
    }
}

pub struct ToolAdapter {
    bridge: BridgeClient,
    tools: Vec<ToolKind>,
}

impl ToolAdapter {
    #[must_use]
    pub fn new(bridge: BridgeClient, tools: Vec<ToolKind>) -> Self {
        Self { bridge, tools }
    }

    #[must_use]
    pub fn enabled_tools(&self) -> &[ToolKind] {
        &self.tools
    }

    #[must_use]
    pub fn definitions(&self) -> Vec<Tool> {
        self.tools.iter().map(|k| k.definition()).collect()
    }

    /// Run a tool by name.
    ///
    /// Bridge problems are reported through [`ToolResult::Failure`]; only problems with the
    /// invocation itself are errors, and those never reach the network.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::UnknownTool`] for names that are not enabled and
    /// [`AdapterError::InvalidArguments`] when the arguments do not fit the tool's input shape.
    pub async fn invoke(&self, tool_name: &str, arguments: Value) -> Result<ToolResult> {
        let kind = ToolKind::from_name(tool_name)
            .filter(|k| self.tools.contains(k))
            .ok_or_else(|| AdapterError::UnknownTool(tool_name.to_string()))?;

        let call = ToolCall::parse(kind, arguments).inspect_err(|e| {
            tracing::debug!(tool = %kind, error = %e, "rejected tool arguments");
        })?;

        Ok(self.run(&call).await)
    }

    /// Forward an already validated call to the bridge.
    pub async fn run(&self, call: &ToolCall) -> ToolResult {
        let request = call.bridge_request();
        let kind = call.kind();

        match self.bridge.send(&request).await {
            Ok(()) => {
                let message = call.success_message();
                tracing::info!(tool = %kind, endpoint = request.endpoint, "{message}");
                ToolResult::Success { message }
            }
            Err(failure) => {
                match &failure {
                    BridgeFailure::Status { status, body } => tracing::warn!(
                        tool = %kind,
                        endpoint = request.endpoint,
                        status,
                        body = %body,
                        "bridge rejected call"
                    ),
                    other => tracing::warn!(
                        tool = %kind,
                        endpoint = request.endpoint,
                        error = %other,
                        "bridge call failed"
                    ),
                }
                ToolResult::Failure(failure)
            }
        }
    }
}
