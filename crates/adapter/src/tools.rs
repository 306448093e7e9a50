//! Tool catalog: names, input shapes, argument parsing and the pure mapping from a validated call
//! to the bridge request it produces.

use crate::error::{AdapterError, Result};
use rmcp::model::{JsonObject, Tool, ToolAnnotations};
use serde::Deserialize;
use serde_json::{Value, json};
use std::fmt;
use std::sync::Arc;

/// Every tool the adapter knows how to expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, clap::ValueEnum)]
pub enum ToolKind {
    #[serde(rename = "set_obs_text")]
    #[value(name = "set_obs_text")]
    SetText,
    #[serde(rename = "set_obs_item_visibility")]
    #[value(name = "set_obs_item_visibility")]
    SetItemVisibility,
}

impl ToolKind {
    pub const ALL: [Self; 2] = [Self::SetText, Self::SetItemVisibility];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::SetText => "set_obs_text",
            Self::SetItemVisibility => "set_obs_item_visibility",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }

    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::SetText => "Change the text of an OBS text source through the local HTTP bridge.",
            Self::SetItemVisibility => {
                "Show or hide a scene item in OBS (for example a logo) through the local HTTP bridge."
            }
        }
    }

    /// Bridge command this tool is forwarded to.
    #[must_use]
    pub fn endpoint(self) -> &'static str {
        match self {
            Self::SetText => "SetInputSettings",
            Self::SetItemVisibility => "SetSceneItemEnabled",
        }
    }

    fn input_schema(self) -> Value {
        match self {
            Self::SetText => json!({
                "type": "object",
                "properties": {
                    "sourceName": {
                        "type": "string",
                        "description": "Name of the OBS text source (for example RotuloDemo)."
                    },
                    "text": {
                        "type": "string",
                        "description": "Text to show in the source."
                    }
                },
                "required": ["sourceName", "text"]
            }),
            Self::SetItemVisibility => json!({
                "type": "object",
                "properties": {
                    "itemName": {
                        "type": "string",
                        "description": "Name of the scene item (for example Logo)."
                    },
                    "enabled": {
                        "type": "boolean",
                        "description": "true shows the item, false hides it."
                    },
                    "sceneName": {
                        "type": "string",
                        "description": "Scene containing the item. Defaults to the current program scene."
                    }
                },
                "required": ["itemName", "enabled"]
            }),
        }
    }

    /// MCP tool definition as advertised by `tools/list`.
    #[must_use]
    pub fn definition(self) -> Tool {
        let schema = self
            .input_schema()
            .as_object()
            .cloned()
            .unwrap_or_else(JsonObject::new);
        let mut tool = Tool::new(self.name(), self.description(), Arc::new(schema));
        // Both tools overwrite OBS state with the given value; repeating a call is harmless.
        tool.annotations = Some(ToolAnnotations {
            title: None,
            read_only_hint: Some(false),
            destructive_hint: Some(false),
            idempotent_hint: Some(true),
            open_world_hint: Some(false),
        });
        tool
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawSetTextArgs")]
pub struct SetTextArgs {
    pub source_name: String,
    pub text: String,
}

/// Wire shape of `set_obs_text` arguments; `inputName` is the older name of `sourceName`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSetTextArgs {
    #[serde(default)]
    source_name: Option<String>,
    #[serde(default)]
    input_name: Option<String>,
    text: String,
}

impl TryFrom<RawSetTextArgs> for SetTextArgs {
    type Error = String;

    fn try_from(raw: RawSetTextArgs) -> std::result::Result<Self, Self::Error> {
        let source_name = match (raw.source_name, raw.input_name) {
            (Some(a), Some(b)) if a != b => {
                return Err(format!(
                    "sourceName '{a}' and inputName '{b}' name different sources"
                ));
            }
            (Some(name), _) | (None, Some(name)) => name,
            (None, None) => return Err("missing field `sourceName`".to_string()),
        };
        Ok(Self {
            source_name,
            text: raw.text,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetItemVisibilityArgs {
    pub item_name: String,
    pub enabled: bool,
    #[serde(default)]
    pub scene_name: Option<String>,
}

impl SetItemVisibilityArgs {
    /// The scene to target, treating an empty name like an absent one.
    #[must_use]
    pub fn scene(&self) -> Option<&str> {
        self.scene_name.as_deref().filter(|s| !s.is_empty())
    }
}

/// A validated tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolCall {
    SetText(SetTextArgs),
    SetItemVisibility(SetItemVisibilityArgs),
}

impl ToolCall {
    /// Validate raw MCP arguments against the tool's input shape.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::InvalidArguments`] if a required field is missing, a field has the
    /// wrong type, or `arguments` is not an object.
    pub fn parse(kind: ToolKind, arguments: Value) -> Result<Self> {
        if !arguments.is_object() {
            return Err(AdapterError::InvalidArguments {
                tool: kind.name().to_string(),
                reason: "arguments must be an object".to_string(),
            });
        }
        let invalid = |e: serde_json::Error| AdapterError::InvalidArguments {
            tool: kind.name().to_string(),
            reason: e.to_string(),
        };
        match kind {
            ToolKind::SetText => serde_json::from_value(arguments)
                .map(Self::SetText)
                .map_err(invalid),
            ToolKind::SetItemVisibility => serde_json::from_value(arguments)
                .map(Self::SetItemVisibility)
                .map_err(invalid),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ToolKind {
        match self {
            Self::SetText(_) => ToolKind::SetText,
            Self::SetItemVisibility(_) => ToolKind::SetItemVisibility,
        }
    }

    /// Build the bridge request for this call.
    #[must_use]
    pub fn bridge_request(&self) -> BridgeRequest {
        let body = match self {
            Self::SetText(args) => json!({
                "inputName": args.source_name,
                "inputSettings": { "text": args.text },
            }),
            Self::SetItemVisibility(args) => {
                let mut body = json!({
                    "itemName": args.item_name,
                    "enabled": args.enabled,
                });
                if let (Some(scene), Some(obj)) = (args.scene(), body.as_object_mut()) {
                    obj.insert("sceneName".to_string(), Value::String(scene.to_string()));
                }
                body
            }
        };
        BridgeRequest {
            endpoint: self.kind().endpoint(),
            body,
        }
    }

    /// Confirmation text returned to the agent after the bridge accepted the call.
    #[must_use]
    pub fn success_message(&self) -> String {
        match self {
            Self::SetText(args) => format!("text updated on source '{}'", args.source_name),
            Self::SetItemVisibility(args) => {
                let action = if args.enabled { "shown" } else { "hidden" };
                match args.scene() {
                    Some(scene) => {
                        format!("scene item '{}' {action} in scene '{scene}'", args.item_name)
                    }
                    None => format!("scene item '{}' {action}", args.item_name),
                }
            }
        }
    }
}

/// One outbound bridge call: `POST <bridge_url>/<endpoint>` with `body` as JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct BridgeRequest {
    pub endpoint: &'static str,
    pub body: Value,
}
