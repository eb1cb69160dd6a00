//! MCP (Model Context Protocol) handler
//!
//! Implements the JSON-RPC side of an MCP server: lifecycle, tool discovery
//! and tool invocation. Uses sealed traits to control which tools can be
//! registered.

use async_trait::async_trait;
use domain_weaviate::{WeaviateRepository, WeaviateService};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::tools;

pub const PARSE_ERROR: i32 = -32700;
pub const INVALID_REQUEST: i32 = -32600;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;
pub const EXECUTION_ERROR: i32 = -32000;

/// Protocol revisions this server speaks, oldest first
pub const SUPPORTED_PROTOCOL_VERSIONS: &[&str] = &["2024-11-05", "2025-03-26", "2025-06-18"];
pub const LATEST_PROTOCOL_VERSION: &str = "2025-06-18";

const SERVER_NAME: &str = "mcp-weaviate";

// ============================================================================
// Sealed Trait Pattern - Prevents external implementations
// ============================================================================

pub(crate) mod sealed {
    pub trait Sealed {}
}

/// Trait for MCP tools - sealed to prevent external implementations
#[async_trait]
pub trait Tool: sealed::Sealed + Send + Sync {
    /// Tool name
    fn name(&self) -> &'static str;

    /// Tool description for the AI model
    fn description(&self) -> &'static str;

    /// JSON schema for input parameters
    fn input_schema(&self) -> Value;

    /// Execute the tool with given parameters
    async fn execute(&self, params: Value) -> Result<Value>;
}

// ============================================================================
// MCP Protocol Types
// ============================================================================

/// MCP request structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpRequest {
    #[serde(default)]
    pub jsonrpc: String,
    /// Absent for notifications
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

impl McpRequest {
    pub fn new(id: impl Into<Value>, method: impl Into<String>, params: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id: Some(id.into()),
            method: method.into(),
            params,
        }
    }

    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

/// MCP response structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpResponse {
    pub jsonrpc: String,
    /// `null` when the request id could not be read
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<McpError>,
}

/// MCP error structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl McpResponse {
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: Option<Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(McpError {
                code,
                message: message.into(),
                data: None,
            }),
        }
    }
}

// ============================================================================
// MCP Handler
// ============================================================================

/// MCP request handler
pub struct McpHandler {
    tools: BTreeMap<String, Box<dyn Tool>>,
    server_info: ServerInfo,
}

#[derive(Clone, Serialize)]
struct ServerInfo {
    name: String,
    version: String,
}

impl McpHandler {
    /// Create a handler exposing every Weaviate tool backed by `service`
    pub fn new<R: WeaviateRepository + 'static>(service: Arc<WeaviateService<R>>) -> Self {
        let tools = tools::weaviate_tools(service)
            .into_iter()
            .map(|tool| (tool.name().to_string(), tool))
            .collect();

        Self {
            tools,
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        }
    }

    /// Handle an MCP request. Notifications produce no response.
    pub async fn handle(&self, request: McpRequest) -> Option<McpResponse> {
        if request.is_notification() {
            debug!(method = %request.method, "Notification received");
            return None;
        }

        let id = request.id;
        if request.jsonrpc != "2.0" {
            return Some(McpResponse::error(
                id,
                INVALID_REQUEST,
                "Invalid request: jsonrpc must be \"2.0\"",
            ));
        }

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(id, &request.params),
            "ping" => McpResponse::success(id, json!({})),
            "tools/list" => self.handle_list_tools(id),
            "tools/call" => self.handle_call_tool(id, request.params).await,
            method => {
                debug!(method, "Unknown method");
                McpResponse::error(id, METHOD_NOT_FOUND, format!("Method not found: {}", method))
            }
        };
        Some(response)
    }

    /// Handle initialize request
    fn handle_initialize(&self, id: Option<Value>, params: &Value) -> McpResponse {
        let requested = params.get("protocolVersion").and_then(Value::as_str);
        let protocol_version = negotiate_protocol_version(requested);

        info!(
            requested = requested.unwrap_or("none"),
            protocol_version, "Client initialized"
        );

        McpResponse::success(
            id,
            json!({
                "protocolVersion": protocol_version,
                "serverInfo": self.server_info,
                "capabilities": {
                    "tools": { "listChanged": false }
                }
            }),
        )
    }

    /// Handle tools/list request
    fn handle_list_tools(&self, id: Option<Value>) -> McpResponse {
        let tools: Vec<Value> = self
            .tools
            .values()
            .map(|tool| {
                json!({
                    "name": tool.name(),
                    "description": tool.description(),
                    "inputSchema": tool.input_schema()
                })
            })
            .collect();

        McpResponse::success(id, json!({ "tools": tools }))
    }

    /// Handle tools/call request
    async fn handle_call_tool(&self, id: Option<Value>, params: Value) -> McpResponse {
        let tool_name = match params.get("name").and_then(Value::as_str) {
            Some(name) => name,
            None => return McpResponse::error(id, INVALID_PARAMS, "Missing tool name"),
        };

        let tool = match self.tools.get(tool_name) {
            Some(tool) => tool,
            None => {
                return McpResponse::error(
                    id,
                    INVALID_PARAMS,
                    format!("Unknown tool: {}", tool_name),
                );
            }
        };

        let arguments = match params.get("arguments") {
            None | Some(Value::Null) => json!({}),
            Some(arguments) => arguments.clone(),
        };

        debug!(tool = tool_name, "Calling tool");
        match tool.execute(arguments).await {
            Ok(result) => {
                let is_error = result.get("error").is_some_and(|e| !e.is_null());
                if is_error {
                    warn!(tool = tool_name, error = %result["error"], "Tool reported an error");
                }

                McpResponse::success(
                    id,
                    json!({
                        "content": [{
                            "type": "text",
                            "text": serde_json::to_string_pretty(&result).unwrap_or_default()
                        }],
                        "structuredContent": result,
                        "isError": is_error
                    }),
                )
            }
            Err(e) => McpResponse::error(id, e.code(), e.to_string()),
        }
    }

    /// Parse and handle a JSON request string. Returns `None` for
    /// notifications.
    pub async fn handle_json(&self, json: &str) -> Option<String> {
        let value: Value = match serde_json::from_str(json) {
            Ok(value) => value,
            Err(e) => {
                let response = McpResponse::error(None, PARSE_ERROR, format!("Parse error: {}", e));
                return Some(serde_json::to_string(&response).unwrap_or_default());
            }
        };

        let request: McpRequest = match serde_json::from_value(value.clone()) {
            Ok(request) => request,
            Err(e) => {
                let id = value.get("id").cloned();
                let response =
                    McpResponse::error(id, INVALID_REQUEST, format!("Invalid request: {}", e));
                return Some(serde_json::to_string(&response).unwrap_or_default());
            }
        };

        let response = self.handle(request).await?;
        Some(serde_json::to_string(&response).unwrap_or_default())
    }
}

/// Echo the client's version when supported, otherwise offer the latest
pub fn negotiate_protocol_version(requested: Option<&str>) -> &'static str {
    requested
        .and_then(|version| {
            SUPPORTED_PROTOCOL_VERSIONS
                .iter()
                .find(|supported| **supported == version)
                .copied()
        })
        .unwrap_or(LATEST_PROTOCOL_VERSION)
}
