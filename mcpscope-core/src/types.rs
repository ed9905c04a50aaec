//! Core domain types for mcpscope
//!
//! These types represent the canonical data model for MCP server request
//! logs: one [`RequestRecord`] per request handled by a deployed server,
//! carrying timing, outcome, and a best-effort view of the MCP payload.
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Record** | One logged request handled by a deployed MCP server |
//! | **Session** | A group of Records sharing a non-empty MCP session id |
//! | **Tool call** | A Record whose payload invokes `tools/call` on a named tool |
//! | **Client** | The MCP client product behind a Record, recognized from its user agent |
//!
//! Records arrive from an ingest pipeline that accepts whatever the server
//! managed to log. Payloads are therefore parsed defensively: anything that
//! is not a JSON object becomes [`McpRequest::Unknown`] rather than a parse
//! failure, so one malformed request can never sink a whole report.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ============================================
// RequestRecord
// ============================================

/// One logged MCP server request.
///
/// Field names follow the ingest wire format (camelCase JSON). Optional
/// fields are exactly the ones the server may fail to capture: an
/// unauthenticated request has no user account, a sessionless transport has
/// no session id, and a request that died before parsing has no payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestRecord {
    /// Unique identifier for this record
    pub id: Uuid,
    /// When the server started handling the request
    pub started_at: DateTime<Utc>,
    /// Wall-clock handling time in milliseconds
    pub duration_ms: i64,
    /// Deployment revision that served the request
    pub deployment_revision_id: Uuid,
    /// Authenticated user account, when known
    pub user_account_id: Option<Uuid>,
    /// MCP session id, when the transport provided one
    pub mcp_session_id: Option<String>,
    /// Raw User-Agent header, when present
    pub user_agent: Option<String>,
    /// HTTP status code of the response, when one was written
    pub http_status_code: Option<i32>,
    /// Transport-level error message, when the request failed outright
    pub http_error: Option<String>,
    /// Parsed MCP request payload, when one was captured
    pub mcp_request: Option<McpRequest>,
}

impl RequestRecord {
    /// Whether this record counts as a failed request.
    ///
    /// A record is an error when the response status is 400 or above, or
    /// when a transport error was recorded (some failures never produce a
    /// status code at all).
    pub fn is_error(&self) -> bool {
        if let Some(code) = self.http_status_code {
            if code >= 400 {
                return true;
            }
        }
        self.http_error.as_deref().map_or(false, |e| !e.is_empty())
    }

    /// When the server finished handling the request.
    pub fn ended_at(&self) -> DateTime<Utc> {
        self.started_at + Duration::milliseconds(self.duration_ms)
    }

    /// Session id for grouping, if the record carries a usable one.
    ///
    /// Empty strings count as absent: transports have been observed sending
    /// a present-but-empty header, and those records must not clump into a
    /// shared "" session.
    pub fn session_id(&self) -> Option<&str> {
        self.mcp_session_id.as_deref().filter(|id| !id.is_empty())
    }

    /// Tool name for per-tool statistics, if one can be determined.
    pub fn tool_name(&self) -> Option<&str> {
        self.mcp_request.as_ref().and_then(McpRequest::tool_name)
    }

    /// Client product recognized from the user agent.
    pub fn client(&self) -> ClientKind {
        ClientKind::from_user_agent(self.user_agent.as_deref())
    }
}

// ============================================
// McpRequest
// ============================================

/// Best-effort view of a logged MCP request payload.
///
/// Parsing is total: any JSON value converts into one of these variants, so
/// deserializing a record never fails on a malformed payload. The original
/// JSON-RPC shape is reproduced on serialization.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "serde_json::Value")]
pub enum McpRequest {
    /// Payload was not a JSON object (or was missing entirely)
    Unknown,
    /// A `tools/call` invocation with its parameters
    ToolCall {
        /// Tool being invoked; may be empty when the params omit it
        name: String,
        /// Tool arguments; empty when absent or not a JSON object
        arguments: Map<String, Value>,
    },
    /// Any other JSON-RPC method (`initialize`, `tools/list`, ...)
    Other {
        /// Method name; may be empty when the payload omits it
        method: String,
    },
}

impl McpRequest {
    /// Build a `tools/call` payload.
    pub fn tool_call(name: impl Into<String>, arguments: Map<String, Value>) -> Self {
        McpRequest::ToolCall {
            name: name.into(),
            arguments,
        }
    }

    /// Build a plain method payload.
    pub fn other(method: impl Into<String>) -> Self {
        McpRequest::Other {
            method: method.into(),
        }
    }

    /// Name under which this payload is tallied in per-tool statistics.
    ///
    /// Tool calls report their tool name, other methods report the method
    /// itself. Empty names count as absent so that records with unusable
    /// payloads stay out of tool statistics instead of grouping under "".
    pub fn tool_name(&self) -> Option<&str> {
        let name = match self {
            McpRequest::ToolCall { name, .. } => name.as_str(),
            McpRequest::Other { method } => method.as_str(),
            McpRequest::Unknown => return None,
        };
        (!name.is_empty()).then_some(name)
    }

    /// Tool arguments, for `tools/call` payloads.
    pub fn arguments(&self) -> Option<&Map<String, Value>> {
        match self {
            McpRequest::ToolCall { arguments, .. } => Some(arguments),
            _ => None,
        }
    }

    /// Wire representation mirroring the logged JSON-RPC shape.
    fn to_wire(&self) -> Value {
        match self {
            McpRequest::Unknown => Value::Null,
            McpRequest::ToolCall { name, arguments } => serde_json::json!({
                "method": "tools/call",
                "params": {
                    "name": name,
                    "arguments": arguments,
                },
            }),
            McpRequest::Other { method } => serde_json::json!({
                "method": method,
            }),
        }
    }
}

impl From<Value> for McpRequest {
    fn from(value: Value) -> Self {
        let Value::Object(body) = value else {
            return McpRequest::Unknown;
        };

        let method = body.get("method").and_then(Value::as_str).unwrap_or_default();

        // A tools/call only yields tool statistics when its params form a
        // JSON object; otherwise it degrades to a plain method payload.
        if method == "tools/call" {
            if let Some(Value::Object(params)) = body.get("params") {
                let name = params
                    .get("name")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                let arguments = match params.get("arguments") {
                    Some(Value::Object(map)) => map.clone(),
                    _ => Map::new(),
                };
                return McpRequest::ToolCall { name, arguments };
            }
        }

        McpRequest::Other {
            method: method.to_string(),
        }
    }
}

impl Serialize for McpRequest {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.to_wire().serialize(serializer)
    }
}

// ============================================
// ClientKind
// ============================================

/// MCP client products recognized from user agents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientKind {
    /// Cursor editor
    Cursor,
    /// Claude (Pro / desktop) clients
    ClaudePro,
    /// ChatGPT and other OpenAI clients
    #[serde(rename = "chatgpt")]
    ChatGpt,
    /// Node.js SDK clients
    Node,
    /// Anything unrecognized, including absent user agents
    Other,
}

impl ClientKind {
    /// Recognize a client from a raw User-Agent header.
    ///
    /// Matching is case-insensitive substring search, checked in a fixed
    /// order so that an agent mentioning several products resolves the same
    /// way every time. Absent user agents map to [`ClientKind::Other`];
    /// every record lands in exactly one bucket.
    pub fn from_user_agent(user_agent: Option<&str>) -> Self {
        let Some(ua) = user_agent else {
            return ClientKind::Other;
        };
        let ua = ua.to_lowercase();

        if ua.contains("cursor") {
            ClientKind::Cursor
        } else if ua.contains("claude") {
            ClientKind::ClaudePro
        } else if ua.contains("chatgpt") || ua.contains("openai") {
            ClientKind::ChatGpt
        } else if ua.contains("node") {
            ClientKind::Node
        } else {
            ClientKind::Other
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ClientKind::Cursor => "cursor",
            ClientKind::ClaudePro => "claude_pro",
            ClientKind::ChatGpt => "chatgpt",
            ClientKind::Node => "node",
            ClientKind::Other => "other",
        }
    }
}

impl fmt::Display for ClientKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ClientKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "cursor" => Ok(ClientKind::Cursor),
            "claude_pro" => Ok(ClientKind::ClaudePro),
            "chatgpt" => Ok(ClientKind::ChatGpt),
            "node" => Ok(ClientKind::Node),
            "other" => Ok(ClientKind::Other),
            _ => Err(format!("unknown client kind: {}", s)),
        }
    }
}
