//! JSON-RPC method router. Maps MCP methods onto the tool dispatcher.

use crate::mcp::prompts;
use crate::tools::{ToolDispatcher, ToolOutcome};
use crate::types::{Error, ErrorKind};
use serde_json::{json, Map, Value};

pub const MCP_PROTOCOL_VERSION: &str = "2024-11-05";
pub const SERVER_NAME: &str = "feedmob-mcp";

// =============================================================================
// JSON-RPC errors
// =============================================================================

/// JSON-RPC error object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

impl RpcError {
    pub fn parse_error(message: impl Into<String>) -> Self {
        Self {
            code: -32700,
            message: message.into(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            code: -32600,
            message: message.into(),
        }
    }

    pub fn method_not_found(method: &str) -> Self {
        Self {
            code: -32601,
            message: format!("Method not found: {method}"),
        }
    }

    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self {
            code: -32602,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: -32603,
            message: message.into(),
        }
    }
}

pub fn success_response(id: Value, result: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "result": result,
    })
}

pub fn error_response(id: Value, error: RpcError) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": {
            "code": error.code,
            "message": error.message,
        },
    })
}

// =============================================================================
// Routing
// =============================================================================

/// Route one JSON-RPC request.
pub async fn route_request(
    dispatcher: &ToolDispatcher,
    method: &str,
    params: Value,
) -> Result<Value, RpcError> {
    match method {
        "initialize" => Ok(initialize_payload()),
        "ping" => Ok(json!({})),
        "tools/list" => Ok(dispatcher.catalog().list_payload()),
        "tools/call" => tools_call(dispatcher, params).await,
        "prompts/list" => Ok(prompts::list_payload()),
        "prompts/get" => prompts_get(params),
        _ => Err(RpcError::method_not_found(method)),
    }
}

fn initialize_payload() -> Value {
    json!({
        "protocolVersion": MCP_PROTOCOL_VERSION,
        "capabilities": {
            "tools": { "listChanged": false },
            "prompts": { "listChanged": false },
        },
        "serverInfo": {
            "name": SERVER_NAME,
            "version": env!("CARGO_PKG_VERSION"),
        },
    })
}

fn object_params(params: Value, method: &str) -> Result<Map<String, Value>, RpcError> {
    match params {
        Value::Object(map) => Ok(map),
        _ => Err(RpcError::invalid_params(format!(
            "{method} params must be an object"
        ))),
    }
}

fn name_field(params: &Map<String, Value>, method: &str) -> Result<String, RpcError> {
    params
        .get("name")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| RpcError::invalid_params(format!("{method} requires string field 'name'")))
}

async fn tools_call(dispatcher: &ToolDispatcher, params: Value) -> Result<Value, RpcError> {
    let mut params = object_params(params, "tools/call")?;
    let name = name_field(&params, "tools/call")?;
    let arguments = params.remove("arguments").unwrap_or(Value::Null);

    let outcome = match dispatcher.invoke(&name, arguments).await {
        Ok(outcome) => outcome,
        Err(err) if err.kind() == ErrorKind::UnknownTool => {
            return Err(RpcError::invalid_params(err.to_string()))
        }
        Err(err) => return Err(RpcError::internal(err.to_string())),
    };

    let entry = dispatcher
        .catalog()
        .get(&name)
        .ok_or_else(|| RpcError::internal(Error::UnknownTool(name.clone()).to_string()))?;

    let (text, is_error) = match outcome {
        ToolOutcome::Success(payload) => {
            let pretty = serde_json::to_string_pretty(&payload)
                .map_err(|e| RpcError::internal(format!("failed to render payload: {e}")))?;
            (format!("{}:\n```json\n{}\n```", entry.result_label, pretty), false)
        }
        ToolOutcome::Error(message) => (format!("Error {}: {}", entry.error_action, message), true),
    };

    Ok(json!({
        "content": [{ "type": "text", "text": text }],
        "isError": is_error,
    }))
}

fn prompts_get(params: Value) -> Result<Value, RpcError> {
    let params = object_params(params, "prompts/get")?;
    let name = name_field(&params, "prompts/get")?;
    prompts::find(&name)
        .map(|p| p.get_payload())
        .ok_or_else(|| RpcError::invalid_params(format!("unknown prompt: {name}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{api_config, RecordingTransport, Reply};
    use crate::api::FeedmobClient;
    use std::sync::Arc;

    fn dispatcher(reply: Reply) -> ToolDispatcher {
        let transport = Arc::new(RecordingTransport::new(reply));
        ToolDispatcher::new(Arc::new(FeedmobClient::with_transport(&api_config(), transport)))
    }

    #[tokio::test]
    async fn test_initialize() {
        let d = dispatcher(Reply::Payload(json!({})));
        let result = route_request(&d, "initialize", json!({})).await.unwrap();
        assert_eq!(result["serverInfo"]["name"], SERVER_NAME);
        assert_eq!(result["protocolVersion"], MCP_PROTOCOL_VERSION);
        assert!(result["capabilities"]["tools"].is_object());
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let d = dispatcher(Reply::Payload(json!({})));
        let err = route_request(&d, "resources/list", Value::Null).await.unwrap_err();
        assert_eq!(err.code, -32601);
    }

    #[tokio::test]
    async fn test_tools_call_success_text() {
        let d = dispatcher(Reply::Payload(json!({"month": "2024-05", "rows": []})));
        let result = route_request(
            &d,
            "tools/call",
            json!({"name": "get_adops_reports", "arguments": {"month": "2024-05"}}),
        )
        .await
        .unwrap();

        assert_eq!(result["isError"], false);
        let text = result["content"][0]["text"].as_str().unwrap();
        assert!(text.starts_with("AdOps reports data:\n```json\n"), "{text}");
        assert!(text.contains("\"month\": \"2024-05\""));
        assert!(text.ends_with("\n```"));
    }

    #[tokio::test]
    async fn test_tools_call_error_text() {
        let d = dispatcher(Reply::Status(404));
        let result = route_request(
            &d,
            "tools/call",
            json!({"name": "get_inmobi_reports", "arguments": {
                "start_date": "a", "end_date": "b", "skan_report_id": "s", "non_skan_report_id": "n"
            }}),
        )
        .await
        .unwrap();

        assert_eq!(result["isError"], true);
        assert_eq!(
            result["content"][0]["text"],
            "Error fetching Inmobi reports: get_inmobi_reports request failed: Not Found"
        );
    }

    #[tokio::test]
    async fn test_tools_call_unknown_tool_is_invalid_params() {
        let d = dispatcher(Reply::Payload(json!({})));
        let err = route_request(&d, "tools/call", json!({"name": "nope"}))
            .await
            .unwrap_err();
        assert_eq!(err.code, -32602);
        assert_eq!(err.message, "unknown tool: nope");
    }

    #[tokio::test]
    async fn test_tools_call_requires_name() {
        let d = dispatcher(Reply::Payload(json!({})));
        let err = route_request(&d, "tools/call", json!({"arguments": {}}))
            .await
            .unwrap_err();
        assert_eq!(err.code, -32602);
    }

    #[tokio::test]
    async fn test_prompts_get() {
        let d = dispatcher(Reply::Payload(json!({})));
        let result = route_request(&d, "prompts/get", json!({"name": "inmobi_reports_follow_up"}))
            .await
            .unwrap();
        assert_eq!(result["messages"][0]["role"], "user");

        let err = route_request(&d, "prompts/get", json!({"name": "x"}))
            .await
            .unwrap_err();
        assert_eq!(err.code, -32602);
    }
}
