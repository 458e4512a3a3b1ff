//! Result helpers shared by every tool definition.

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use tracing::warn;

use crate::core::error::Error;

/// Deserialize MCP call arguments into a tool's params struct.
pub fn parse_arguments<T: DeserializeOwned>(arguments: Map<String, Value>) -> Result<T, McpError> {
    serde_json::from_value(Value::Object(arguments))
        .map_err(|e| McpError::invalid_params(e.to_string(), None))
}

/// Success with a one-line summary and the full payload as structured content.
pub fn structured_result<T: Serialize>(summary: String, data: &T) -> CallToolResult {
    match serde_json::to_value(data) {
        Ok(structured) => CallToolResult {
            content: vec![Content::text(summary)],
            structured_content: Some(structured),
            is_error: Some(false),
            meta: None,
        },
        Err(e) => {
            warn!("Failed to serialize structured content: {}", e);
            error_result(Error::from(e))
        }
    }
}

/// Domain failure as `isError: true` carrying `{code, message, details}`.
pub fn error_result(error: impl Into<Error>) -> CallToolResult {
    let error = error.into();
    let body = error.body();
    warn!(code = body.code, "{}", body.message);

    CallToolResult {
        content: vec![Content::text(format!("{}: {}", body.code, body.message))],
        structured_content: serde_json::to_value(&body).ok(),
        is_error: Some(true),
        meta: None,
    }
}

/// JSON-RPC `tools/call` result for the HTTP transport.
#[cfg(feature = "http")]
pub fn http_response(result: CallToolResult) -> Value {
    let mut response = serde_json::json!({
        "content": result.content,
        "isError": result.is_error.unwrap_or(false)
    });

    if let (Some(structured), Some(object)) = (result.structured_content, response.as_object_mut())
    {
        object.insert("structuredContent".to_string(), structured);
    }

    response
}

/// Parse HTTP arguments, which may be absent or `null` for no-argument tools.
#[cfg(feature = "http")]
pub fn http_arguments<T: DeserializeOwned>(arguments: Value) -> Result<T, String> {
    let arguments = match arguments {
        Value::Null => Value::Object(Map::new()),
        other => other,
    };
    serde_json::from_value(arguments).map_err(|e| format!("Invalid arguments: {}", e))
}
