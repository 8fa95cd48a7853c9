use restcsv_mcp::config::AdapterConfig;
use restcsv_mcp::server::RestCsvServer;
use rmcp::model::{CallToolResult, JsonObject};
use serde_json::Value;

pub const CSV_ID: &str = "6f1c2a4e-3b1d-4c55-9a77-0d5e8f2b9c10";
pub const ROW_ID: &str = "b7e0d9a2-5c43-4f1e-8a6b-2d9c7e1f3a55";
pub const ACTION_ID: &str = "3d2a8f61-9e4b-4c07-b1d5-7a6e0c9f2b48";
pub const WEBHOOK_ID: &str = "c95e1b7d-0a2f-4d83-9e64-1f8b3a7c5d20";

pub fn server_for(base_url: &str) -> anyhow::Result<RestCsvServer> {
    let config = AdapterConfig {
        api_key: "test-key".to_string(),
        base_url: base_url.to_string(),
        timeout: None,
    };
    Ok(restcsv_mcp::build_server(&config)?)
}

pub fn args(v: Value) -> Option<JsonObject> {
    v.as_object().cloned()
}

/// Text of the first content block of a tool result.
pub fn result_text(result: &CallToolResult) -> anyhow::Result<String> {
    let v = serde_json::to_value(result)?;
    v.get("content")
        .and_then(Value::as_array)
        .and_then(|c| c.first())
        .and_then(|c| c.get("text"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("result has no text content: {v}"))
}
