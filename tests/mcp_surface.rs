//! The MCP tool surface: listing, argument parsing and structured results.

use std::sync::Arc;

use medcalc_mcp_server::core::{Config, McpServer};
use medcalc_mcp_server::domains::tools::definitions::{
    CalculateBatchParams, CalculateBatchTool, CalculateParams, CalculateTool, DiscoverToolsParams,
    DiscoverToolsTool,
};
use medcalc_mcp_server::domains::tools::{ToolContext, ToolDispatcher};
use serde_json::json;

fn context() -> Arc<ToolContext> {
    Arc::new(ToolContext::builtin(&Config::default()).unwrap())
}

#[test]
fn server_lists_every_dispatchable_tool() {
    let server = tokio_test::assert_ok!(McpServer::new(Config::default()));
    let listed: Vec<String> = server
        .list_tools()
        .iter()
        .map(|t| t["name"].as_str().unwrap().to_string())
        .collect();

    for name in ToolDispatcher::tool_names() {
        assert!(listed.iter().any(|l| l == name), "{name} not listed");
    }
}

#[test]
fn discover_then_schema_then_calculate() {
    let ctx = context();

    let discovered = DiscoverToolsTool::execute(
        &DiscoverToolsParams {
            by: "icd10".into(),
            value: "N18".into(),
            limit: None,
        },
        &ctx,
    );
    let data = discovered.structured_content.unwrap();
    let ids: Vec<&str> = data["tools"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["tool_id"].as_str().unwrap())
        .collect();
    assert!(ids.contains(&"ckd_epi_2021"));

    let params: CalculateParams = serde_json::from_value(json!({
        "tool_id": "ckd_epi_2021",
        "params": {"creatinine": 1.2, "age": 65, "sex": "male"}
    }))
    .unwrap();
    let result = CalculateTool::execute(&params, &ctx);
    assert_eq!(result.is_error, Some(false));
    assert_eq!(result.structured_content.unwrap()["value"], 67.1);
}

#[test]
fn cross_field_error_is_structured() {
    let params: CalculateParams = serde_json::from_value(json!({
        "tool_id": "mean_arterial_pressure",
        "params": {"systolic_bp": 70, "diastolic_bp": 90}
    }))
    .unwrap();
    let result = CalculateTool::execute(&params, &context());
    assert_eq!(result.is_error, Some(true));
    let body = result.structured_content.unwrap();
    assert_eq!(body["code"], "CROSS_FIELD_RULE_VIOLATION");
    assert!(body["message"].as_str().unwrap().contains("systolic"));
}

#[test]
fn batch_keeps_order_and_isolates_failures() {
    let params: CalculateBatchParams = serde_json::from_value(json!({
        "items": [
            {"tool_id": "bmi", "params": {"weight": 70, "height": 175}},
            {"tool_id": "not_a_tool", "params": {}},
            {"tool_id": "anion_gap", "params": {"sodium": 500}},
            {"tool_id": "qsofa_score", "params": {"rr": 24, "sbp": 95, "ams": true}}
        ]
    }))
    .unwrap();
    let data = CalculateBatchTool::execute(&params, &context())
        .structured_content
        .unwrap();

    let statuses: Vec<&str> = data["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["status"].as_str().unwrap())
        .collect();
    assert_eq!(statuses, vec!["ok", "error", "error", "ok"]);
    assert_eq!(data["results"][2]["error"]["code"], "HARD_RANGE_VIOLATION");
    assert_eq!(data["results"][3]["result"]["value"], 3.0);
}

#[cfg(feature = "http")]
#[tokio::test]
async fn http_call_matches_direct_execution() {
    let server = McpServer::new(Config::default()).unwrap();
    let response = server
        .call_tool(
            "get_related_tools",
            json!({"tool_id": "ckd_epi_2021", "limit": 2}),
        )
        .await
        .unwrap();
    assert_eq!(response["isError"], false);
    assert!(response["structuredContent"]["related"].as_array().unwrap().len() <= 2);
}
