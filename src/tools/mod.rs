//! Tool definitions and handlers
//!
//! The callable surface the conversational agent host drives. The host
//! owns the language-model loop; this module owns what each tool does. A
//! failing tool reports an error result back to the host rather than
//! aborting the session.

pub mod bandwidth;
pub mod report;

use crate::retrieve::RetrievalService;
use serde_json::{json, Value};
use std::collections::HashMap;

/// Tool definition exposed to the agent host
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Result of a tool invocation
#[derive(Debug, Clone, serde::Serialize)]
pub struct ToolResult {
    pub content: String,
    pub is_error: bool,
}

impl ToolResult {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_error: false,
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_error: true,
        }
    }
}

/// Get all available tool definitions
pub fn get_tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: "consult_manual".to_string(),
            description: "Search the indexed equipment manuals for technical information. \
                          Use for specifications, procedures, and configuration questions."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "question": {
                        "type": "string",
                        "description": "The technical question, in natural language"
                    }
                },
                "required": ["question"]
            }),
        },
        ToolDefinition {
            name: "create_maintenance_report".to_string(),
            description: "File a maintenance incident for electronic-security equipment \
                          (CCTV, alarms, sensors) and get back a ticket confirmation."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "equipment": {
                        "type": "string",
                        "description": "Name of the failing system or device"
                    },
                    "failure_type": {
                        "type": "string",
                        "description": "Short description of the failure"
                    },
                    "priority": {
                        "type": "string",
                        "description": "Low, Medium, or High (default: Medium)",
                        "default": "Medium"
                    }
                },
                "required": ["equipment", "failure_type"]
            }),
        },
        ToolDefinition {
            name: "calc_cctv_bandwidth".to_string(),
            description: "Estimate the network bandwidth and storage needed for an IP \
                          camera deployment."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "cameras": {
                        "type": "integer",
                        "description": "Number of cameras",
                        "minimum": 1
                    },
                    "resolution": {
                        "type": "string",
                        "description": "720p, 1080p, or 4K (default: 1080p)",
                        "default": "1080p"
                    },
                    "fps": {
                        "type": "integer",
                        "description": "Frames per second, typically 15-30 (default: 25)",
                        "default": 25
                    }
                },
                "required": ["cameras"]
            }),
        },
    ]
}

/// Handle a tool call from the agent host
pub async fn handle_tool_call(
    name: &str,
    arguments: &HashMap<String, Value>,
    retrieval: &RetrievalService,
) -> ToolResult {
    match name {
        "consult_manual" => handle_consult(arguments, retrieval).await,
        "create_maintenance_report" => handle_report(arguments),
        "calc_cctv_bandwidth" => handle_bandwidth(arguments),
        _ => ToolResult::error(format!("Unknown tool: {}", name)),
    }
}

async fn handle_consult(
    arguments: &HashMap<String, Value>,
    retrieval: &RetrievalService,
) -> ToolResult {
    let question = match arguments.get("question") {
        Some(Value::String(q)) if !q.trim().is_empty() => q.clone(),
        _ => return ToolResult::error("Missing required parameter: question"),
    };

    match retrieval.consult_manual(&question).await {
        Ok(context) => ToolResult::text(context),
        Err(e) => ToolResult::error(format!("Retrieval failed: {}", e)),
    }
}

fn handle_report(arguments: &HashMap<String, Value>) -> ToolResult {
    let equipment = match arguments.get("equipment") {
        Some(Value::String(s)) if !s.trim().is_empty() => s,
        _ => return ToolResult::error("Missing required parameter: equipment"),
    };

    let failure_type = match arguments.get("failure_type") {
        Some(Value::String(s)) if !s.trim().is_empty() => s,
        _ => return ToolResult::error("Missing required parameter: failure_type"),
    };

    let priority = match arguments.get("priority") {
        Some(Value::String(s)) => match s.parse::<report::Priority>() {
            Ok(p) => p,
            Err(e) => return ToolResult::error(e.to_string()),
        },
        _ => report::Priority::default(),
    };

    ToolResult::text(report::create_report(equipment, failure_type, priority))
}

fn handle_bandwidth(arguments: &HashMap<String, Value>) -> ToolResult {
    let cameras = match arguments.get("cameras").and_then(|v| v.as_u64()) {
        Some(n) if n > 0 => n as u32,
        _ => return ToolResult::error("Missing required parameter: cameras (positive integer)"),
    };

    let resolution = match arguments.get("resolution") {
        Some(Value::String(s)) => match s.parse::<bandwidth::Resolution>() {
            Ok(r) => r,
            Err(e) => return ToolResult::error(e.to_string()),
        },
        _ => bandwidth::Resolution::default(),
    };

    let fps = match arguments.get("fps") {
        Some(v) => match v.as_u64() {
            Some(n) if n > 0 => n as u32,
            _ => return ToolResult::error("Parameter fps must be a positive integer"),
        },
        None => 25,
    };

    let estimate = bandwidth::calculate_bandwidth(cameras, resolution, fps);
    ToolResult::text(bandwidth::format_estimate(&estimate))
}
