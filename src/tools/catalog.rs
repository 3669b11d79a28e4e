//! Tool catalog: typed metadata and parameter validation.
//!
//! One entry per [`Operation`]. The catalog owns what the host sees in
//! `tools/list`; dispatch owns what happens on `tools/call`.

use crate::api::Operation;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::collections::HashMap;

// =============================================================================
// Parameter types
// =============================================================================

/// Parameter type for tool inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamType {
    String,
    Int,
    Number,
    StringList,
    Optional(Box<ParamType>),
}

impl ParamType {
    fn optional(inner: ParamType) -> Self {
        ParamType::Optional(Box::new(inner))
    }

    /// Validate a JSON value against this parameter type.
    pub fn validate(&self, value: &Value) -> Result<(), String> {
        match self {
            ParamType::String => {
                if value.is_string() {
                    Ok(())
                } else {
                    Err(format!("expected string, got {}", value_type_name(value)))
                }
            }
            ParamType::Int => {
                if value.is_i64() || value.is_u64() {
                    Ok(())
                } else {
                    Err(format!("expected integer, got {}", value_type_name(value)))
                }
            }
            ParamType::Number => {
                if value.is_number() {
                    Ok(())
                } else {
                    Err(format!("expected number, got {}", value_type_name(value)))
                }
            }
            ParamType::StringList => {
                if let Some(arr) = value.as_array() {
                    for (i, item) in arr.iter().enumerate() {
                        if !item.is_string() {
                            return Err(format!(
                                "expected string at index {}, got {}",
                                i,
                                value_type_name(item)
                            ));
                        }
                    }
                    Ok(())
                } else {
                    Err(format!("expected array, got {}", value_type_name(value)))
                }
            }
            ParamType::Optional(inner) => {
                if value.is_null() {
                    Ok(())
                } else {
                    inner.validate(value)
                }
            }
        }
    }

    /// JSON Schema fragment for this type (optionality is expressed through
    /// the parent's `required` list).
    pub fn json_schema(&self) -> Value {
        match self {
            ParamType::String => json!({"type": "string"}),
            ParamType::Int => json!({"type": "integer"}),
            ParamType::Number => json!({"type": "number"}),
            ParamType::StringList => json!({"type": "array", "items": {"type": "string"}}),
            ParamType::Optional(inner) => inner.json_schema(),
        }
    }
}

fn value_type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// =============================================================================
// Parameter definition
// =============================================================================

/// A single parameter definition for a tool.
#[derive(Debug, Clone, Serialize)]
pub struct ParamDef {
    pub name: &'static str,
    pub param_type: ParamType,
    pub description: &'static str,
}

impl ParamDef {
    fn new(name: &'static str, param_type: ParamType, description: &'static str) -> Self {
        Self {
            name,
            param_type,
            description,
        }
    }

    pub fn is_required(&self) -> bool {
        !matches!(self.param_type, ParamType::Optional(_))
    }
}

// =============================================================================
// Tool entry
// =============================================================================

/// Complete tool metadata entry.
#[derive(Debug, Clone, Serialize)]
pub struct ToolEntry {
    pub operation: Operation,
    pub description: &'static str,
    pub parameters: Vec<ParamDef>,
    /// Heading of the success text block, e.g. "Direct spends data".
    pub result_label: &'static str,
    /// Verb phrase of the failure text, e.g. "fetching direct spends data".
    pub error_action: &'static str,
}

impl ToolEntry {
    pub fn name(&self) -> &'static str {
        self.operation.name()
    }

    /// JSON Schema object describing the tool arguments.
    pub fn input_schema(&self) -> Value {
        let mut properties = Map::new();
        for param in &self.parameters {
            let mut schema = param.param_type.json_schema();
            if let Some(obj) = schema.as_object_mut() {
                obj.insert("description".to_string(), json!(param.description));
            }
            properties.insert(param.name.to_string(), schema);
        }
        let required: Vec<&str> = self
            .parameters
            .iter()
            .filter(|p| p.is_required())
            .map(|p| p.name)
            .collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
            "additionalProperties": false,
        })
    }

    /// Validate arguments against the declared parameters.
    ///
    /// Returns a list of validation errors (empty = valid).
    pub fn validate_params(&self, params: &Value) -> Vec<String> {
        let empty = Map::new();
        let param_map = match params {
            Value::Object(map) => map,
            Value::Null => &empty,
            _ => return vec!["Parameters must be a JSON object".to_string()],
        };

        let mut errors = Vec::new();

        for param_def in &self.parameters {
            let present = param_map.get(param_def.name).is_some_and(|v| !v.is_null());
            if param_def.is_required() && !present {
                errors.push(format!("Missing required parameter: {}", param_def.name));
            }
        }

        let known_names: HashMap<&str, &ParamDef> =
            self.parameters.iter().map(|p| (p.name, p)).collect();

        for (key, value) in param_map {
            if let Some(param_def) = known_names.get(key.as_str()) {
                if value.is_null() && param_def.is_required() {
                    continue; // already reported as missing
                }
                if let Err(e) = param_def.param_type.validate(value) {
                    errors.push(format!("Parameter '{}': {}", key, e));
                }
            } else {
                errors.push(format!("Unknown parameter: {}", key));
            }
        }

        errors
    }
}

// =============================================================================
// Tool catalog
// =============================================================================

/// The fixed FeedMob tool catalog.
#[derive(Debug)]
pub struct ToolCatalog {
    entries: Vec<ToolEntry>,
}

impl Default for ToolCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolCatalog {
    pub fn new() -> Self {
        Self {
            entries: Operation::ALL.into_iter().map(entry_for).collect(),
        }
    }

    /// Get a tool entry by name.
    pub fn get(&self, name: &str) -> Option<&ToolEntry> {
        self.entries.iter().find(|e| e.name() == name)
    }

    pub fn has_tool(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// All entries, in catalog order.
    pub fn entries(&self) -> &[ToolEntry] {
        &self.entries
    }

    /// `tools/list` payload.
    pub fn list_payload(&self) -> Value {
        let tools: Vec<Value> = self
            .entries
            .iter()
            .map(|entry| {
                json!({
                    "name": entry.name(),
                    "description": entry.description,
                    "inputSchema": entry.input_schema(),
                })
            })
            .collect();
        json!({ "tools": tools })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

const START_DATE: &str = "Start date in YYYY-MM-DD format";
const END_DATE: &str = "End date in YYYY-MM-DD format";

fn date_range() -> Vec<ParamDef> {
    vec![
        ParamDef::new("start_date", ParamType::String, START_DATE),
        ParamDef::new("end_date", ParamType::String, END_DATE),
    ]
}

fn entry_for(operation: Operation) -> ToolEntry {
    let (description, parameters, result_label, error_action) = match operation {
        Operation::GetDirectSpends => (
            "Get direct spends data via FeedMob API.",
            {
                let mut p = date_range();
                p.push(ParamDef::new(
                    "click_url_ids",
                    ParamType::StringList,
                    "Array of click URL IDs",
                ));
                p
            },
            "Direct spends data",
            "fetching direct spends data",
        ),
        Operation::GetInmobiReportIds => (
            "Get Inmobi report IDs for a date range. next step must use tool \
             check_inmobi_report_status to check skan_report_id and non_skan_report_id available",
            date_range(),
            "Inmobi report IDs",
            "fetching Inmobi report IDs",
        ),
        Operation::CheckInmobiReportStatus => (
            "Check the status of an Inmobi report.",
            {
                let mut p = date_range();
                p.push(ParamDef::new(
                    "report_id",
                    ParamType::String,
                    "Report ID to check status for",
                ));
                p
            },
            "Inmobi report status",
            "checking Inmobi report status",
        ),
        Operation::GetInmobiReports => (
            "Get Inmobi reports data. next step should check direct spend from feedmob",
            {
                let mut p = date_range();
                p.push(ParamDef::new("skan_report_id", ParamType::String, "SKAN report ID"));
                p.push(ParamDef::new(
                    "non_skan_report_id",
                    ParamType::String,
                    "Non-SKAN report ID",
                ));
                p
            },
            "Inmobi reports data",
            "fetching Inmobi reports",
        ),
        Operation::CreateDirectSpend => (
            "Create Or Update a direct spend via FeedMob API. At least one of net_spend, \
             gross_spend, partner_paid_action_count or client_paid_action_count is required.",
            vec![
                ParamDef::new("click_url_id", ParamType::Int, "Click URL ID"),
                ParamDef::new("spend_date", ParamType::String, "Spend date in YYYY-MM-DD format"),
                ParamDef::new(
                    "net_spend",
                    ParamType::optional(ParamType::Number),
                    "Net spend amount",
                ),
                ParamDef::new(
                    "gross_spend",
                    ParamType::optional(ParamType::Number),
                    "Gross spend amount",
                ),
                ParamDef::new(
                    "partner_paid_action_count",
                    ParamType::optional(ParamType::Int),
                    "Partner paid action count",
                ),
                ParamDef::new(
                    "client_paid_action_count",
                    ParamType::optional(ParamType::Int),
                    "Client paid action count",
                ),
            ],
            "Direct spend created successfully",
            "creating direct spend",
        ),
        Operation::GetAppsflyerReports => (
            "Get AppsFlyer reports data via FeedMob API.",
            {
                let mut p = date_range();
                p.push(ParamDef::new(
                    "click_url_ids",
                    ParamType::optional(ParamType::StringList),
                    "Array of click URL IDs (optional)",
                ));
                p.push(ParamDef::new(
                    "af_app_ids",
                    ParamType::optional(ParamType::StringList),
                    "Array of AppsFlyer app IDs (optional)",
                ));
                p
            },
            "AppsFlyer reports data",
            "fetching AppsFlyer reports",
        ),
        Operation::GetAdopsReports => (
            "Get AdOps reports data via FeedMob API.",
            vec![ParamDef::new("month", ParamType::String, "Month in YYYY-MM format")],
            "AdOps reports data",
            "fetching AdOps reports",
        ),
        Operation::GetInmobiCampaignMappings => (
            "Get inmobi_campaign_mappings via FeedMob API.",
            Vec::new(),
            "Inmobi campaign mappings",
            "fetching Inmobi campaign mappings",
        ),
        Operation::GetDirectSpendsByClient => (
            "Get direct spends for a client via FeedMob API, optionally narrowed by vendor \
             and click URL IDs.",
            vec![
                ParamDef::new("client_id", ParamType::Int, "Client ID"),
                ParamDef::new("start_date", ParamType::String, START_DATE),
                ParamDef::new("end_date", ParamType::String, END_DATE),
                ParamDef::new("vendor_id", ParamType::optional(ParamType::Int), "Vendor ID (optional)"),
                ParamDef::new(
                    "click_url_ids",
                    ParamType::optional(ParamType::String),
                    "Comma-separated click URL IDs (optional)",
                ),
            ],
            "Direct spends data",
            "fetching direct spends data",
        ),
    };

    ToolEntry {
        operation,
        description,
        parameters,
        result_label,
        error_action,
    }
}

// =============================================================================
// Tests
// =============================================================================
