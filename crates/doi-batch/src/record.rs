//! Record model: JSON:API DOI resources and their table summaries.

use doi_batch_engine::{normalize_state, WorkflowState};
use doi_batch_path::{get, parse_path};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::StoreError;

/// Placeholder used where a record carries no identifier.
pub const UNKNOWN_ID: &str = "Unknown";

/// A DOI resource: identifier plus its attribute document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", default = "default_type")]
    pub kind: String,
    #[serde(default = "empty_attributes")]
    pub attributes: Value,
}

fn default_type() -> String {
    "dois".to_string()
}

fn empty_attributes() -> Value {
    Value::Object(Map::new())
}

impl Record {
    pub fn new(id: impl Into<String>, attributes: Value) -> Self {
        Self {
            id: Some(id.into()),
            kind: default_type(),
            attributes,
        }
    }

    pub fn display_id(&self) -> &str {
        self.id.as_deref().unwrap_or(UNKNOWN_ID)
    }
}

/// Decode records from a JSON:API envelope (`{"data": [...]}` or
/// `{"data": {...}}`), a bare array of resources, or a single resource.
pub fn records_from_json(value: Value) -> Result<Vec<Record>, StoreError> {
    let value = match value {
        Value::Object(mut map) if map.contains_key("data") => map.remove("data").unwrap_or(Value::Null),
        other => other,
    };
    Ok(match value {
        Value::Array(_) => serde_json::from_value(value)?,
        other => vec![serde_json::from_value(other)?],
    })
}

/// Encode records as a JSON:API `{"data": [...]}` envelope.
pub fn records_to_json(records: &[Record]) -> Result<Value, StoreError> {
    let mut envelope = Map::new();
    envelope.insert("data".to_string(), serde_json::to_value(records)?);
    Ok(Value::Object(envelope))
}

/// One row of a record listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSummary {
    pub doi: String,
    pub status: WorkflowState,
    pub prefix: String,
    pub title: String,
    pub publication_year: String,
}

impl RecordSummary {
    pub fn from_record(record: &Record) -> Self {
        let attributes = &record.attributes;
        let text = |key: &str| attributes.get(key).and_then(Value::as_str);

        let doi = text("doi")
            .or(record.id.as_deref())
            .unwrap_or(UNKNOWN_ID)
            .to_string();
        let status = text("state")
            .or_else(|| text("status"))
            .map(normalize_state)
            .unwrap_or(WorkflowState::Unknown);
        let prefix = text("prefix")
            .map(str::to_string)
            .or_else(|| text("doi").and_then(|d| d.split('/').next()).map(str::to_string))
            .unwrap_or_else(|| "N/A".to_string());
        let title = first_title(attributes).unwrap_or("Untitled").to_string();
        let publication_year = match attributes.get("publicationYear") {
            None | Some(Value::Null) => "N/A".to_string(),
            Some(Value::String(s)) if s.is_empty() => "N/A".to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        };

        Self {
            doi,
            status,
            prefix,
            title,
            publication_year,
        }
    }
}

fn first_title(attributes: &Value) -> Option<&str> {
    get(attributes, parse_path("titles").segments())?
        .as_array()?
        .iter()
        .find_map(|item| item.get("title").and_then(Value::as_str))
}
