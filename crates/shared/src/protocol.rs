use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::domain::{StepId, TaskState};

/// `mode` value understood by `/api/step1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step1Mode {
    Scrape,
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step1Request {
    pub mode: Step1Mode,
    pub keyword: String,
    pub num_jobs: u32,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step3Request {
    pub filename: String,
}

/// Body of a step start request; steps without a payload post nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepRequest {
    Scrape(Step1Request),
    ConvertCv(Step3Request),
    Empty(StepId),
}

impl StepRequest {
    pub fn step(&self) -> StepId {
        match self {
            StepRequest::Scrape(_) => StepId::SCRAPE,
            StepRequest::ConvertCv(_) => StepId::CONVERT_CV,
            StepRequest::Empty(step) => *step,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Full pipeline snapshot returned by `/api/logs`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LogsSnapshot {
    #[serde(default)]
    pub logs: Vec<String>,
    #[serde(default, deserialize_with = "lenient_task_state")]
    pub task_state: TaskState,
    #[serde(default)]
    pub active_task: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl LogsSnapshot {
    /// The active task as a known step; unknown names count as no task.
    pub fn active_step(&self) -> Option<StepId> {
        self.active_task
            .as_deref()
            .and_then(|name| name.parse::<StepId>().ok())
    }
}

/// Unknown, mistyped or null states read as idle so the snapshot still decodes.
fn lenient_task_state<'de, D>(deserializer: D) -> Result<TaskState, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(name)) => name.parse().unwrap_or_default(),
        _ => TaskState::Idle,
    })
}

/// Result payload of `/api/preview/<step>`, classified by shape.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub enum PreviewPayload {
    Error(String),
    Records(Vec<Map<String, Value>>),
    Content(String),
    Empty,
}

impl From<Value> for PreviewPayload {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(rows) => PreviewPayload::Records(
                rows.into_iter()
                    .map(|row| match row {
                        Value::Object(fields) => fields,
                        other => {
                            let mut fields = Map::new();
                            fields.insert("value".to_string(), other);
                            fields
                        }
                    })
                    .collect(),
            ),
            Value::Object(mut fields) => {
                if let Some(error) = fields.remove("error").filter(is_truthy) {
                    PreviewPayload::Error(display_value(&error))
                } else if let Some(content) = fields.remove("content").filter(is_truthy) {
                    PreviewPayload::Content(display_value(&content))
                } else {
                    PreviewPayload::Empty
                }
            }
            _ => PreviewPayload::Empty,
        }
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::String(text) => !text.is_empty(),
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Renders a JSON value as plain text; strings are not quoted and null is empty.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
