use serde::{Deserialize, Serialize};
use std::fmt;

/// Successful authenticate response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access: String,
    #[serde(default)]
    pub refresh: String,
    #[serde(default)]
    pub user: serde_json::Value,
}

/// Body of a non-success response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteErrorBody {
    /// `{field: [messages]}` in the order the backend sent them. A top-level
    /// JSON array is keyed by index (`"0"`, `"1"`, ...).
    Fields(Vec<(String, Vec<String>)>),
    /// Plain text, a JSON string, or a JSON scalar.
    Message(String),
    Empty,
}

impl RemoteErrorBody {
    /// Decode a response body. Never fails: anything unrecognised is kept as
    /// text.
    pub fn from_text(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return RemoteErrorBody::Empty;
        }
        match serde_json::from_str::<serde_json::Value>(trimmed) {
            Ok(serde_json::Value::Object(map)) => RemoteErrorBody::Fields(
                map.into_iter()
                    .map(|(field, value)| (field, messages_of(value)))
                    .collect(),
            ),
            Ok(serde_json::Value::Array(items)) => RemoteErrorBody::Fields(
                items
                    .into_iter()
                    .enumerate()
                    .map(|(i, value)| (i.to_string(), messages_of(value)))
                    .collect(),
            ),
            Ok(serde_json::Value::String(s)) => RemoteErrorBody::Message(s),
            Ok(serde_json::Value::Null) => RemoteErrorBody::Empty,
            Ok(other) => RemoteErrorBody::Message(other.to_string()),
            Err(_) => RemoteErrorBody::Message(trimmed.to_string()),
        }
    }
}

fn messages_of(value: serde_json::Value) -> Vec<String> {
    match value {
        serde_json::Value::Array(items) => items.into_iter().map(text_of).collect(),
        other => vec![text_of(other)],
    }
}

fn text_of(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    }
}

impl fmt::Display for RemoteErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteErrorBody::Fields(fields) => {
                for (i, (field, messages)) in fields.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{field}: {}", messages.join(", "))?;
                }
                Ok(())
            }
            RemoteErrorBody::Message(s) => f.write_str(s),
            RemoteErrorBody::Empty => Ok(()),
        }
    }
}
