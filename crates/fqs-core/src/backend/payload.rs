//! Normalization of backend error bodies.
//!
//! The backend answers failures with a bare string, `{ message: "..." }`,
//! `{ message: [...] }` (validation pipes), `{ error: "..." }`, or a nested
//! object. Each shape gets its own variant and one mapping to display text.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Shape of a failed response body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum ErrorPayload {
    /// Plain text or a JSON string
    Text(String),
    /// `{ "message": "..." }`
    Message(String),
    /// `{ "message": ["...", "..."] }`
    Messages(Vec<String>),
    /// `{ "error": "..." }`
    Error(String),
    /// `{ "message": { ... } }`
    Structured(Value),
    /// Empty or unrecognized body
    Empty,
}

impl ErrorPayload {
    /// Classify a raw response body.
    pub fn from_body(body: &str) -> Self {
        let trimmed = body.trim();
        if trimmed.is_empty() {
            return Self::Empty;
        }

        match serde_json::from_str::<Value>(trimmed) {
            Ok(Value::String(text)) => Self::Text(text),
            Ok(Value::Object(map)) => match (map.get("message"), map.get("error")) {
                (Some(Value::String(message)), _) => Self::Message(message.clone()),
                (Some(Value::Array(items)), _) => Self::Messages(
                    items
                        .iter()
                        .map(|item| match item {
                            Value::String(s) => s.clone(),
                            other => other.to_string(),
                        })
                        .collect(),
                ),
                (_, Some(Value::String(error))) => Self::Error(error.clone()),
                (Some(message @ Value::Object(_)), _) => Self::Structured(message.clone()),
                _ => Self::Empty,
            },
            Ok(_) | Err(_) => Self::Text(trimmed.to_string()),
        }
    }

    /// Message text carried by the payload, if any.
    pub fn message(&self) -> Option<String> {
        match self {
            Self::Text(text) | Self::Message(text) | Self::Error(text) => Some(text.clone()),
            Self::Messages(items) if !items.is_empty() => Some(items.join(", ")),
            Self::Messages(_) | Self::Empty => None,
            Self::Structured(value) => Some(value.to_string()),
        }
    }

    /// Single display string, using `fallback` when the body said nothing.
    pub fn display_message(&self, fallback: &str) -> String {
        self.message()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| fallback.to_string())
    }
}
