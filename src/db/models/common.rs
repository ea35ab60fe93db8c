//! Common types and utilities shared across models.

use serde::Serialize;

/// Body of responses that carry only a message
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Helper to parse a JSON string list (amenities, image URLs) from the database
pub fn parse_list(json: &str) -> Vec<String> {
    serde_json::from_str(json).unwrap_or_default()
}

/// Helper to serialize a string list to JSON for the database
pub fn serialize_list(items: &[String]) -> String {
    serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string())
}

/// Current time as stored in `created_at` / `updated_at` columns
pub fn now_timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}
