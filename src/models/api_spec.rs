//! Embedded API specification payloads.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

/// A spec uploaded as a file: the raw text plus whatever metadata the editor kept.
///
/// Everything but `content` stays in `metadata` exactly as read, `name` included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecFile {
    pub content: String,
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl SpecFile {
    pub fn name(&self) -> Option<&str> {
        self.metadata.get("name").and_then(Value::as_str)
    }
}

/// The shapes an embedded spec can take, resolved when the project is deserialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ApiSpecContent {
    /// Raw OpenAPI/AsyncAPI text.
    Text(String),
    /// A named file payload with a `content` field.
    File(SpecFile),
    /// Any other JSON value; its text is recovered by [`ApiSpecContent::raw_text`].
    Opaque(Value),
}

impl ApiSpecContent {
    pub fn text(content: impl Into<String>) -> Self {
        ApiSpecContent::Text(content.into())
    }

    pub fn file(name: impl Into<String>, content: impl Into<String>) -> Self {
        let mut metadata = Map::new();
        metadata.insert("name".to_string(), Value::String(name.into()));
        ApiSpecContent::File(SpecFile {
            content: content.into(),
            metadata,
        })
    }

    /// The raw spec text written to the exported `.yaml` file.
    ///
    /// Opaque objects are searched for `data`, `text` and `yaml` strings, then a
    /// `json` field (pretty-printed), and finally stringified whole. A value that
    /// cannot be stringified yields an empty document.
    pub fn raw_text(&self) -> String {
        match self {
            ApiSpecContent::Text(text) => text.clone(),
            ApiSpecContent::File(file) => file.content.clone(),
            ApiSpecContent::Opaque(value) => opaque_text(value),
        }
    }
}

fn opaque_text(value: &Value) -> String {
    if let Some(object) = value.as_object() {
        for key in ["data", "text", "yaml"] {
            if let Some(Value::String(text)) = object.get(key) {
                return text.clone();
            }
        }
        if let Some(json) = object.get("json") {
            match serde_json::to_string_pretty(json) {
                Ok(text) => return text,
                Err(e) => warn!("Failed to stringify embedded json spec: {}", e),
            }
        }
    }
    match serde_json::to_string(value) {
        Ok(text) => text,
        Err(e) => {
            warn!("Failed to stringify spec payload, writing empty file: {}", e);
            String::new()
        }
    }
}

/// The spec slots of one API version.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ApiSpecs {
    /// REST spec (OpenAPI).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openapi: Option<ApiSpecContent>,
    /// MQTT spec (AsyncAPI).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mqtt: Option<ApiSpecContent>,
}

impl ApiSpecs {
    pub fn is_empty(&self) -> bool {
        self.openapi.is_none() && self.mqtt.is_none()
    }
}
