// Normalized reply returned to callers
// Author: kelexine (https://github.com/kelexine)

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Provider-independent result of a chat or image call.
///
/// Exactly one of `text`, `data_uri` or `error` is populated.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_uri: Option<String>,

    /// Upstream payload, kept for diagnostics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl NormalizedResponse {
    pub fn text(text: impl Into<String>, raw: Value) -> Self {
        Self {
            text: Some(text.into()),
            raw: Some(raw),
            ..Default::default()
        }
    }

    pub fn data_uri(uri: impl Into<String>) -> Self {
        Self {
            data_uri: Some(uri.into()),
            ..Default::default()
        }
    }

    pub fn error(message: impl Into<String>, raw: Option<Value>) -> Self {
        Self {
            error: Some(message.into()),
            raw,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_image_reply_serializes_only_data_uri() {
        let value = serde_json::to_value(NormalizedResponse::data_uri("data:image/png;base64,AA==")).unwrap();
        assert_eq!(value, json!({ "dataUri": "data:image/png;base64,AA==" }));
    }

    #[test]
    fn test_chat_reply_carries_raw() {
        let value = serde_json::to_value(NormalizedResponse::text("hi", json!([1]))).unwrap();
        assert_eq!(value, json!({ "text": "hi", "raw": [1] }));
    }
}
