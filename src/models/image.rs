// Image request types
// Author: kelexine (https://github.com/kelexine)

use super::non_empty;
use super::provider::ImageProvider;
use crate::error::{ProxyError, Result};
use serde::{Deserialize, Serialize};

/// `/api/image` body as sent by callers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
}

/// Validated image generation request. Model and prompt are mandatory.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRequest {
    pub provider: ImageProvider,
    pub model: String,
    pub prompt: String,
}

impl TryFrom<ImageBody> for ImageRequest {
    type Error = ProxyError;

    fn try_from(body: ImageBody) -> Result<Self> {
        let (model, prompt) = match (non_empty(body.model), non_empty(body.prompt)) {
            (Some(model), Some(prompt)) => (model, prompt),
            _ => {
                return Err(ProxyError::InvalidRequest(
                    "Model and prompt are required.".to_string(),
                ))
            }
        };

        let provider = match non_empty(body.provider) {
            Some(name) => name.parse()?,
            None => ImageProvider::default(),
        };

        Ok(Self {
            provider,
            model,
            prompt,
        })
    }
}
