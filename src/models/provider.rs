// Provider selectors
// Author: kelexine (https://github.com/kelexine)

use crate::error::ProxyError;
use std::fmt;
use std::str::FromStr;

/// Providers that can serve `/api/chat`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChatProvider {
    /// Hugging Face Inference API (flattened `inputs` prompt).
    #[default]
    HuggingFace,
    /// Hugging Face Router (OpenAI-compatible chat completions).
    HfRouter,
    /// OpenRouter (OpenAI-compatible chat completions).
    OpenRouter,
}

impl ChatProvider {
    pub const ALL: [ChatProvider; 3] = [
        ChatProvider::HuggingFace,
        ChatProvider::HfRouter,
        ChatProvider::OpenRouter,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChatProvider::HuggingFace => "huggingface",
            ChatProvider::HfRouter => "hf_router",
            ChatProvider::OpenRouter => "openrouter",
        }
    }

    /// Whether the provider speaks the OpenAI chat-completions schema.
    pub fn is_openai_compatible(&self) -> bool {
        matches!(self, ChatProvider::HfRouter | ChatProvider::OpenRouter)
    }
}

impl FromStr for ChatProvider {
    type Err = ProxyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "huggingface" => Ok(ChatProvider::HuggingFace),
            "hf_router" => Ok(ChatProvider::HfRouter),
            "openrouter" => Ok(ChatProvider::OpenRouter),
            other => Err(ProxyError::UnsupportedProvider {
                operation: "chat",
                provider: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for ChatProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Providers that can serve `/api/image`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ImageProvider {
    /// Hugging Face Inference API; replies with raw image bytes.
    #[default]
    HuggingFace,
    /// OpenRouter image generations; replies with base64 JSON.
    OpenRouter,
}

impl ImageProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageProvider::HuggingFace => "huggingface",
            ImageProvider::OpenRouter => "openrouter",
        }
    }
}

impl FromStr for ImageProvider {
    type Err = ProxyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            // "together" models are served through the same inference endpoint
            "huggingface" | "together" => Ok(ImageProvider::HuggingFace),
            "openrouter" => Ok(ImageProvider::OpenRouter),
            other => Err(ProxyError::UnsupportedProvider {
                operation: "image generation",
                provider: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for ImageProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Upstream back-ends that hold a server-side credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Vendor {
    HuggingFace,
    HfRouter,
    OpenRouter,
    OpenAi,
}

impl Vendor {
    pub const ALL: [Vendor; 4] = [
        Vendor::HuggingFace,
        Vendor::HfRouter,
        Vendor::OpenRouter,
        Vendor::OpenAi,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Vendor::HuggingFace => "huggingface",
            Vendor::HfRouter => "hf_router",
            Vendor::OpenRouter => "openrouter",
            Vendor::OpenAi => "openai",
        }
    }

    /// Human-readable name used in error messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            Vendor::HuggingFace => "Hugging Face",
            Vendor::HfRouter => "Hugging Face Router",
            Vendor::OpenRouter => "OpenRouter",
            Vendor::OpenAi => "OpenAI",
        }
    }
}

impl From<ChatProvider> for Vendor {
    fn from(provider: ChatProvider) -> Self {
        match provider {
            ChatProvider::HuggingFace => Vendor::HuggingFace,
            ChatProvider::HfRouter => Vendor::HfRouter,
            ChatProvider::OpenRouter => Vendor::OpenRouter,
        }
    }
}

impl From<ImageProvider> for Vendor {
    fn from(provider: ImageProvider) -> Self {
        match provider {
            ImageProvider::HuggingFace => Vendor::HuggingFace,
            ImageProvider::OpenRouter => Vendor::OpenRouter,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_provider_parsing() {
        assert_eq!("huggingface".parse::<ChatProvider>().unwrap(), ChatProvider::HuggingFace);
        assert_eq!("hf_router".parse::<ChatProvider>().unwrap(), ChatProvider::HfRouter);
        assert_eq!("openrouter".parse::<ChatProvider>().unwrap(), ChatProvider::OpenRouter);
    }

    #[test]
    fn test_unknown_chat_provider_is_rejected() {
        let err = "together".parse::<ChatProvider>().unwrap_err();
        assert!(matches!(err, ProxyError::UnsupportedProvider { .. }));
        assert!(err.to_string().contains("together"));
    }

    #[test]
    fn test_together_is_image_alias() {
        assert_eq!("together".parse::<ImageProvider>().unwrap(), ImageProvider::HuggingFace);
        assert!("hf_router".parse::<ImageProvider>().is_err());
    }

    #[test]
    fn test_round_trip_names() {
        for provider in ChatProvider::ALL {
            assert_eq!(provider.as_str().parse::<ChatProvider>().unwrap(), provider);
        }
    }
}
