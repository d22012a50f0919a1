// Error handling tests
// Author: kelexine (https://github.com/kelexine)

use axum::http::StatusCode;
use provider_proxy::error::{ProxyError, CHAT_FAILED};
use serde_json::json;

#[test]
fn test_error_display_messages() {
    let errors = vec![
        ProxyError::MissingCredential { provider: "OpenRouter", env_var: "OPENROUTER_KEY" },
        ProxyError::InvalidRequest("Bad request".to_string()),
        ProxyError::UnsupportedProvider { operation: "chat", provider: "bard".to_string() },
        ProxyError::Upstream { context: CHAT_FAILED, status: Some(502), details: json!("bad gateway") },
        ProxyError::UnexpectedResponse { context: "Unexpected image response", raw: json!({}) },
        ProxyError::Internal("boom".to_string()),
    ];

    for error in errors {
        let display = format!("{}", error);
        assert!(!display.is_empty(), "Error should have display message");
    }
}

#[test]
fn test_client_errors_are_400() {
    let missing = ProxyError::MissingCredential { provider: "Hugging Face", env_var: "HF_API_KEY" };
    assert_eq!(missing.status_code(), StatusCode::BAD_REQUEST);
    assert!(missing.to_string().contains("Hugging Face"));

    let invalid = ProxyError::InvalidRequest("Model and prompt are required.".to_string());
    assert_eq!(invalid.status_code(), StatusCode::BAD_REQUEST);

    let unsupported = ProxyError::UnsupportedProvider { operation: "image generation", provider: "hf_router".to_string() };
    assert_eq!(unsupported.status_code(), StatusCode::BAD_REQUEST);

    let too_large = ProxyError::PayloadTooLarge("length limit exceeded".to_string());
    assert_eq!(too_large.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(too_large.kind(), "payload_too_large");
}

#[test]
fn test_upstream_error_body_carries_details() {
    let error = ProxyError::Upstream {
        context: CHAT_FAILED,
        status: Some(401),
        details: json!({ "error": "Authorization header is invalid" }),
    };
    assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        error.to_body(),
        json!({
            "error": "Proxy request failed",
            "details": { "error": "Authorization header is invalid" }
        })
    );
}

#[test]
fn test_unexpected_response_body_carries_raw() {
    let error = ProxyError::UnexpectedResponse {
        context: "Unexpected image response",
        raw: json!({ "data": [] }),
    };
    assert_eq!(error.to_body(), json!({ "error": "Unexpected image response", "raw": { "data": [] } }));
}

#[test]
fn test_error_kinds() {
    assert_eq!(ProxyError::InvalidRequest(String::new()).kind(), "invalid_request");
    assert_eq!(
        ProxyError::Upstream { context: CHAT_FAILED, status: None, details: json!(null) }.kind(),
        "upstream_error"
    );
}
