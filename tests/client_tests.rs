// Caller-side transport tests
// Author: kelexine (https://github.com/kelexine)

use mockito::Matcher;
use provider_proxy::client::{ChatTransport, DirectTransport, FallbackChat, ProxyTransport, ReplySource};
use provider_proxy::config::{AppConfig, ProviderConfig, UpstreamConfig};
use provider_proxy::error::ProxyError;
use provider_proxy::models::{ChatProvider, ChatRequest};
use provider_proxy::proxy::ProviderProxy;
use serde_json::json;
use std::sync::Arc;

#[tokio::test]
async fn test_proxy_transport_reads_text() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/chat")
        .match_body(Matcher::PartialJson(json!({ "provider": "openrouter", "input": "hi" })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"text":"hello back","raw":{}}"#)
        .create_async()
        .await;

    let transport = ProxyTransport::new(&format!("{}/", server.url())).unwrap();
    let resp = transport
        .send(&ChatRequest::new(ChatProvider::OpenRouter).with_input("hi"))
        .await
        .unwrap();

    assert_eq!(resp.text.as_deref(), Some("hello back"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_proxy_transport_surfaces_error_body() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api/chat")
        .with_status(400)
        .with_body(r#"{"error":"OpenRouter credential (OPENROUTER_KEY) not configured on server."}"#)
        .create_async()
        .await;

    let transport = ProxyTransport::new(&server.url()).unwrap();
    let err = transport
        .send(&ChatRequest::new(ChatProvider::OpenRouter).with_input("hi"))
        .await
        .unwrap_err();

    match err {
        ProxyError::Upstream { status, details, .. } => {
            assert_eq!(status, Some(400));
            assert!(details["error"].as_str().unwrap().contains("OPENROUTER_KEY"));
        }
        other => panic!("Expected Upstream error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_falls_back_to_direct_provider_call() {
    let mut proxy_server = mockito::Server::new_async().await;
    proxy_server
        .mock("POST", "/api/chat")
        .with_status(500)
        .with_body(r#"{"error":"Proxy request failed","details":"upstream down"}"#)
        .create_async()
        .await;

    let mut provider_server = mockito::Server::new_async().await;
    let direct_mock = provider_server
        .mock("POST", "/models/facebook/blenderbot-400M-distill")
        .match_header("authorization", "Bearer hf_client_held")
        .match_body(Matcher::Json(json!({ "inputs": "What is a firewall?" })))
        .with_status(200)
        .with_body(r#"[{"generated_text":"A network filter."}]"#)
        .expect(1)
        .create_async()
        .await;

    let direct_config = AppConfig {
        providers: ProviderConfig {
            hf_api_key: Some("hf_client_held".to_string()),
            ..Default::default()
        },
        upstream: UpstreamConfig::with_base_url(&provider_server.url()),
        ..Default::default()
    };
    let direct = DirectTransport::new(ProviderProxy::new(Arc::new(direct_config)).unwrap());

    let mut chat = FallbackChat::new(Box::new(ProxyTransport::new(&proxy_server.url()).unwrap()), ChatProvider::HuggingFace)
        .with_fallback(Box::new(direct));

    let reply = chat.send("What is a firewall?").await;

    assert_eq!(reply.text, "A network filter.");
    assert_eq!(reply.source, ReplySource::Fallback);
    assert_eq!(reply.notices.len(), 1);
    assert!(reply.notices[0].contains("Proxy request failed"));
    assert_eq!(chat.conversation().len(), 2);
    direct_mock.assert_async().await;
}
