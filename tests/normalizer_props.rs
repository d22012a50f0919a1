// Property tests for the request/response normalizers
// Author: kelexine (https://github.com/kelexine)

use proptest::prelude::*;
use provider_proxy::config::ProviderConfig;
use provider_proxy::models::{ChatMessage, ChatProvider, ChatRequest};
use provider_proxy::translation::request::{flatten_transcript, normalize_chat, ChatPayload};
use provider_proxy::translation::{normalize_binary_image, normalize_chat_response};
use serde_json::json;

fn provider() -> impl Strategy<Value = ChatProvider> {
    prop_oneof![
        Just(ChatProvider::HuggingFace),
        Just(ChatProvider::HfRouter),
        Just(ChatProvider::OpenRouter),
    ]
}

fn message() -> impl Strategy<Value = ChatMessage> {
    (any::<bool>(), "[a-zA-Z0-9 ?!.]{0,24}").prop_map(|(user, content)| {
        if user {
            ChatMessage::user(content)
        } else {
            ChatMessage::assistant(content)
        }
    })
}

proptest! {
    #[test]
    fn input_only_huggingface_payload_is_exact(input in "[a-zA-Z0-9][a-zA-Z0-9 ]{0,40}") {
        let req = ChatRequest::new(ChatProvider::HuggingFace).with_input(input.clone());
        let normalized = normalize_chat(&req, &ProviderConfig::default()).unwrap();
        prop_assert_eq!(serde_json::to_value(&normalized.payload).unwrap(), json!({ "inputs": input }));
    }

    #[test]
    fn chat_normalization_is_idempotent(
        provider in provider(),
        messages in proptest::collection::vec(message(), 1..8),
        input in proptest::option::of("[a-z]{1,12}"),
    ) {
        let mut req = ChatRequest::new(provider).with_messages(messages);
        req.input = input;
        let defaults = ProviderConfig::default();

        let first = serde_json::to_vec(&normalize_chat(&req, &defaults).unwrap().payload).unwrap();
        let second = serde_json::to_vec(&normalize_chat(&req, &defaults).unwrap().payload).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn flattening_has_one_line_per_turn(messages in proptest::collection::vec(message(), 1..8)) {
        let flattened = flatten_transcript(&messages, Some("next"));
        prop_assert_eq!(flattened.lines().count(), messages.len() + 1);
        prop_assert!(flattened.ends_with("\nUser: next"));
    }

    #[test]
    fn response_normalization_is_idempotent(text in "[a-zA-Z ]{1,30}", provider in provider()) {
        let raw = match provider {
            ChatProvider::HuggingFace => json!([{ "generated_text": text }]),
            _ => json!({ "choices": [{ "message": { "content": text } }] }),
        };
        let first = normalize_chat_response(provider, raw.clone());
        let second = normalize_chat_response(provider, raw);
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.text.as_deref(), Some(text.as_str()));
    }

    #[test]
    fn image_normalization_is_idempotent(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
        let first = normalize_binary_image(Some("image/webp"), &bytes);
        let second = normalize_binary_image(Some("image/webp"), &bytes);
        prop_assert_eq!(&first, &second);
        prop_assert!(first.data_uri.unwrap().starts_with("data:image/webp;base64,"));
    }
}

#[test]
fn flattened_payload_matches_reference_transcript() {
    let req = ChatRequest::new(ChatProvider::HuggingFace)
        .with_messages(vec![ChatMessage::user("A"), ChatMessage::assistant("B")])
        .with_input("C");
    let normalized = normalize_chat(&req, &ProviderConfig::default()).unwrap();
    assert_eq!(
        normalized.payload,
        ChatPayload::Inputs { inputs: "User: A\nAssistant: B\nUser: C".to_string() }
    );
}
