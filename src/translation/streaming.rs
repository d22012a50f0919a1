// OpenAI-compatible SSE → plain text deltas
// Author: kelexine (https://github.com/kelexine)

use crate::error::{ProxyError, Result};
use futures::stream::Stream;
use tracing::{debug, warn};

/// Turn an upstream SSE byte stream into the assistant text deltas it carries.
///
/// Raw bytes are buffered and only complete events are decoded, so a
/// multi-byte character split across network chunks survives intact.
pub fn text_deltas<S>(byte_stream: S) -> impl Stream<Item = Result<String>> + Send
where
    S: Stream<Item = reqwest::Result<bytes::Bytes>> + Send + 'static,
{
    use futures::StreamExt;

    async_stream::stream! {
        let mut buffer: Vec<u8> = Vec::new();

        futures::pin_mut!(byte_stream);

        while let Some(chunk_result) = byte_stream.next().await {
            match chunk_result {
                Ok(chunk) => {
                    // CR never occurs inside a UTF-8 sequence; dropping it folds CRLF framing
                    buffer.extend(chunk.iter().copied().filter(|&b| b != b'\r'));

                    // Process complete events (ends with \n\n)
                    while let Some(event_end) = find_event_end(&buffer) {
                        let event: Vec<u8> = buffer.drain(..event_end + 2).collect();
                        let event_data = String::from_utf8_lossy(&event[..event_end]);

                        if let Some(delta) = parse_delta(&event_data) {
                            yield Ok(delta);
                        }
                    }
                }
                Err(e) => {
                    warn!("Upstream stream error: {}", e);
                    yield Err(ProxyError::Http(e));
                    break;
                }
            }
        }

        // Final event without a trailing blank line
        let rest = String::from_utf8_lossy(&buffer);
        if !rest.trim().is_empty() {
            if let Some(delta) = parse_delta(&rest) {
                yield Ok(delta);
            }
        }

        debug!("Upstream SSE stream ended");
    }
}

fn find_event_end(buffer: &[u8]) -> Option<usize> {
    buffer.windows(2).position(|w| w == b"\n\n")
}

/// Extract `choices[0].delta.content` from one SSE event.
pub fn parse_delta(event_data: &str) -> Option<String> {
    let data = event_data
        .lines()
        .find_map(|line| line.strip_prefix("data:"))
        .map(str::trim)?;

    // Skip empty data or "[DONE]" marker
    if data.is_empty() || data == "[DONE]" {
        return None;
    }

    let parsed: serde_json::Value = match serde_json::from_str(data) {
        Ok(v) => v,
        Err(e) => {
            warn!("Failed to parse SSE JSON: {}", e);
            return None;
        }
    };

    parsed
        .get("choices")?
        .get(0)?
        .get("delta")?
        .get("content")?
        .as_str()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[test]
    fn test_parse_delta() {
        let event = "data: {\"choices\":[{\"delta\":{\"content\":\"Hel\"}}]}";
        assert_eq!(parse_delta(event).as_deref(), Some("Hel"));
    }

    #[test]
    fn test_parse_delta_skips_done_and_role_only() {
        assert!(parse_delta("data: [DONE]").is_none());
        assert!(parse_delta("data: {\"choices\":[{\"delta\":{\"role\":\"assistant\"}}]}").is_none());
        assert!(parse_delta(": keep-alive").is_none());
    }

    #[tokio::test]
    async fn test_deltas_across_chunk_boundaries() {
        let chunks: Vec<reqwest::Result<bytes::Bytes>> = vec![
            Ok(bytes::Bytes::from_static(b"data: {\"choices\":[{\"delta\":{\"content\":\"Hel")),
            Ok(bytes::Bytes::from_static(b"lo\"}}]}\n\ndata: {\"choices\":[{\"delta\":{\"content\":\" world\"}}]}\n\n")),
            Ok(bytes::Bytes::from_static(b"data: [DONE]\n\n")),
        ];
        let deltas: Vec<String> = text_deltas(futures::stream::iter(chunks))
            .map(|r| r.unwrap())
            .collect()
            .await;
        assert_eq!(deltas, vec!["Hello".to_string(), " world".to_string()]);
    }

    #[tokio::test]
    async fn test_multibyte_character_split_across_chunks() {
        let event = "data: {\"choices\":[{\"delta\":{\"content\":\"café\"}}]}\r\n\r\n".as_bytes();
        // Split inside the two-byte encoding of 'é'
        let split = event.iter().position(|&b| b == 0xC3).unwrap() + 1;
        let chunks: Vec<reqwest::Result<bytes::Bytes>> = vec![
            Ok(bytes::Bytes::copy_from_slice(&event[..split])),
            Ok(bytes::Bytes::copy_from_slice(&event[split..])),
        ];
        let deltas: Vec<String> = text_deltas(futures::stream::iter(chunks))
            .map(|r| r.unwrap())
            .collect()
            .await;
        assert_eq!(deltas, vec!["café".to_string()]);
    }
}
