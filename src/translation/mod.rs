// Translation module - caller contract ↔ provider payloads
// Author: kelexine (https://github.com/kelexine)

pub mod request;
pub mod response;
pub mod streaming;

pub use request::{normalize_chat, normalize_image, normalize_stream, ChatPayload, ImagePayload};
pub use response::{normalize_binary_image, normalize_chat_response, normalize_openrouter_image};
