//! Chat completion provider access
//!
//! Speaks the OpenAI-compatible `/chat/completions` protocol used by Groq.

mod chat_client;

pub use chat_client::{ChatCompletionClient, ChatMessage, CompletionOptions};
