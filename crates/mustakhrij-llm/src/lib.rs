//! LLM client for Mustakhrij
//!
//! One OpenAI-compatible chat-completion client covers every hosted
//! provider this system talks to; the provider is a configuration choice
//! (base URL + model defaults), never a separate pipeline.

#![warn(missing_docs)]

use async_trait::async_trait;
use mustakhrij_core::error::Result;
use serde::Deserialize;
use serde::Serialize;

mod chat;
pub use chat::ChatClient;

mod config;
pub use config::LLMConfig;
pub use config::LLMProvider;

mod session;
pub use session::ChatSession;

mod sse;
pub use sse::SseDecoder;
pub use sse::SseEvent;

/// Message role in a conversation
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System message (instructions)
    System,
    /// User message
    User,
    /// Assistant message
    Assistant,
}

/// A message in a conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message sender
    pub role: MessageRole,
    /// Content of the message
    pub content: String,
}

impl Message {
    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Completion parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionParams {
    /// Maximum tokens to generate
    pub max_tokens: Option<u32>,
    /// Temperature for sampling (0.0 to 2.0)
    pub temperature: Option<f32>,
    /// Top-p sampling
    pub top_p: Option<f32>,
    /// Stop sequences
    pub stop: Option<Vec<String>>,
}

impl Default for CompletionParams {
    fn default() -> Self {
        Self {
            max_tokens: Some(1000),
            temperature: Some(0.7),
            top_p: Some(1.0),
            stop: None,
        }
    }
}

/// Trait for chat-completion clients
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Complete a conversation and return the assistant's full reply
    async fn complete(&self, messages: &[Message], params: &CompletionParams) -> Result<String>;

    /// Complete a conversation, invoking `on_delta` for every streamed
    /// chunk as it arrives, and return the accumulated full reply
    async fn complete_streaming(
        &self,
        messages: &[Message],
        params: &CompletionParams,
        on_delta: &mut (dyn for<'a> FnMut(&'a str) + Send),
    ) -> Result<String>;

    /// Complete a conversation with the endpoint's JSON response mode
    /// enabled, returning the raw reply text (still subject to recovery
    /// and validation downstream)
    async fn complete_json(&self, messages: &[Message], params: &CompletionParams)
        -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_creation() {
        let system = Message::system("You are a helpful assistant");
        assert!(matches!(system.role, MessageRole::System));
        assert_eq!(system.content, "You are a helpful assistant");

        let user = Message::user("Hello");
        assert!(matches!(user.role, MessageRole::User));
        assert_eq!(user.content, "Hello");
    }

    #[test]
    fn test_role_serialization() {
        let json = serde_json::to_string(&MessageRole::Assistant).unwrap();
        assert_eq!(json, "\"assistant\"");
    }

    #[test]
    fn test_default_params() {
        let params = CompletionParams::default();
        assert_eq!(params.max_tokens, Some(1000));
        assert_eq!(params.temperature, Some(0.7));
        assert!(params.stop.is_none());
    }
}
