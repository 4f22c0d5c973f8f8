//! Chat-completion client for OpenAI-compatible endpoints

use async_trait::async_trait;
use futures::StreamExt;
use mustakhrij_core::error::Error;
use mustakhrij_core::error::Result;
use reqwest::Client;
use serde_json::json;
use serde_json::Value;
use tracing::debug;
use tracing::instrument;

use crate::sse::SseDecoder;
use crate::sse::SseEvent;
use crate::CompletionParams;
use crate::LLMClient;
use crate::LLMConfig;
use crate::Message;
use crate::MessageRole;

/// Chat-completion client. One instance per run; provider differences are
/// confined to [`LLMConfig`].
#[derive(Debug)]
pub struct ChatClient {
    client: Client,
    config: LLMConfig,
}

impl ChatClient {
    /// Create a new client from a validated configuration
    pub fn new(config: LLMConfig) -> Result<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::configuration(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// The configured model identifier
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Convert internal message format to the wire format
    fn convert_messages(&self, messages: &[Message]) -> Vec<Value> {
        messages
            .iter()
            .map(|msg| {
                let role = match msg.role {
                    MessageRole::System => "system",
                    MessageRole::User => "user",
                    MessageRole::Assistant => "assistant",
                };
                json!({
                    "role": role,
                    "content": msg.content
                })
            })
            .collect()
    }

    fn request_body(
        &self,
        messages: &[Message],
        params: &CompletionParams,
        json_mode: bool,
        stream: bool,
    ) -> Value {
        let mut body = json!({
            "model": self.config.model,
            "messages": self.convert_messages(messages),
            "stream": stream,
        });

        if let Some(max_tokens) = params.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }
        if let Some(temperature) = params.temperature {
            body["temperature"] = json!(temperature);
        }
        if let Some(top_p) = params.top_p {
            body["top_p"] = json!(top_p);
        }
        if let Some(stop) = &params.stop {
            body["stop"] = json!(stop);
        }
        if json_mode {
            body["response_format"] = json!({"type": "json_object"});
        }

        body
    }

    async fn send(&self, body: &Value) -> Result<reqwest::Response> {
        let url = format!("{}/chat/completions", self.config.base_url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| Error::network(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(Error::network(format!(
                "{} API error {}: {}",
                self.config.provider.name(),
                status,
                error_text
            )));
        }

        Ok(response)
    }

    async fn make_completion_request(
        &self,
        messages: &[Message],
        params: &CompletionParams,
        json_mode: bool,
    ) -> Result<String> {
        let body = self.request_body(messages, params, json_mode, false);
        let response = self.send(&body).await?;

        let response_json: Value = response
            .json()
            .await
            .map_err(|e| Error::network(format!("failed to parse response: {}", e)))?;

        let content = response_json
            .get("choices")
            .and_then(|choices| choices.get(0))
            .and_then(|choice| choice.get("message"))
            .and_then(|message| message.get("content"))
            .and_then(|content| content.as_str())
            .ok_or_else(|| Error::network("invalid response format".to_string()))?;

        Ok(content.to_string())
    }
}

#[async_trait]
impl LLMClient for ChatClient {
    #[instrument(skip(self, messages))]
    async fn complete(&self, messages: &[Message], params: &CompletionParams) -> Result<String> {
        debug!(model = %self.config.model, "making completion request");
        self.make_completion_request(messages, params, false).await
    }

    #[instrument(skip(self, messages, on_delta))]
    async fn complete_streaming(
        &self,
        messages: &[Message],
        params: &CompletionParams,
        on_delta: &mut (dyn for<'a> FnMut(&'a str) + Send),
    ) -> Result<String> {
        debug!(model = %self.config.model, "making streamed completion request");
        let body = self.request_body(messages, params, false, true);
        let response = self.send(&body).await?;

        let mut decoder = SseDecoder::new();
        let mut stream = response.bytes_stream();
        let mut full = String::new();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| Error::network(format!("stream failed: {}", e)))?;
            for event in decoder.feed(&chunk) {
                match event {
                    SseEvent::Delta(text) => {
                        full.push_str(&text);
                        on_delta(&text);
                    }
                    SseEvent::Done => return Ok(full),
                }
            }
        }

        Ok(full)
    }

    #[instrument(skip(self, messages))]
    async fn complete_json(
        &self,
        messages: &[Message],
        params: &CompletionParams,
    ) -> Result<String> {
        debug!(model = %self.config.model, "making JSON-mode completion request");
        self.make_completion_request(messages, params, true).await
    }
}
