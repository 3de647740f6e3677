//! # OpenAI API client
//!
//! Thin wrapper around [async-openai] for streamed chat completion against OpenAI-compatible
//! endpoints (OpenAI, OpenRouter, local proxies). Provides token masking for safe logging.

use async_openai::{config::OpenAIConfig, types::CreateChatCompletionRequestArgs, Client};
use futures::{Stream, StreamExt};
use std::pin::Pin;
use std::sync::Arc;
use tracing;

pub use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs,
};

/// Text fragments of one streamed completion, in arrival order.
///
/// Ends when the upstream finishes; an `Err` item reports an upstream failure mid-stream.
pub type ContentStream = Pin<Box<dyn Stream<Item = anyhow::Result<String>> + Send>>;

/// Masks an API key/token for safe logging: shows first 7 chars + "***" + last 4 chars.
/// If length <= 11, returns "***" to avoid leaking any part of the key.
pub fn mask_token(token: &str) -> String {
    let len = token.len();
    if len <= 11 || !token.is_char_boundary(7) || !token.is_char_boundary(len - 4) {
        "***".to_string()
    } else {
        format!("{}***{}", &token[..7], &token[len - 4..])
    }
}

/// OpenAI chat client. Wraps async-openai client; holds API key only for masked logging.
#[derive(Clone)]
pub struct OpenAIClient {
    client: Arc<Client<OpenAIConfig>>,
    api_key_for_logging: String,
}

impl OpenAIClient {
    /// Builds a client with a custom base URL (e.g. OpenRouter or a compatible proxy).
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        let config = OpenAIConfig::new()
            .with_api_key(api_key.clone())
            .with_api_base(base_url);
        Self {
            client: Arc::new(Client::with_config(config)),
            api_key_for_logging: api_key,
        }
    }

    fn masked_key(&self) -> String {
        mask_token(&self.api_key_for_logging)
    }

    /// Opens a streamed chat completion and returns its content fragments.
    ///
    /// Chunks without content (role announcements, finish markers) are skipped. Usage is logged
    /// when the upstream reports it. The stream is not restartable.
    #[allow(deprecated)]
    pub async fn chat_completion_stream(
        &self,
        model: &str,
        messages: Vec<ChatCompletionRequestMessage>,
        max_tokens: u32,
    ) -> anyhow::Result<ContentStream> {
        tracing::info!(
            model = %model,
            message_count = messages.len(),
            max_tokens = max_tokens,
            api_key = %self.masked_key(),
            "OpenAI chat_completion_stream request"
        );

        let request = CreateChatCompletionRequestArgs::default()
            .model(model)
            .messages(messages)
            .max_tokens(max_tokens)
            .stream(true)
            .build()?;

        if let Ok(json) = serde_json::to_string(&request) {
            tracing::debug!(request_json = %json, "OpenAI chat_completion_stream request JSON");
        }

        let stream = self.client.chat().create_stream(request).await?;

        let fragments = stream.filter_map(|result| {
            let item = match result {
                Ok(chunk) => {
                    if let Some(ref u) = chunk.usage {
                        tracing::info!(
                            prompt_tokens = u.prompt_tokens,
                            completion_tokens = u.completion_tokens,
                            total_tokens = u.total_tokens,
                            "OpenAI chat_completion_stream usage"
                        );
                    }
                    chunk
                        .choices
                        .into_iter()
                        .next()
                        .and_then(|choice| choice.delta.content)
                        .filter(|content| !content.is_empty())
                        .map(Ok)
                }
                Err(e) => Some(Err(anyhow::anyhow!("Stream error: {}", e))),
            };
            futures::future::ready(item)
        });

        Ok(Box::pin(fragments))
    }
}
