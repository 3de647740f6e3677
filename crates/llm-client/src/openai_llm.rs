//! OpenAI-compatible LlmClient: wraps openai-client and builds the `[system, user]` request.

use anyhow::Result;
use async_trait::async_trait;
use tracing::instrument;

use super::{chat_message_to_openai, FragmentStream, LlmClient, LlmConfig};

/// LlmClient backed by openai-client; works with any OpenAI-compatible endpoint.
#[derive(Clone)]
pub struct OpenAILlmClient {
    client: openai_client::OpenAIClient,
    model: String,
}

impl OpenAILlmClient {
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            client: openai_client::OpenAIClient::with_base_url(api_key, base_url),
            model: "gpt-4o-mini".to_string(),
        }
    }

    /// Builds a client from config (API key, base URL, model).
    pub fn from_config(config: &dyn LlmConfig) -> Self {
        Self::with_base_url(config.api_key().to_string(), config.base_url().to_string())
            .with_model(config.model().to_string())
    }

    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }
}

#[async_trait]
impl LlmClient for OpenAILlmClient {
    #[instrument(skip(self, system_prompt, user_prompt))]
    async fn chat_stream(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        max_tokens: u32,
    ) -> Result<FragmentStream> {
        let messages = prompt::build_messages(system_prompt, user_prompt)
            .iter()
            .map(chat_message_to_openai)
            .collect::<Result<Vec<_>>>()?;
        self.client
            .chat_completion_stream(&self.model, messages, max_tokens)
            .await
    }

    fn model(&self) -> &str {
        &self.model
    }
}
