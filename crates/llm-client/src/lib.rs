//! # LLM client abstraction
//!
//! Defines the [`LlmClient`] trait (the inference collaborator: one system prompt, one user prompt,
//! a max-token count, and a lazy sequence of text fragments back) and an OpenAI-compatible
//! implementation. Transport-agnostic; used by command-handlers.

use anyhow::Result;
use async_trait::async_trait;
use openai_client::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs,
};
use prompt::{ChatMessage, MessageRole};

mod config;
mod openai_llm;

pub use config::{EnvLlmConfig, LlmConfig};
pub use openai_client::ContentStream as FragmentStream;
pub use openai_llm::OpenAILlmClient;

/// Inference interface: a finite, non-restartable stream of answer fragments.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Opens a streamed completion. Errors here mean the stream never started; errors inside the
    /// stream mean it broke mid-flight.
    async fn chat_stream(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        max_tokens: u32,
    ) -> Result<FragmentStream>;

    /// Model id used for requests (e.g. `qwen/qwen3-coder-plus`).
    fn model(&self) -> &str;
}

/// Short display label of a model id: the part after the last `/`.
pub fn model_label(model: &str) -> &str {
    model.rsplit('/').next().unwrap_or(model)
}

/// Converts a single [`ChatMessage`] into OpenAI API message format.
fn chat_message_to_openai(msg: &ChatMessage) -> Result<ChatCompletionRequestMessage> {
    let content = msg.content.clone();
    let openai_msg: ChatCompletionRequestMessage = match msg.role {
        MessageRole::System => ChatCompletionRequestSystemMessageArgs::default()
            .content(content)
            .build()?
            .into(),
        MessageRole::User => ChatCompletionRequestUserMessageArgs::default()
            .content(content)
            .build()?
            .into(),
    };
    Ok(openai_msg)
}
