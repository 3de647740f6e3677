//! LLM configuration: trait and env-based implementation.

use anyhow::{Context, Result};
use std::env;

/// LLM configuration interface for OpenAI-compatible APIs.
pub trait LlmConfig: Send + Sync {
    fn api_key(&self) -> &str;
    fn base_url(&self) -> &str;
    fn model(&self) -> &str;
    fn max_tokens(&self) -> u32;
    fn image_model(&self) -> &str;
    fn image_dir(&self) -> &str;
}

/// LLM config loaded from environment variables.
#[derive(Debug, Clone)]
pub struct EnvLlmConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub image_model: String,
    pub image_dir: String,
}

impl LlmConfig for EnvLlmConfig {
    fn api_key(&self) -> &str {
        &self.api_key
    }
    fn base_url(&self) -> &str {
        &self.base_url
    }
    fn model(&self) -> &str {
        &self.model
    }
    fn max_tokens(&self) -> u32 {
        self.max_tokens
    }
    fn image_model(&self) -> &str {
        &self.image_model
    }
    fn image_dir(&self) -> &str {
        &self.image_dir
    }
}

impl EnvLlmConfig {
    /// Load from environment variables. OPENROUTER_API_KEY wins over OPENAI_API_KEY.
    pub fn from_env() -> Result<Self> {
        let api_key = env::var("OPENROUTER_API_KEY")
            .or_else(|_| env::var("OPENAI_API_KEY"))
            .context("OPENROUTER_API_KEY (or OPENAI_API_KEY) not set")?;
        let base_url = env::var("LLM_BASE_URL")
            .unwrap_or_else(|_| "https://openrouter.ai/api/v1".to_string());
        let model = env::var("LLM_MODEL").unwrap_or_else(|_| "qwen/qwen3-coder-plus".to_string());
        let max_tokens = match env::var("LLM_MAX_TOKENS") {
            Ok(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("LLM_MAX_TOKENS is not a number: {}", raw))?,
            Err(_) => 2048,
        };
        let image_model = env::var("IMAGE_MODEL").unwrap_or_else(|_| "dall-e-3".to_string());
        let image_dir = env::var("IMAGE_DIR").unwrap_or_else(|_| "./data/images".to_string());
        Ok(Self {
            api_key,
            base_url,
            model,
            max_tokens,
            image_model,
            image_dir,
        })
    }
}
