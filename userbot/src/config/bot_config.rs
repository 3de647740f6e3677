//! BotConfig: BaseConfig + EnvLlmConfig. Built once at start-up and passed down by reference.

use anyhow::Result;
use llm_client::EnvLlmConfig;
use std::time::Duration;

use super::BaseConfig;

pub struct BotConfig {
    pub base: BaseConfig,
    pub llm: EnvLlmConfig,
}

impl BotConfig {
    /// Load full config from environment variables. If `token` is provided it overrides BOT_TOKEN.
    /// Call validate() after load to check config before init.
    pub fn load(token: Option<String>) -> Result<Self> {
        let base = BaseConfig::load(token)?;
        let llm = EnvLlmConfig::from_env()?;
        Ok(Self { base, llm })
    }

    pub fn validate(&self) -> Result<()> {
        self.base.validate()?;
        if reqwest::Url::parse(&self.llm.base_url).is_err() {
            anyhow::bail!("LLM_BASE_URL is not a valid URL: {}", self.llm.base_url);
        }
        Ok(())
    }

    pub fn base(&self) -> &BaseConfig {
        &self.base
    }
    pub fn llm(&self) -> &EnvLlmConfig {
        &self.llm
    }

    pub fn bot_token(&self) -> &str {
        &self.base.bot_token
    }
    pub fn telegram_api_url(&self) -> Option<&str> {
        self.base.telegram_api_url.as_deref()
    }
    pub fn owner_user_id(&self) -> i64 {
        self.base.owner_user_id
    }
    pub fn log_file(&self) -> &str {
        &self.base.log_file
    }
    pub fn render_interval(&self) -> Duration {
        Duration::from_secs(self.base.render_interval_secs)
    }
    pub fn start_retry_delay(&self) -> Duration {
        Duration::from_secs(self.base.start_retry_delay_secs)
    }
}
