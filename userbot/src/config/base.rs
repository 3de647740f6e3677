//! Base config: Telegram connection, owner, logging, render pacing and price source. Loaded from env.

use anyhow::{Context, Result};
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct BaseConfig {
    /// BOT_TOKEN
    pub bot_token: String,
    /// TELEGRAM_API_URL or TELOXIDE_API_URL
    pub telegram_api_url: Option<String>,
    /// OWNER_USER_ID: the only account whose commands are served
    pub owner_user_id: i64,
    pub log_file: String,
    /// Seconds between partial renders of a streamed answer
    pub render_interval_secs: u64,
    /// Start-up attempts while Telegram is unreachable
    pub start_retries: u32,
    pub start_retry_delay_secs: u64,
    /// PRICE_API_URL, Binance-compatible
    pub price_api_url: String,
    /// IMAGE_BASE_URL, OpenAI-compatible images endpoint
    pub image_base_url: String,
    /// SIGNATURE shown under conversion replies
    pub signature: String,
}

fn parse_or<T: FromStr>(name: &str, default: T) -> Result<T> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("{} is not a valid number: {}", name, raw)),
        Err(_) => Ok(default),
    }
}

impl BaseConfig {
    /// Load from environment variables. `token` overrides BOT_TOKEN if provided.
    pub fn load(token: Option<String>) -> Result<Self> {
        let bot_token = match token {
            Some(token) => token,
            None => env::var("BOT_TOKEN").context("BOT_TOKEN not set")?,
        };
        let owner_raw = env::var("OWNER_USER_ID").context("OWNER_USER_ID not set")?;
        let owner_user_id = owner_raw
            .trim()
            .parse()
            .with_context(|| format!("OWNER_USER_ID is not a user id: {}", owner_raw))?;
        let telegram_api_url = env::var("TELEGRAM_API_URL")
            .or_else(|_| env::var("TELOXIDE_API_URL"))
            .ok();
        let log_file = env::var("LOG_FILE").unwrap_or_else(|_| "logs/ubot.log".to_string());
        let price_api_url =
            env::var("PRICE_API_URL").unwrap_or_else(|_| "https://api.binance.com".to_string());
        let image_base_url = env::var("IMAGE_BASE_URL")
            .unwrap_or_else(|_| "https://api.openai.com/v1".to_string());
        let signature = env::var("SIGNATURE").unwrap_or_else(|_| "Th3ryks".to_string());

        Ok(Self {
            bot_token,
            telegram_api_url,
            owner_user_id,
            log_file,
            render_interval_secs: parse_or("RENDER_INTERVAL_SECS", 3)?,
            start_retries: parse_or("START_RETRIES", 6)?,
            start_retry_delay_secs: parse_or("START_RETRY_DELAY_SECS", 5)?,
            price_api_url,
            image_base_url,
            signature,
        })
    }

    /// Fail fast on malformed URLs and a zero render interval.
    pub fn validate(&self) -> Result<()> {
        if let Some(ref url_str) = self.telegram_api_url {
            if reqwest::Url::parse(url_str).is_err() {
                anyhow::bail!(
                    "TELEGRAM_API_URL (or TELOXIDE_API_URL) is set but not a valid URL: {}",
                    url_str
                );
            }
        }
        for (name, url) in [
            ("PRICE_API_URL", &self.price_api_url),
            ("IMAGE_BASE_URL", &self.image_base_url),
        ] {
            if reqwest::Url::parse(url).is_err() {
                anyhow::bail!("{} is not a valid URL: {}", name, url);
            }
        }
        if self.render_interval_secs == 0 {
            anyhow::bail!("RENDER_INTERVAL_SECS must be at least 1");
        }
        if self.start_retries == 0 {
            anyhow::bail!("START_RETRIES must be at least 1");
        }
        Ok(())
    }
}
