//! Bot configuration: BaseConfig (Telegram, logging, rendering, prices) + EnvLlmConfig (model and images).

mod base;
mod bot_config;


pub use base::BaseConfig;
pub use bot_config::BotConfig;
