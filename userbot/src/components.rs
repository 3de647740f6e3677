//! Component factory: builds the Telegram bot, clients, flows and handler chain from config.

use anyhow::Result;
use command_handlers::{AiAnswerFlow, AiImageFlow, CommandRouter, CryptoFlow};
use handler_chain::HandlerChain;
use image_generation_client::{ImageGenerationClient, ImageGenerator};
use llm_client::{LlmClient, OpenAILlmClient};
use price_client::{BinancePriceClient, PriceTicker};
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::{info, instrument};
use ubot_core::Transport;

use crate::config::BotConfig;
use crate::middleware::{LoggingMiddleware, OwnerMiddleware};
use crate::telegram::TelegramTransport;

/// Everything run_bot needs; produced by the component factory.
#[derive(Clone)]
pub struct BotComponents {
    pub teloxide_bot: Bot,
    pub transport: Arc<dyn Transport>,
    pub llm: Arc<dyn LlmClient>,
    pub images: Arc<dyn ImageGenerator>,
    pub prices: Arc<dyn PriceTicker>,
}

/// Builds the teloxide bot, honouring a custom Bot API server when configured.
pub fn build_teloxide_bot(config: &BotConfig) -> Result<Bot> {
    let bot = Bot::new(config.bot_token());
    match config.telegram_api_url() {
        Some(url_str) => {
            let url = reqwest::Url::parse(url_str)?;
            info!(url = %url, "Using custom Telegram API URL");
            Ok(bot.set_api_url(url))
        }
        None => Ok(bot),
    }
}

#[instrument(skip(config))]
pub fn build_bot_components(config: &BotConfig) -> Result<BotComponents> {
    let teloxide_bot = build_teloxide_bot(config)?;
    let transport: Arc<dyn Transport> = Arc::new(TelegramTransport::new(teloxide_bot.clone()));

    let llm_config = config.llm();
    let llm: Arc<dyn LlmClient> = Arc::new(OpenAILlmClient::from_config(llm_config));
    let images: Arc<dyn ImageGenerator> = Arc::new(
        ImageGenerationClient::with_base_url(
            llm_config.api_key.clone(),
            config.base().image_base_url.clone(),
        )?
        .with_model(llm_config.image_model.clone())
        .with_output_dir(llm_config.image_dir.clone()),
    );
    let prices: Arc<dyn PriceTicker> = Arc::new(BinancePriceClient::with_base_url(
        config.base().price_api_url.clone(),
    )?);

    info!(
        model = %llm_config.model,
        image_model = %llm_config.image_model,
        "Components built"
    );

    Ok(BotComponents {
        teloxide_bot,
        transport,
        llm,
        images,
        prices,
    })
}

/// Command router over the standard flows.
pub fn build_router(config: &BotConfig, components: &BotComponents) -> CommandRouter {
    let answer = Arc::new(AiAnswerFlow::new(
        components.transport.clone(),
        components.llm.clone(),
        config.llm().max_tokens,
        config.render_interval(),
    ));
    let image = Arc::new(AiImageFlow::new(answer.clone(), components.images.clone()));
    let crypto = Arc::new(CryptoFlow::new(
        components.transport.clone(),
        components.prices.clone(),
        config.base().signature.clone(),
    ));
    CommandRouter::with_default_routes(components.transport.clone(), answer, image, crypto)
}

/// Chain order: logging, owner check, command router.
pub fn build_handler_chain(config: &BotConfig, components: &BotComponents) -> HandlerChain {
    HandlerChain::new()
        .add_middleware(Arc::new(LoggingMiddleware))
        .add_middleware(Arc::new(OwnerMiddleware::new(config.owner_user_id())))
        .add_handler(Arc::new(build_router(config, components)))
}
