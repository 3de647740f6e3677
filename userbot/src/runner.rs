use anyhow::{Context, Result};
use std::path::Path;
use tracing::{info, instrument};
use ubot_core::init_tracing;

use crate::components::{build_bot_components, build_handler_chain};
use crate::config::BotConfig;
use crate::telegram::run_repl;

/// Main entry: validate config, init logging, build components and chain, then run the REPL.
#[instrument(skip(config))]
pub async fn run_bot(config: BotConfig) -> Result<()> {
    config.validate()?;
    if let Some(dir) = Path::new(config.log_file()).parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
        }
    }
    init_tracing(config.log_file())?;

    info!(
        owner_user_id = config.owner_user_id(),
        model = %config.llm().model,
        render_interval_secs = config.base().render_interval_secs,
        "Initializing bot"
    );

    let components = build_bot_components(&config)?;
    let handler_chain = build_handler_chain(&config, &components);

    info!("Bot started successfully");

    run_repl(
        components.teloxide_bot.clone(),
        handler_chain,
        config.base().start_retries,
        config.start_retry_delay(),
    )
    .await
}
