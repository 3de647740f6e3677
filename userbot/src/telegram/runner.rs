//! REPL runner: converts teloxide messages to core::Message and passes them to HandlerChain.
//! Start-up (get_me) is retried while Telegram is unreachable.

use anyhow::Result;
use handler_chain::HandlerChain;
use std::future::Future;
use std::time::Duration;
use teloxide::prelude::*;
use teloxide::RequestError;
use tracing::{error, info, instrument, warn};
use ubot_core::ToCoreMessage;

use super::adapters::TelegramMessageWrapper;

/// Connectivity failures worth another start-up attempt.
pub fn is_transient(e: &RequestError) -> bool {
    matches!(
        e,
        RequestError::Network(_) | RequestError::Io(_) | RequestError::RetryAfter(_)
    )
}

/// Runs `op` up to `attempts` times, sleeping `delay` (or the advised flood wait, if longer)
/// between transient failures. Any other failure aborts at once.
pub async fn with_start_retry<T, F, Fut>(attempts: u32, delay: Duration, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<T, RequestError>>,
{
    let attempts = attempts.max(1);
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if is_transient(&e) && attempt < attempts => {
                let wait = match &e {
                    RequestError::RetryAfter(secs) => secs.duration().max(delay),
                    _ => delay,
                };
                warn!(
                    error = %e,
                    wait_secs = wait.as_secs(),
                    "session-locked retry={}/{}",
                    attempt,
                    attempts
                );
                tokio::time::sleep(wait).await;
                attempt += 1;
            }
            Err(e) if is_transient(&e) => {
                error!(error = %e, attempts, "start-up retries exhausted");
                anyhow::bail!("Telegram unreachable after {} attempts: {}", attempts, e);
            }
            Err(e) => return Err(e.into()),
        }
    }
}

/// Starts the REPL. Each message is converted to core::Message and passed to chain.handle in
/// its own task, so a long answer never blocks the next command.
#[instrument(skip(bot, handler_chain))]
pub async fn run_repl(
    bot: teloxide::Bot,
    handler_chain: HandlerChain,
    start_retries: u32,
    start_retry_delay: Duration,
) -> Result<()> {
    let me = with_start_retry(start_retries, start_retry_delay, || bot.get_me().send()).await?;
    info!(
        bot_id = me.user.id.0,
        username = ?me.user.username,
        "connected to Telegram"
    );

    let chain = handler_chain;
    teloxide::repl(bot, move |_bot: Bot, msg: teloxide::types::Message| {
        let chain = chain.clone();

        async move {
            let core_msg = TelegramMessageWrapper(&msg).to_core();
            if core_msg.content.is_empty() {
                return Ok(());
            }

            tokio::spawn(async move {
                info!(
                    user_id = core_msg.user.id,
                    chat_id = core_msg.chat.id,
                    message_id = %core_msg.id,
                    "step: processing message (handler chain started)"
                );
                if let Err(e) = chain.handle(&core_msg).await {
                    error!(error = %e, user_id = core_msg.user.id, "Handler chain failed");
                }
            });

            Ok(())
        }
    })
    .await;

    Ok(())
}
