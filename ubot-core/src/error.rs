//! Error types for the userbot core.
//!
//! [`UbotError`] is the top-level error; [`HandlerError`] covers command handling failures.

use std::time::Duration;
use thiserror::Error;

/// Top-level error: transport failure, rate limit or a command handling failure.
#[derive(Error, Debug)]
pub enum UbotError {
    #[error("Bot error: {0}")]
    Bot(String),

    /// Transport asked us to slow down; carries the advised wait.
    #[error("Rate limited, retry after {0:?}")]
    RateLimited(Duration),

    #[error("Handler error: {0}")]
    Handler(#[from] HandlerError),
}

/// Errors produced while handling a command.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HandlerError {
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Price unavailable for {0}")]
    PriceUnavailable(String),

    #[error("Image generation failed after {0} attempts")]
    ImageGenerationFailed(usize),
}

/// Result type for core operations; uses [`UbotError`].
pub type Result<T> = std::result::Result<T, UbotError>;
