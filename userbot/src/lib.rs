//! # userbot
//!
//! Telegram application: loads config from env, wires Telegram transport, LLM, image and price
//! clients into the command router behind logging and owner-only middleware, and runs the REPL.

pub mod cli;
pub mod components;
pub mod config;
pub mod middleware;
pub mod runner;
pub mod telegram;

pub use cli::{load_config, Cli, Commands};
pub use components::{build_bot_components, build_handler_chain, build_router, BotComponents};
pub use config::{BaseConfig, BotConfig};
pub use middleware::{LoggingMiddleware, OwnerMiddleware};
pub use runner::run_bot;
pub use telegram::{run_repl, TelegramMessageWrapper, TelegramTransport, TelegramUserWrapper};
