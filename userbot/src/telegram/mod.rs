//! Telegram framework layer: adapters, Transport implementation, REPL runner with start-up retry.

mod adapters;
mod runner;
mod transport;

pub use adapters::{TelegramMessageWrapper, TelegramUserWrapper};
pub use runner::{is_transient, run_repl, with_start_retry};
pub use transport::{map_request_error, to_entities, TelegramTransport, PLACEHOLDER_TEXT};
