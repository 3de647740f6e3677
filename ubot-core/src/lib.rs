//! # ubot-core
//!
//! Core types and traits for the userbot: [`Transport`], [`Handler`], [`Middleware`], message and
//! user types, formatting [`Span`]s with UTF-16 offset helpers, the error taxonomy and tracing
//! initialization. Transport-agnostic; used by handler-chain, stream-render, command-handlers and userbot.

pub mod error;
pub mod logger;
pub mod span;
pub mod transport;
pub mod types;

pub use error::{HandlerError, Result, UbotError};
pub use logger::init_tracing;
pub use span::{code_unit_index, code_unit_len, OffsetMap, Span, SpanKind};
pub use transport::{parse_message_id, EditOutcome, Transport};
pub use types::{
    Chat, Handler, HandlerResponse, Message, MessageDirection, MessageRef, Middleware,
    ToCoreMessage, ToCoreUser, User,
};
