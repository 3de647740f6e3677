//! Messaging transport contract.
//!
//! [`Transport`] is transport-agnostic; the Telegram implementation lives in the `userbot` crate and
//! tests substitute recording mocks.

use crate::error::{Result, UbotError};
use crate::span::Span;
use crate::types::{Message, MessageRef};
use async_trait::async_trait;
use std::path::Path;

/// Successful result of a text edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    Edited,
    /// The transport reported the new content equals the current one.
    Unchanged,
}

/// Send / edit primitives the command flows need.
///
/// Rate limiting is reported as [`UbotError::RateLimited`] carrying the advised wait.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Returns the message a command answer is written into.
    ///
    /// Userbot-style transports return the triggering message itself; transports that cannot edit
    /// other people's messages post a placeholder reply and return that.
    async fn reply_target(&self, message: &Message) -> Result<MessageRef>;

    /// Replaces the text and formatting spans of a message.
    async fn edit_text(&self, target: &MessageRef, text: &str, spans: &[Span])
        -> Result<EditOutcome>;

    /// Replaces the media of a message with a local photo and caption.
    async fn edit_media(
        &self,
        target: &MessageRef,
        photo: &Path,
        caption: &str,
        caption_spans: &[Span],
    ) -> Result<()>;

    /// Sends a new photo into the target's chat; returns the new message.
    async fn send_photo(
        &self,
        chat_id: i64,
        photo: &Path,
        caption: &str,
        caption_spans: &[Span],
    ) -> Result<MessageRef>;

    async fn delete_message(&self, target: &MessageRef) -> Result<()>;
}

/// Parses a message id string into an i32 (Telegram message ids).
pub fn parse_message_id(s: &str) -> Result<i32> {
    s.parse()
        .map_err(|_| UbotError::Bot(format!("Invalid message_id: {}", s)))
}
