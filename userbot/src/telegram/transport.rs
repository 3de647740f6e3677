//! Wraps teloxide::Bot and implements [`ubot_core::Transport`]. Spans become Telegram message
//! entities; flood-wait and "message is not modified" are mapped to their core counterparts.

use async_trait::async_trait;
use std::path::Path;
use teloxide::prelude::*;
use teloxide::types::{
    ChatId, CustomEmojiId, InputFile, InputMedia, InputMediaPhoto, MessageEntity,
    MessageEntityKind, MessageId, ReplyParameters,
};
use teloxide::{ApiError, RequestError};
use tracing::debug;
use ubot_core::{
    parse_message_id, EditOutcome, Message, MessageRef, Result, Span, SpanKind, Transport,
    UbotError,
};

/// Text of the reply a command answer is written into before the first render.
pub const PLACEHOLDER_TEXT: &str = "⏳";

pub struct TelegramTransport {
    bot: teloxide::Bot,
}

impl TelegramTransport {
    pub fn new(bot: teloxide::Bot) -> Self {
        Self { bot }
    }
}

/// Maps teloxide failures onto the core error taxonomy.
pub fn map_request_error(e: RequestError) -> UbotError {
    match e {
        RequestError::RetryAfter(secs) => UbotError::RateLimited(secs.duration()),
        other => UbotError::Bot(other.to_string()),
    }
}

/// Converts rendered spans into Telegram entities (offsets are already UTF-16).
pub fn to_entities(spans: &[Span]) -> Vec<MessageEntity> {
    spans
        .iter()
        .map(|span| {
            let kind = match &span.kind {
                SpanKind::Bold => MessageEntityKind::Bold,
                SpanKind::CodeBlock { language } => MessageEntityKind::Pre {
                    language: language.clone(),
                },
                SpanKind::CustomSymbol { id } => MessageEntityKind::CustomEmoji {
                    custom_emoji_id: CustomEmojiId(id.to_string()),
                },
            };
            MessageEntity::new(kind, span.offset, span.length)
        })
        .collect()
}

fn address(target: &MessageRef) -> Result<(ChatId, MessageId)> {
    let id = parse_message_id(&target.message_id)?;
    Ok((ChatId(target.chat_id), MessageId(id)))
}

#[async_trait]
impl Transport for TelegramTransport {
    async fn reply_target(&self, message: &Message) -> Result<MessageRef> {
        let origin = parse_message_id(&message.id)?;
        let sent = self
            .bot
            .send_message(ChatId(message.chat.id), PLACEHOLDER_TEXT)
            .reply_parameters(ReplyParameters::new(MessageId(origin)))
            .await
            .map_err(map_request_error)?;
        debug!(chat_id = message.chat.id, reply_id = %sent.id, "placeholder reply sent");
        Ok(MessageRef {
            chat_id: message.chat.id,
            message_id: sent.id.to_string(),
        })
    }

    async fn edit_text(
        &self,
        target: &MessageRef,
        text: &str,
        spans: &[Span],
    ) -> Result<EditOutcome> {
        let (chat_id, message_id) = address(target)?;
        match self
            .bot
            .edit_message_text(chat_id, message_id, text)
            .entities(to_entities(spans))
            .await
        {
            Ok(_) => Ok(EditOutcome::Edited),
            Err(RequestError::Api(ApiError::MessageNotModified)) => Ok(EditOutcome::Unchanged),
            Err(e) => Err(map_request_error(e)),
        }
    }

    async fn edit_media(
        &self,
        target: &MessageRef,
        photo: &Path,
        caption: &str,
        caption_spans: &[Span],
    ) -> Result<()> {
        let (chat_id, message_id) = address(target)?;
        let media = InputMediaPhoto::new(InputFile::file(photo.to_path_buf()))
            .caption(caption)
            .caption_entities(to_entities(caption_spans));
        self.bot
            .edit_message_media(chat_id, message_id, InputMedia::Photo(media))
            .await
            .map_err(map_request_error)?;
        Ok(())
    }

    async fn send_photo(
        &self,
        chat_id: i64,
        photo: &Path,
        caption: &str,
        caption_spans: &[Span],
    ) -> Result<MessageRef> {
        let sent = self
            .bot
            .send_photo(ChatId(chat_id), InputFile::file(photo.to_path_buf()))
            .caption(caption)
            .caption_entities(to_entities(caption_spans))
            .await
            .map_err(map_request_error)?;
        Ok(MessageRef {
            chat_id,
            message_id: sent.id.to_string(),
        })
    }

    async fn delete_message(&self, target: &MessageRef) -> Result<()> {
        let (chat_id, message_id) = address(target)?;
        self.bot
            .delete_message(chat_id, message_id)
            .await
            .map_err(map_request_error)?;
        Ok(())
    }
}
