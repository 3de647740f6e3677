#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;
use stream_render::{RenderLayout, RenderedMessage, Renderer, SymbolAnnotator};
use tokio::time::Instant;
use ubot_core::{EditOutcome, Message, MessageRef, Result, Span, Transport, UbotError};

/// Scripted answer for one edit attempt; unscripted attempts succeed.
#[derive(Debug, Clone, Copy)]
pub enum Reply {
    Edited,
    Unchanged,
    RateLimited(Duration),
    Fail,
}

#[derive(Default)]
pub struct RecordingTransport {
    script: Mutex<VecDeque<Reply>>,
    attempts: Mutex<Vec<(Instant, RenderedMessage)>>,
}

impl RecordingTransport {
    pub fn scripted(replies: impl IntoIterator<Item = Reply>) -> Self {
        Self {
            script: Mutex::new(replies.into_iter().collect()),
            ..Default::default()
        }
    }

    pub fn attempts(&self) -> Vec<(Instant, RenderedMessage)> {
        self.attempts.lock().unwrap().clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.attempts().into_iter().map(|(_, m)| m.text).collect()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn reply_target(&self, message: &Message) -> Result<MessageRef> {
        Ok(message.to_ref())
    }

    async fn edit_text(&self, _target: &MessageRef, text: &str, spans: &[Span]) -> Result<EditOutcome> {
        self.attempts
            .lock()
            .unwrap()
            .push((Instant::now(), RenderedMessage::new(text, spans.to_vec())));
        let reply = self.script.lock().unwrap().pop_front().unwrap_or(Reply::Edited);
        match reply {
            Reply::Edited => Ok(EditOutcome::Edited),
            Reply::Unchanged => Ok(EditOutcome::Unchanged),
            Reply::RateLimited(wait) => Err(UbotError::RateLimited(wait)),
            Reply::Fail => Err(UbotError::Bot("message to edit not found".to_string())),
        }
    }

    async fn edit_media(&self, _: &MessageRef, _: &Path, _: &str, _: &[Span]) -> Result<()> {
        Ok(())
    }

    async fn send_photo(&self, chat_id: i64, _: &Path, _: &str, _: &[Span]) -> Result<MessageRef> {
        Ok(MessageRef {
            chat_id,
            message_id: "2".to_string(),
        })
    }

    async fn delete_message(&self, _: &MessageRef) -> Result<()> {
        Ok(())
    }
}

pub const PARTIAL: &str = "🤖 Генерирую Ответ...";
pub const FINAL: &str = "🤖 Ответ Сгенерирован Моделью test";

pub fn renderer() -> Renderer {
    Renderer::new(
        RenderLayout::new(PARTIAL, FINAL),
        SymbolAnnotator::new()
            .with_symbol("✨", 1)
            .with_bold_keyword("Тема:"),
    )
}

pub fn target() -> MessageRef {
    MessageRef {
        chat_id: 42,
        message_id: "7".to_string(),
    }
}
