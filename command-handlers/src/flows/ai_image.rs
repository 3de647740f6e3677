//! `.aigen`: a titled answer, then an illustration of its topic.

use super::{AiAnswerFlow, Flow};
use crate::router::Command;
use async_trait::async_trait;
use image_generation_client::ImageGenerator;
use prompt::{image_prompt, TITLED_ANSWER_SYSTEM_PROMPT};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use stream_render::{RenderedMessage, SafeEditSink, MAX_CAPTION_LEN, MAX_MESSAGE_LEN};
use tracing::{debug, error, info, warn};
use ubot_core::{code_unit_len, HandlerError, MessageRef, Result};

/// Waits before the first, second and third retry.
pub const IMAGE_RETRY_DELAYS: [Duration; 3] = [
    Duration::from_secs(2),
    Duration::from_secs(5),
    Duration::from_secs(8),
];

pub const IMAGE_FAILED_NOTICE: &str = "⚠️ Не удалось сгенерировать изображение";

pub struct AiImageFlow {
    answer: Arc<AiAnswerFlow>,
    images: Arc<dyn ImageGenerator>,
}

impl AiImageFlow {
    pub fn new(answer: Arc<AiAnswerFlow>, images: Arc<dyn ImageGenerator>) -> Self {
        Self { answer, images }
    }

    /// One attempt plus a retry after each of [`IMAGE_RETRY_DELAYS`].
    async fn generate(&self, prompt: &str) -> std::result::Result<PathBuf, HandlerError> {
        let waits = std::iter::once(None).chain(IMAGE_RETRY_DELAYS.iter().copied().map(Some));
        let mut attempts = 0;
        for wait in waits {
            if let Some(wait) = wait {
                tokio::time::sleep(wait).await;
            }
            attempts += 1;
            match self.images.generate_image(prompt).await {
                Ok(path) => {
                    info!(attempt = attempts, path = %path.display(), "Image generated");
                    return Ok(path);
                }
                Err(e) => warn!(attempt = attempts, error = %e, "Image generation attempt failed"),
            }
        }
        Err(HandlerError::ImageGenerationFailed(attempts))
    }

    /// Put the photo into the target, or replace the target with a new photo message.
    async fn deliver(&self, target: &MessageRef, photo: &Path, caption: &RenderedMessage) {
        let transport = self.answer.transport();
        let Err(e) = transport
            .edit_media(target, photo, &caption.text, &caption.spans)
            .await
        else {
            info!(message_id = %target.message_id, "step: photo attached");
            return;
        };

        warn!(error = %e, "Media edit failed, resending as a new photo");
        if let Err(e) = transport.delete_message(target).await {
            warn!(error = %e, "Failed to delete answer message");
        }
        match transport
            .send_photo(target.chat_id, photo, &caption.text, &caption.spans)
            .await
        {
            Ok(sent) => info!(message_id = %sent.message_id, "step: photo sent"),
            Err(e) => error!(error = %e, "Failed to send photo"),
        }
    }
}

/// `message` with the failure notice appended, still within the message limit.
fn with_failure_notice(message: RenderedMessage) -> RenderedMessage {
    let suffix = format!("\n\n{IMAGE_FAILED_NOTICE}");
    let mut message = message.truncated(MAX_MESSAGE_LEN - code_unit_len(&suffix));
    message.text.push_str(&suffix);
    message
}

#[async_trait]
impl Flow for AiImageFlow {
    async fn run(&self, target: &MessageRef, command: Command) -> Result<()> {
        let query = match command {
            Command::Imagine { query } => query,
            other => return Err(HandlerError::InvalidCommand(format!("{other:?}")).into()),
        };
        let sink = SafeEditSink::new(self.answer.transport().clone(), target.clone());
        let Some(outcome) = self
            .answer
            .stream_answer(&sink, TITLED_ANSWER_SYSTEM_PROMPT, &query)
            .await
        else {
            return Ok(());
        };

        let prompt = image_prompt(outcome.topic.as_deref(), &query);
        debug!(prompt = %prompt, "step: generating image");
        match self.generate(&prompt).await {
            Ok(photo) => {
                let caption = outcome.final_message.truncated(MAX_CAPTION_LEN);
                self.deliver(target, &photo, &caption).await;
                if let Err(e) = tokio::fs::remove_file(&photo).await {
                    debug!(error = %e, path = %photo.display(), "Failed to remove image file");
                }
            }
            Err(e) => {
                warn!(error = %e, "Giving up on image");
                sink.apply(&with_failure_notice(outcome.final_message)).await;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ubot_core::Span;

    #[test]
    fn test_failure_notice_fits_the_limit() {
        let long = RenderedMessage::new("a".repeat(5000), vec![Span::bold(0, 5000)]);
        let message = with_failure_notice(long);
        assert_eq!(code_unit_len(&message.text), MAX_MESSAGE_LEN);
        assert!(message.text.ends_with(IMAGE_FAILED_NOTICE));
        assert!(message.spans[0].end() <= MAX_MESSAGE_LEN);
    }

    #[test]
    fn test_failure_notice_on_short_answer() {
        let message = with_failure_notice(RenderedMessage::plain("done"));
        assert_eq!(message.text, format!("done\n\n{IMAGE_FAILED_NOTICE}"));
    }
}
