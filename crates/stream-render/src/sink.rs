//! Best-effort message edits.

use crate::render::RenderedMessage;
use std::sync::Arc;
use tracing::{debug, warn};
use ubot_core::{EditOutcome, MessageRef, Transport, UbotError};

/// What happened to one edit request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Edited,
    Unchanged,
    /// Failed and was swallowed.
    Dropped,
}

impl From<EditOutcome> for Delivery {
    fn from(outcome: EditOutcome) -> Self {
        match outcome {
            EditOutcome::Edited => Delivery::Edited,
            EditOutcome::Unchanged => Delivery::Unchanged,
        }
    }
}

/// Edits one target message and never fails.
///
/// "Not modified" answers are no-ops. A rate limit is waited out and the edit retried exactly
/// once; every other failure is logged and dropped so the stream keeps going.
#[derive(Clone)]
pub struct SafeEditSink {
    transport: Arc<dyn Transport>,
    target: MessageRef,
}

impl SafeEditSink {
    pub fn new(transport: Arc<dyn Transport>, target: MessageRef) -> Self {
        Self { transport, target }
    }

    pub fn target(&self) -> &MessageRef {
        &self.target
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    pub async fn apply(&self, message: &RenderedMessage) -> Delivery {
        match self.edit(message).await {
            Ok(outcome) => outcome.into(),
            Err(UbotError::RateLimited(wait)) => {
                warn!(
                    chat_id = self.target.chat_id,
                    message_id = %self.target.message_id,
                    wait_secs = wait.as_secs_f64(),
                    "Rate limited while editing, retrying once"
                );
                tokio::time::sleep(wait).await;
                match self.edit(message).await {
                    Ok(outcome) => outcome.into(),
                    Err(e) => {
                        warn!(error = %e, "Edit retry failed, dropping update");
                        Delivery::Dropped
                    }
                }
            }
            Err(e) => {
                warn!(
                    chat_id = self.target.chat_id,
                    message_id = %self.target.message_id,
                    error = %e,
                    "Edit failed, dropping update"
                );
                Delivery::Dropped
            }
        }
    }

    async fn edit(&self, message: &RenderedMessage) -> ubot_core::Result<EditOutcome> {
        let outcome = self
            .transport
            .edit_text(&self.target, &message.text, &message.spans)
            .await?;
        if outcome == EditOutcome::Unchanged {
            debug!(message_id = %self.target.message_id, "message not modified");
        }
        Ok(outcome)
    }
}
