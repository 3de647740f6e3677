//! Command flows. Each one writes its whole reply into the target message.

mod ai_answer;
mod ai_image;
mod crypto;

pub use ai_answer::{AiAnswerFlow, ANSWERED_PREAMBLE, GENERATING_PREAMBLE, MSG_MODEL_UNAVAILABLE};
pub use ai_image::{AiImageFlow, IMAGE_FAILED_NOTICE, IMAGE_RETRY_DELAYS};
pub use crypto::CryptoFlow;

use crate::router::Command;
use async_trait::async_trait;
use ubot_core::{MessageRef, Result};

#[async_trait]
pub trait Flow: Send + Sync {
    /// Handle `command`, writing into `target`. Delivery failures are logged, not returned.
    async fn run(&self, target: &MessageRef, command: Command) -> Result<()>;
}
