//! `.ai`: stream a model answer into the target message.

use super::Flow;
use crate::router::Command;
use crate::symbols::answer_annotator;
use async_trait::async_trait;
use llm_client::{model_label, LlmClient};
use prompt::{ANSWER_SYSTEM_PROMPT, TOPIC_MARKER};
use std::sync::Arc;
use std::time::Duration;
use stream_render::{
    RenderLayout, RenderedMessage, Renderer, SafeEditSink, StreamOutcome, StreamingRenderer,
};
use tracing::{error, info};
use ubot_core::{HandlerError, MessageRef, Result, Transport};

pub const GENERATING_PREAMBLE: &str = "🤖 Генерирую Ответ...";
/// Followed by the model label.
pub const ANSWERED_PREAMBLE: &str = "🤖 Ответ Сгенерирован Моделью";
pub const MSG_MODEL_UNAVAILABLE: &str = "⚠️ Модель недоступна, попробуйте позже";

pub struct AiAnswerFlow {
    transport: Arc<dyn Transport>,
    llm: Arc<dyn LlmClient>,
    streaming: StreamingRenderer,
    max_tokens: u32,
}

impl AiAnswerFlow {
    pub fn new(
        transport: Arc<dyn Transport>,
        llm: Arc<dyn LlmClient>,
        max_tokens: u32,
        render_interval: Duration,
    ) -> Self {
        let final_preamble = format!("{ANSWERED_PREAMBLE} {}", model_label(llm.model()));
        let layout = RenderLayout::new(GENERATING_PREAMBLE, final_preamble)
            .with_topic_marker(TOPIC_MARKER);
        let streaming = StreamingRenderer::new(Renderer::new(layout, answer_annotator()))
            .with_interval(render_interval);
        Self {
            transport,
            llm,
            streaming,
            max_tokens,
        }
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// Show the generating preamble, then stream the answer through `sink`.
    ///
    /// Returns `None` when the stream could not be opened; the target then shows
    /// [`MSG_MODEL_UNAVAILABLE`].
    pub async fn stream_answer(
        &self,
        sink: &SafeEditSink,
        system_prompt: &str,
        query: &str,
    ) -> Option<StreamOutcome> {
        sink.apply(&RenderedMessage::plain(GENERATING_PREAMBLE)).await;

        info!(
            model = self.llm.model(),
            query_len = query.chars().count(),
            "step: opening answer stream"
        );
        let fragments = match self
            .llm
            .chat_stream(system_prompt, query, self.max_tokens)
            .await
        {
            Ok(fragments) => fragments,
            Err(e) => {
                for (i, cause) in e.chain().enumerate() {
                    if i == 0 {
                        error!(cause = %cause, "Failed to open answer stream");
                    } else {
                        error!(cause = %cause, "Caused by");
                    }
                }
                let preamble = &self.streaming.renderer().layout().final_preamble;
                sink.apply(&RenderedMessage::plain(format!(
                    "{preamble}\n\n{MSG_MODEL_UNAVAILABLE}"
                )))
                .await;
                return None;
            }
        };

        let outcome = self.streaming.run(fragments, sink).await;
        info!(
            fragments = outcome.fragments,
            stream_failed = outcome.stream_error.is_some(),
            "step: answer delivered"
        );
        Some(outcome)
    }
}

#[async_trait]
impl Flow for AiAnswerFlow {
    async fn run(&self, target: &MessageRef, command: Command) -> Result<()> {
        let query = match command {
            Command::Ask { query } => query,
            other => return Err(HandlerError::InvalidCommand(format!("{other:?}")).into()),
        };
        let sink = SafeEditSink::new(self.transport.clone(), target.clone());
        self.stream_answer(&sink, ANSWER_SYSTEM_PROMPT, &query).await;
        Ok(())
    }
}
