//! Periodic rendering of a fragment stream.

use crate::render::{Phase, RenderState, RenderedMessage, Renderer};
use crate::sink::SafeEditSink;
use futures::{Stream, StreamExt};
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{info, warn};

/// Fragments between progress log lines.
const LOG_EVERY: usize = 50;

pub const DEFAULT_RENDER_INTERVAL: Duration = Duration::from_secs(3);

/// Result of one streamed answer.
#[derive(Debug, Clone)]
pub struct StreamOutcome {
    /// Answer text without the topic line.
    pub body: String,
    pub topic: Option<String>,
    pub fragments: usize,
    /// Set when the stream ended with an error; the partial answer was still flushed.
    pub stream_error: Option<String>,
    pub final_message: RenderedMessage,
}

/// Drives a [`Renderer`] over a fragment stream, editing the target on a fixed interval and once
/// more when the stream ends.
#[derive(Debug, Clone)]
pub struct StreamingRenderer {
    renderer: Renderer,
    interval: Duration,
}

impl StreamingRenderer {
    pub fn new(renderer: Renderer) -> Self {
        Self {
            renderer,
            interval: DEFAULT_RENDER_INTERVAL,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// Consume `fragments` to completion.
    ///
    /// A ticker renders the partial answer every interval and skips renders identical to the
    /// previous one. When the stream ends, or fails, the ticker stops and the final render is
    /// applied.
    pub async fn run<S>(&self, fragments: S, sink: &SafeEditSink) -> StreamOutcome
    where
        S: Stream<Item = anyhow::Result<String>> + Send,
    {
        let state = Mutex::new(RenderState::new());
        let (stop_tx, mut stop_rx) = watch::channel(false);

        let consume = async {
            futures::pin_mut!(fragments);
            let mut error = None;
            while let Some(item) = fragments.next().await {
                match item {
                    Ok(fragment) => {
                        let mut state = state.lock().await;
                        state.push(&fragment);
                        let count = state.fragment_count();
                        if count % LOG_EVERY == 0 {
                            info!(
                                chunks = count,
                                bytes = state.buffer().len(),
                                "llm-chunks-collected"
                            );
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "Fragment stream failed, flushing partial answer");
                        error = Some(e.to_string());
                        break;
                    }
                }
            }
            let _ = stop_tx.send(true);
            error
        };

        let ticker = async {
            let mut ticks = tokio::time::interval_at(Instant::now() + self.interval, self.interval);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    biased;
                    _ = stop_rx.changed() => break,
                    _ = ticks.tick() => {
                        let pending = {
                            let mut state = state.lock().await;
                            if state.buffer().is_empty() {
                                None
                            } else {
                                let message = self.renderer.render(&mut state, Phase::Partial);
                                state.mark_rendered(&message).then_some(message)
                            }
                        };
                        if let Some(message) = pending {
                            sink.apply(&message).await;
                        }
                    }
                }
            }
        };

        let (stream_error, ()) = tokio::join!(consume, ticker);

        let mut state = state.into_inner();
        let final_message = self.renderer.render(&mut state, Phase::Final);
        sink.apply(&final_message).await;
        info!(
            chunks = state.fragment_count(),
            topic = state.topic().unwrap_or(""),
            "llm-stream-finished"
        );

        StreamOutcome {
            body: state.body(),
            topic: state.topic().map(str::to_string),
            fragments: state.fragment_count(),
            stream_error,
            final_message,
        }
    }
}
