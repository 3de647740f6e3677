//! Per-request render state and message layout.

use crate::annotate::SymbolAnnotator;
use crate::fence::{extract_fences, remap_span};
use crate::markup::extract_markup;
use std::ops::Range;
use tracing::debug;
use ubot_core::{code_unit_len, OffsetMap, Span, SpanKind};

/// Telegram's limit for message text, in code units.
pub const MAX_MESSAGE_LEN: usize = 4096;
/// Telegram's limit for media captions, in code units.
pub const MAX_CAPTION_LEN: usize = 1024;

/// Text plus the spans that format it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenderedMessage {
    pub text: String,
    pub spans: Vec<Span>,
}

impl RenderedMessage {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            spans: Vec::new(),
        }
    }

    pub fn new(text: impl Into<String>, spans: Vec<Span>) -> Self {
        Self {
            text: text.into(),
            spans,
        }
    }

    /// Cut to at most `limit` code units without splitting a char, dropping spans that start past
    /// the cut and clipping those that straddle it.
    pub fn truncated(mut self, limit: usize) -> Self {
        let map = OffsetMap::new(&self.text);
        if map.code_unit_count() <= limit {
            return self;
        }
        let cut_byte = map.byte_at_or_before(limit);
        let cut = map.code_units_at(cut_byte);
        drop(map);

        self.text.truncate(cut_byte);
        self.spans.retain(|s| s.offset < cut);
        for span in &mut self.spans {
            if span.end() > cut {
                span.length = cut - span.offset;
            }
        }
        self
    }
}

/// Whether the stream is still running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Partial,
    Final,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct TopicLine {
    label: String,
    /// Byte range of the line in the buffer, trailing newline included.
    line: Range<usize>,
}

/// Accumulated answer for one request.
///
/// Starts without a topic and switches to titled once a complete `marker: title` line shows up.
/// The switch happens at most once.
#[derive(Debug, Default)]
pub struct RenderState {
    buffer: String,
    fragments: usize,
    topic: Option<TopicLine>,
    /// Byte offset up to which complete lines have been checked for a topic.
    scanned: usize,
    last_rendered: Option<RenderedMessage>,
}

impl RenderState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, fragment: &str) {
        self.buffer.push_str(fragment);
        self.fragments += 1;
    }

    /// Everything received so far, verbatim.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn fragment_count(&self) -> usize {
        self.fragments
    }

    pub fn topic(&self) -> Option<&str> {
        self.topic.as_ref().map(|t| t.label.as_str())
    }

    /// The answer without its topic line.
    pub fn body(&self) -> String {
        match &self.topic {
            None => self.buffer.clone(),
            Some(t) => {
                let mut body = String::with_capacity(self.buffer.len());
                body.push_str(&self.buffer[..t.line.start]);
                body.push_str(&self.buffer[t.line.end..]);
                body.trim_start_matches(['\n', '\r']).to_string()
            }
        }
    }

    /// Records `message` as delivered; false when it matches the previous delivery.
    pub fn mark_rendered(&mut self, message: &RenderedMessage) -> bool {
        if self.last_rendered.as_ref() == Some(message) {
            return false;
        }
        self.last_rendered = Some(message.clone());
        true
    }

    fn detect_topic(&mut self, marker: &str) {
        if self.topic.is_some() || marker.is_empty() {
            return;
        }
        while let Some(rel) = self.buffer[self.scanned..].find('\n') {
            let start = self.scanned;
            let end = start + rel + 1;
            self.scanned = end;
            if let Some(label) = topic_label(&self.buffer[start..end - 1], marker) {
                debug!(topic = %label, "topic line detected");
                self.topic = Some(TopicLine {
                    label,
                    line: start..end,
                });
                return;
            }
        }
    }
}

/// Title from a `marker title` line, tolerating markdown emphasis around both.
fn topic_label(line: &str, marker: &str) -> Option<String> {
    let is_decoration = |c: char| c == '*' || c == '#' || c == '_' || c.is_whitespace();
    let rest = line.trim_start_matches(is_decoration).strip_prefix(marker)?;
    let label = rest.trim_matches(is_decoration);
    (!label.is_empty()).then(|| label.to_string())
}

/// Fixed text around a streamed answer.
#[derive(Debug, Clone)]
pub struct RenderLayout {
    pub partial_preamble: String,
    pub final_preamble: String,
    /// Line prefix the model uses to announce a topic.
    pub topic_marker: String,
    pub topic_heading: String,
    pub answer_heading: String,
    pub max_len: usize,
}

impl RenderLayout {
    pub fn new(partial_preamble: impl Into<String>, final_preamble: impl Into<String>) -> Self {
        Self {
            partial_preamble: partial_preamble.into(),
            final_preamble: final_preamble.into(),
            topic_marker: "Тема:".to_string(),
            topic_heading: "✨ Тема:".to_string(),
            answer_heading: "💬 Ответ:".to_string(),
            max_len: MAX_MESSAGE_LEN,
        }
    }

    pub fn with_topic_marker(mut self, marker: impl Into<String>) -> Self {
        self.topic_marker = marker.into();
        self
    }

    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = max_len;
        self
    }
}

/// Lays out a [`RenderState`] as a Telegram message.
#[derive(Debug, Clone)]
pub struct Renderer {
    layout: RenderLayout,
    annotator: SymbolAnnotator,
}

impl Renderer {
    pub fn new(layout: RenderLayout, annotator: SymbolAnnotator) -> Self {
        Self { layout, annotator }
    }

    pub fn layout(&self) -> &RenderLayout {
        &self.layout
    }

    /// Untitled partial renders are the preamble plus the raw buffer with no formatting; every
    /// other render is structured with markup, code blocks and symbols resolved.
    pub fn render(&self, state: &mut RenderState, phase: Phase) -> RenderedMessage {
        state.detect_topic(&self.layout.topic_marker);
        let preamble = match phase {
            Phase::Partial => &self.layout.partial_preamble,
            Phase::Final => &self.layout.final_preamble,
        };

        let message = match (state.topic(), phase) {
            (None, Phase::Partial) => {
                RenderedMessage::plain(format!("{preamble}\n\n{}", state.buffer()))
            }
            (None, Phase::Final) => self.structured(format!("{preamble}\n\n"), &state.buffer),
            (Some(topic), _) => {
                let head = format!(
                    "{preamble}\n\n{} {topic}\n\n{}\n",
                    self.layout.topic_heading, self.layout.answer_heading
                );
                self.structured(head, &state.body())
            }
        };
        message.truncated(self.layout.max_len)
    }

    /// `head` is taken literally; `body` goes through markup and fence extraction.
    pub fn structured(&self, head: String, body: &str) -> RenderedMessage {
        let markup = extract_markup(body);
        let fences = extract_fences(&markup.text);
        let shift = code_unit_len(&head);

        let mut spans: Vec<Span> = markup
            .spans
            .iter()
            .map(|s| remap_span(s, &fences.shifts))
            .filter(|s| s.length > 0)
            .chain(fences.code_spans)
            .map(|mut s| {
                s.offset += shift;
                s
            })
            .collect();

        let mut text = head;
        text.push_str(&fences.text);

        let code: Vec<Span> = spans
            .iter()
            .filter(|s| matches!(s.kind, SpanKind::CodeBlock { .. }))
            .cloned()
            .collect();
        let mut dropped = 0;
        for span in self.annotator.annotate(&text) {
            if code.iter().any(|c| c.overlaps(&span)) {
                dropped += 1;
            } else {
                spans.push(span);
            }
        }
        if dropped > 0 {
            debug!(dropped, "annotations inside code blocks skipped");
        }

        Span::sort(&mut spans);
        RenderedMessage { text, spans }
    }
}
