//! # stream-render
//!
//! Turns a language-model token stream into a live, formatted Telegram message.
//!
//! - [`annotate`]: custom-symbol and keyword spans over rendered text.
//! - [`markup`]: `**bold**` and `#` headings to bold spans.
//! - [`fence`]: fenced code blocks to preformatted spans, with shift records for remapping.
//! - [`render`]: per-request state, topic detection and layout.
//! - [`sink`]: best-effort edits that swallow no-op edits and retry once after a rate limit.
//! - [`stream`]: the periodic render loop and the final flush.

pub mod annotate;
pub mod fence;
pub mod markup;
pub mod render;
pub mod sink;
pub mod stream;

pub use annotate::{find_all, SymbolAnnotator};
pub use fence::{extract_fences, remap_offset, remap_span, FenceExtraction, ShiftRecord, FENCE};
pub use markup::{extract_markup, Markup};
pub use render::{
    Phase, RenderLayout, RenderState, RenderedMessage, Renderer, MAX_CAPTION_LEN,
    MAX_MESSAGE_LEN,
};
pub use sink::{Delivery, SafeEditSink};
pub use stream::{StreamOutcome, StreamingRenderer, DEFAULT_RENDER_INTERVAL};
