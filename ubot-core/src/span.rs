//! Formatting spans and UTF-16 offset helpers.
//!
//! Telegram positions message entities in UTF-16 code units, while Rust strings are indexed by
//! UTF-8 byte offsets. Every span in this crate family is expressed in code units; the helpers here
//! convert from the native byte offsets that `str::find` and friends return.

use serde::{Deserialize, Serialize};
use std::cell::OnceCell;

/// Number of UTF-16 code units `s` occupies in the transport's coordinate system.
pub fn code_unit_len(s: &str) -> usize {
    s.chars().map(char::len_utf16).sum()
}

/// UTF-16 code-unit offset of the byte index `byte_idx` into `s`.
///
/// `byte_idx` must lie on a char boundary within `0..=s.len()`; anything else panics.
pub fn code_unit_index(s: &str, byte_idx: usize) -> usize {
    code_unit_len(&s[..byte_idx])
}

/// What a [`Span`] formats.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpanKind {
    Bold,
    /// Preformatted block; `None` when the fence carried no language tag.
    CodeBlock { language: Option<String> },
    /// A glyph replaced by a custom emoji.
    CustomSymbol { id: u64 },
}

/// A formatting annotation over a rendered text, in UTF-16 code units.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub kind: SpanKind,
    pub offset: usize,
    pub length: usize,
}

impl Span {
    pub fn new(kind: SpanKind, offset: usize, length: usize) -> Self {
        Self {
            kind,
            offset,
            length,
        }
    }

    pub fn bold(offset: usize, length: usize) -> Self {
        Self::new(SpanKind::Bold, offset, length)
    }

    pub fn code_block(offset: usize, length: usize, language: Option<String>) -> Self {
        Self::new(SpanKind::CodeBlock { language }, offset, length)
    }

    pub fn custom_symbol(offset: usize, length: usize, id: u64) -> Self {
        Self::new(SpanKind::CustomSymbol { id }, offset, length)
    }

    /// Exclusive end offset.
    pub fn end(&self) -> usize {
        self.offset + self.length
    }

    /// True when both spans cover at least one common code unit.
    pub fn overlaps(&self, other: &Span) -> bool {
        self.offset < other.end() && other.offset < self.end()
    }

    /// Stable sort by `(offset, length)`; ties keep discovery order.
    pub fn sort(spans: &mut [Span]) {
        spans.sort_by_key(|s| (s.offset, s.length));
    }
}

/// Lazy byte-offset to code-unit lookup over one string.
///
/// The cumulative table is built on the first query and reused afterwards, so repeated lookups
/// over a long rendered text stay logarithmic.
pub struct OffsetMap<'a> {
    text: &'a str,
    /// `(byte offset, code-unit offset)` at every char start, plus the end of the text.
    table: OnceCell<Vec<(usize, usize)>>,
}

impl<'a> OffsetMap<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            table: OnceCell::new(),
        }
    }

    fn table(&self) -> &[(usize, usize)] {
        self.table.get_or_init(|| {
            let mut table = Vec::with_capacity(self.text.len() + 1);
            let mut units = 0;
            for (byte, ch) in self.text.char_indices() {
                table.push((byte, units));
                units += ch.len_utf16();
            }
            table.push((self.text.len(), units));
            table
        })
    }

    /// Total length in code units.
    pub fn code_unit_count(&self) -> usize {
        self.table().last().map(|&(_, u)| u).unwrap_or(0)
    }

    /// Code-unit offset of a char-boundary byte index. Indices inside a char round down.
    pub fn code_units_at(&self, byte_idx: usize) -> usize {
        let table = self.table();
        match table.binary_search_by_key(&byte_idx, |&(b, _)| b) {
            Ok(i) => table[i].1,
            Err(i) => table[i.saturating_sub(1)].1,
        }
    }

    /// Largest char-boundary byte index whose code-unit offset does not exceed `units`.
    ///
    /// Never splits a surrogate pair: a limit landing in the middle of one cuts before it.
    pub fn byte_at_or_before(&self, units: usize) -> usize {
        let table = self.table();
        match table.binary_search_by_key(&units, |&(_, u)| u) {
            Ok(i) => table[i].0,
            Err(i) => table[i.saturating_sub(1)].0,
        }
    }
}
