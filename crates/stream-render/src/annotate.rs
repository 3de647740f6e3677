//! Custom-symbol and keyword annotation.

use ubot_core::{code_unit_len, OffsetMap, Span};

/// Every start position (byte offset) of `token` in `text`.
///
/// Scanning resumes one char past each match start, so overlapping occurrences of the same token
/// are all reported.
pub fn find_all(text: &str, token: &str) -> Vec<usize> {
    let mut positions = Vec::new();
    if token.is_empty() {
        return positions;
    }
    let mut start = 0;
    while let Some(rel) = text[start..].find(token) {
        let pos = start + rel;
        positions.push(pos);
        let step = text[pos..].chars().next().map(char::len_utf8).unwrap_or(1);
        start = pos + step;
    }
    positions
}

/// Fixed symbol → custom emoji table plus keywords to embolden.
#[derive(Debug, Clone, Default)]
pub struct SymbolAnnotator {
    symbols: Vec<(String, u64)>,
    bold_keywords: Vec<String>,
}

impl SymbolAnnotator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_symbol(mut self, symbol: impl Into<String>, custom_emoji_id: u64) -> Self {
        self.symbols.push((symbol.into(), custom_emoji_id));
        self
    }

    pub fn with_symbols<I, S>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = (S, u64)>,
        S: Into<String>,
    {
        self.symbols
            .extend(symbols.into_iter().map(|(s, id)| (s.into(), id)));
        self
    }

    /// Only the first occurrence of each keyword is emboldened.
    pub fn with_bold_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.bold_keywords.push(keyword.into());
        self
    }

    /// Spans for every symbol occurrence and the first occurrence of each keyword, sorted by
    /// `(offset, length)` with ties in discovery order.
    pub fn annotate(&self, text: &str) -> Vec<Span> {
        let map = OffsetMap::new(text);
        let mut spans = Vec::new();

        for (symbol, id) in &self.symbols {
            let length = code_unit_len(symbol);
            for pos in find_all(text, symbol) {
                spans.push(Span::custom_symbol(map.code_units_at(pos), length, *id));
            }
        }

        for keyword in &self.bold_keywords {
            if keyword.is_empty() {
                continue;
            }
            if let Some(pos) = text.find(keyword.as_str()) {
                spans.push(Span::bold(map.code_units_at(pos), code_unit_len(keyword)));
            }
        }

        Span::sort(&mut spans);
        spans
    }
}
