//! Custom emoji table shared by every reply.

use stream_render::SymbolAnnotator;

/// Glyph → Telegram custom emoji id.
pub const CUSTOM_EMOJI: &[(&str, u64)] = &[
    ("💵", 5197434882321567830),
    ("💎", 5377620962390857342),
    ("⭐", 5472092560522511055),
    ("🧮", 5402186569006210455),
    ("✨", 5233661458289532234),
    ("🪙", 5202113974312653146),
];

pub const CONVERSION_KEYWORD: &str = "Конвертация";
pub const TOPIC_KEYWORD: &str = "Тема:";
pub const ANSWER_KEYWORD: &str = "Ответ:";

/// Annotator for conversion replies and their error text.
pub fn conversion_annotator() -> SymbolAnnotator {
    SymbolAnnotator::new()
        .with_symbols(CUSTOM_EMOJI.iter().copied())
        .with_bold_keyword(CONVERSION_KEYWORD)
}

/// Annotator for streamed model answers.
pub fn answer_annotator() -> SymbolAnnotator {
    SymbolAnnotator::new()
        .with_symbols(CUSTOM_EMOJI.iter().copied())
        .with_bold_keyword(TOPIC_KEYWORD)
        .with_bold_keyword(ANSWER_KEYWORD)
}
