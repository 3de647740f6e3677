//! Lightweight emphasis markup: `**bold**` runs and `#` headings become bold spans.
//!
//! Fenced regions are copied verbatim so code keeps its asterisks and hashes. Output spans are in
//! code units of the stripped text; run [`crate::fence::extract_fences`] afterwards and remap them
//! through its shift records.

use crate::fence::FENCE;
use ubot_core::Span;

const BOLD: &str = "**";

/// Text with emphasis markers removed, plus the bold spans they described.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Markup {
    pub text: String,
    pub spans: Vec<Span>,
}

struct Writer {
    text: String,
    units: usize,
    spans: Vec<Span>,
}

impl Writer {
    fn push(&mut self, s: &str) {
        self.text.push_str(s);
        self.units += s.chars().map(char::len_utf16).sum::<usize>();
    }

    fn push_bold(&mut self, s: &str) {
        let start = self.units;
        self.push(s);
        if self.units > start {
            self.spans.push(Span::bold(start, self.units - start));
        }
    }

    fn push_markup(&mut self, markup: Markup) {
        let base = self.units;
        self.push(&markup.text);
        self.spans.extend(
            markup
                .spans
                .into_iter()
                .map(|s| Span::bold(s.offset + base, s.length)),
        );
    }
}

/// Strip `**bold**` runs and leading `#` heading markers outside code fences.
///
/// A `**` with no closing partner on the same line stays literal, which keeps half-streamed
/// emphasis readable until its closing marker arrives.
pub fn extract_markup(input: &str) -> Markup {
    let mut out = Writer {
        text: String::with_capacity(input.len()),
        units: 0,
        spans: Vec::new(),
    };
    let mut in_fence = false;

    for line in input.split_inclusive('\n') {
        if in_fence {
            out.push(line);
            if line.matches(FENCE).count() % 2 == 1 {
                in_fence = false;
            }
            continue;
        }

        let (content, newline) = match line.strip_suffix('\n') {
            Some(c) => (c, "\n"),
            None => (line, ""),
        };

        if let Some(heading) = heading_text(content) {
            let stripped = strip_bold(heading);
            // whole heading is bold already; inner markers just disappear
            out.push_bold(&stripped.text);
            out.push(newline);
            continue;
        }

        // inline fence pairs stay verbatim; prose between them is still scanned for bold
        let mut rest = content;
        while let Some(open) = rest.find(FENCE) {
            out.push_markup(strip_bold(&rest[..open]));
            let body = &rest[open + FENCE.len()..];
            match body.find(FENCE) {
                Some(close) => {
                    let end = open + FENCE.len() + close + FENCE.len();
                    out.push(&rest[open..end]);
                    rest = &rest[end..];
                }
                None => {
                    out.push(&rest[open..]);
                    rest = "";
                    in_fence = true;
                }
            }
        }
        if !in_fence {
            out.push_markup(strip_bold(rest));
        }
        out.push(newline);
    }

    Markup {
        text: out.text,
        spans: out.spans,
    }
}

/// Text after `#`..`######` and a space, or `None` for a non-heading line.
fn heading_text(line: &str) -> Option<&str> {
    let hashes = line.chars().take_while(|&c| c == '#').count();
    if hashes == 0 || hashes > 6 {
        return None;
    }
    let rest = &line[hashes..];
    let text = rest.strip_prefix(' ')?.trim();
    (!text.is_empty()).then_some(text)
}

fn strip_bold(line: &str) -> Markup {
    let mut out = Writer {
        text: String::with_capacity(line.len()),
        units: 0,
        spans: Vec::new(),
    };
    let mut rest = line;
    while let Some(open) = rest.find(BOLD) {
        let after_open = &rest[open + BOLD.len()..];
        match after_open.find(BOLD) {
            Some(close) if close > 0 => {
                out.push(&rest[..open]);
                out.push_bold(&after_open[..close]);
                rest = &after_open[close + BOLD.len()..];
            }
            _ => {
                out.push(&rest[..open + BOLD.len()]);
                rest = after_open;
            }
        }
    }
    out.push(rest);
    Markup {
        text: out.text,
        spans: out.spans,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bold_runs_are_stripped() {
        let m = extract_markup("a **bc** d **Ё**");
        assert_eq!(m.text, "a bc d Ё");
        assert_eq!(m.spans, vec![Span::bold(2, 2), Span::bold(7, 1)]);
    }

    #[test]
    fn test_unclosed_bold_stays_literal() {
        let m = extract_markup("so **far");
        assert_eq!(m.text, "so **far");
        assert!(m.spans.is_empty());

        let m = extract_markup("empty **** run");
        assert_eq!(m.text, "empty **** run");
        assert!(m.spans.is_empty());
    }

    #[test]
    fn test_headings_become_bold_lines() {
        let m = extract_markup("## Шаг **1**\nbody\n#nospace");
        assert_eq!(m.text, "Шаг 1\nbody\n#nospace");
        assert_eq!(m.spans, vec![Span::bold(0, 5)]);
    }

    #[test]
    fn test_fenced_regions_are_untouched() {
        let input = "**x**\n```py\nprint(2**3**4)\n# comment\n```\n**y**";
        let m = extract_markup(input);
        assert_eq!(m.text, "x\n```py\nprint(2**3**4)\n# comment\n```\ny");
        assert_eq!(m.spans, vec![Span::bold(0, 1), Span::bold(37, 1)]);
    }

    #[test]
    fn test_inline_fence_pair_does_not_open_block() {
        let m = extract_markup("run ```ls``` then **go**");
        assert_eq!(m.text, "run ```ls``` then go");
        assert_eq!(m.spans, vec![Span::bold(18, 2)]);

        let m = extract_markup("```a```\n**b**");
        assert_eq!(m.text, "```a```\nb");
        assert_eq!(m.spans, vec![Span::bold(8, 1)]);
    }

    #[test]
    fn test_bold_on_both_sides_of_inline_fence() {
        let m = extract_markup("**a** ```x``` **b**");
        assert_eq!(m.text, "a ```x``` b");
        assert_eq!(m.spans, vec![Span::bold(0, 1), Span::bold(10, 1)]);

        let m = extract_markup("**a** ```py\nx = 2**3**\n```");
        assert_eq!(m.text, "a ```py\nx = 2**3**\n```");
        assert_eq!(m.spans, vec![Span::bold(0, 1)]);
    }

    #[test]
    fn test_spans_counted_in_code_units() {
        let m = extract_markup("💎 **цена**");
        assert_eq!(m.text, "💎 цена");
        assert_eq!(m.spans, vec![Span::bold(3, 4)]);
    }
}
