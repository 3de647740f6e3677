//! Fenced code-block extraction.
//!
//! Each complete "```lang\n...```" block is replaced by its bare body and described by a
//! [`SpanKind::CodeBlock`](ubot_core::SpanKind) span. Removing delimiters shifts everything after
//! the block, so each removal leaves a [`ShiftRecord`] that [`remap_offset`] uses to carry spans
//! computed on the input over to the output.

use ubot_core::{code_unit_len, Span};

pub const FENCE: &str = "```";

/// One removed fence pair, in code units of the extraction input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftRecord {
    /// Input offset just past the closing delimiter.
    pub position_after_removal: usize,
    /// Delimiter and language-line code units dropped by this block.
    pub removed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FenceExtraction {
    pub text: String,
    pub code_spans: Vec<Span>,
    /// Ascending by `position_after_removal`.
    pub shifts: Vec<ShiftRecord>,
}

/// Located block, byte offsets into the input.
struct Block<'a> {
    end: usize,
    body: &'a str,
    language: Option<String>,
}

/// Find a complete block whose opening delimiter starts at `open`.
fn block_at(input: &str, open: usize) -> Option<Block<'_>> {
    let after_open = open + FENCE.len();
    let rest = &input[after_open..];
    let header_end = rest.find('\n');
    let header = &rest[..header_end.unwrap_or(rest.len())];

    // single-line form: ```body```
    if let Some(close) = header.find(FENCE) {
        return Some(Block {
            end: after_open + close + FENCE.len(),
            body: &header[..close],
            language: None,
        });
    }

    let body_start = after_open + header_end? + 1;
    let close = input[body_start..].find(FENCE)?;
    let language = header.trim();
    Some(Block {
        end: body_start + close + FENCE.len(),
        body: &input[body_start..body_start + close],
        language: (!language.is_empty()).then(|| language.to_string()),
    })
}

/// Replace complete fenced blocks with their bodies.
///
/// An opening delimiter without a closing partner, or without a line break after the language
/// tag, is kept verbatim along with everything after it.
pub fn extract_fences(input: &str) -> FenceExtraction {
    let mut result = FenceExtraction {
        text: String::with_capacity(input.len()),
        ..Default::default()
    };
    let mut out_units = 0;
    let mut in_units = 0;
    let mut cursor = 0;

    while let Some(rel) = input[cursor..].find(FENCE) {
        let open = cursor + rel;
        let Some(block) = block_at(input, open) else {
            break;
        };

        let plain = &input[cursor..open];
        let plain_units = code_unit_len(plain);
        result.text.push_str(plain);
        out_units += plain_units;
        in_units += plain_units;

        let body_units = code_unit_len(block.body);
        let block_units = code_unit_len(&input[open..block.end]);
        result.text.push_str(block.body);
        if body_units > 0 {
            result
                .code_spans
                .push(Span::code_block(out_units, body_units, block.language));
        }
        out_units += body_units;
        in_units += block_units;
        result.shifts.push(ShiftRecord {
            position_after_removal: in_units,
            removed: block_units - body_units,
        });

        cursor = block.end;
    }

    result.text.push_str(&input[cursor..]);
    result
}

/// Carry an input offset over to the extracted text.
///
/// Offsets inside a removed block land somewhere inside that block's body; callers only remap
/// spans that were computed outside fences.
pub fn remap_offset(offset: usize, shifts: &[ShiftRecord]) -> usize {
    let removed: usize = shifts
        .iter()
        .take_while(|s| s.position_after_removal <= offset)
        .map(|s| s.removed)
        .sum();
    offset.saturating_sub(removed)
}

pub fn remap_span(span: &Span, shifts: &[ShiftRecord]) -> Span {
    let start = remap_offset(span.offset, shifts);
    let end = remap_offset(span.end(), shifts);
    Span::new(span.kind.clone(), start, end.saturating_sub(start))
}
