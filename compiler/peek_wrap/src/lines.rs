//! One wrap per physical line.
//!
//! Candidates are grouped by the line their span ends on and only the one
//! reaching furthest right survives, the earliest added on ties, which is
//! the outermost. Heredoc bodies are displaced below their declaration
//! line, and an opener's own span never outreaches the statement holding
//! it, so the markers of a declaration line land on the statement's
//! boundaries and never inside a body.

use peek_diagnostic::LineOffsetTable;
use peek_ir::Span;
use rustc_hash::FxHashMap;

/// A kept wrap with its 1-based start and end lines.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct LineWrap {
    pub span: Span,
    pub start_line: u32,
    pub end_line: u32,
}

/// Keep, per end line, the candidate with the greatest end offset.
/// The result is ordered by line.
pub(crate) fn group_by_line(candidates: &[Span], table: &LineOffsetTable) -> Vec<LineWrap> {
    let mut best: FxHashMap<u32, Span> = FxHashMap::default();
    for &span in candidates {
        let end_line = table.line_from_offset(span.end);
        best.entry(end_line)
            .and_modify(|kept| {
                if span.end > kept.end {
                    *kept = span;
                }
            })
            .or_insert(span);
    }

    let mut wraps: Vec<LineWrap> = best
        .into_iter()
        .map(|(end_line, span)| LineWrap {
            span,
            start_line: table.line_from_offset(span.start),
            end_line,
        })
        .collect();
    wraps.sort_unstable_by_key(|wrap| wrap.end_line);
    wraps
}
