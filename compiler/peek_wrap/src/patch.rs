//! Splicing planned text into the original buffer.
//!
//! Edits carry offsets into the original source and are applied in one
//! forward scan, so earlier insertions never shift later offsets. Original
//! bytes are never reordered or dropped, except for the span a
//! [`EditKind::Replace`] covers.

use std::cmp::Reverse;

use peek_ir::Span;
use tracing::debug;

use crate::regions::Regions;
use crate::WrapError;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum EditKind {
    /// Opening marker of a wrap ending at `end`.
    Open { end: u32 },
    /// Closing marker of a wrap starting at `start`.
    Close { start: u32 },
    BeforeAll,
    AfterAll,
    /// Text standing in for the source up to `end`.
    Replace { end: u32 },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Edit {
    pub offset: u32,
    pub text: String,
    pub kind: EditKind,
}

impl Edit {
    pub(crate) fn open(span: Span, text: String) -> Self {
        Edit {
            offset: span.start,
            text,
            kind: EditKind::Open { end: span.end },
        }
    }

    pub(crate) fn close(span: Span, text: String) -> Self {
        Edit {
            offset: span.end,
            text,
            kind: EditKind::Close { start: span.start },
        }
    }

    pub(crate) fn before_all(offset: u32, text: String) -> Self {
        Edit {
            offset,
            text,
            kind: EditKind::BeforeAll,
        }
    }

    pub(crate) fn after_all(offset: u32, text: String) -> Self {
        Edit {
            offset,
            text,
            kind: EditKind::AfterAll,
        }
    }

    pub(crate) fn replace(span: Span, text: &str) -> Self {
        Edit {
            offset: span.start,
            text: text.to_owned(),
            kind: EditKind::Replace { end: span.end },
        }
    }

    /// Order among edits sharing an offset: closing markers (innermost
    /// first), the body start, the body end, opening markers (outermost
    /// first), then replacements. The body markers only share an offset
    /// when the body is empty.
    fn sort_key(&self) -> (u32, u8, Reverse<u32>) {
        match self.kind {
            EditKind::Close { start } => (self.offset, 0, Reverse(start)),
            EditKind::BeforeAll => (self.offset, 1, Reverse(0)),
            EditKind::AfterAll => (self.offset, 2, Reverse(0)),
            EditKind::Open { end } => (self.offset, 3, Reverse(end)),
            EditKind::Replace { end } => (self.offset, 4, Reverse(end)),
        }
    }
}

/// Apply `edits` to `source`.
///
/// Fails when an edit lies outside the code, inside a heredoc body, or
/// inside text already replaced.
pub(crate) fn apply(
    source: &str,
    mut edits: Vec<Edit>,
    regions: &Regions<'_>,
) -> Result<String, WrapError> {
    edits.sort_by_key(Edit::sort_key);

    let extra: usize = edits.iter().map(|edit| edit.text.len()).sum();
    let mut out = String::with_capacity(source.len() + extra + 1);
    let mut cursor = 0u32;

    for edit in &edits {
        if edit.offset > regions.code_end {
            return Err(WrapError::patcher(format!(
                "edit at {} lies past the end of the code at {}",
                edit.offset, regions.code_end
            )));
        }
        if edit.offset < cursor {
            return Err(WrapError::patcher(format!(
                "edit at {} falls inside replaced text ending at {cursor}",
                edit.offset
            )));
        }
        if regions.in_heredoc_body(edit.offset) {
            return Err(WrapError::patcher(format!(
                "edit at {} falls inside a heredoc body",
                edit.offset
            )));
        }
        out.push_str(slice(source, cursor, edit.offset)?);
        out.push_str(&edit.text);
        cursor = match edit.kind {
            EditKind::Replace { end } => end,
            _ => edit.offset,
        };
    }
    out.push_str(slice(source, cursor, regions.code_end)?);

    if let Some(start) = regions.data_segment {
        if !out.is_empty() && !out.ends_with('\n') {
            out.push('\n');
        }
        out.push_str(slice(source, start, source_len(source)?)?);
    }

    debug!(edits = edits.len(), len = out.len(), "patched");
    Ok(out)
}

fn source_len(source: &str) -> Result<u32, WrapError> {
    u32::try_from(source.len()).map_err(|_| WrapError::TooLarge { len: source.len() })
}

fn slice(source: &str, start: u32, end: u32) -> Result<&str, WrapError> {
    source.get(start as usize..end as usize).ok_or_else(|| {
        WrapError::patcher(format!(
            "{start}..{end} is not a character-aligned range of the source"
        ))
    })
}
