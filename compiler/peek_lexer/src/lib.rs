//! Tokenizer for the source language the expression wrapper rewrites.
//!
//! The grammar is whitespace- and state-sensitive, so lexing is a
//! hand-written state machine over a [`peek_lexer_core::Cursor`] rather
//! than a table-driven scanner. The lexer resolves every ambiguity the
//! parser would otherwise need raw bytes for:
//!
//! - unary vs. binary operators (`a -1` vs. `a - 1`), splats, block-pass
//! - array literal vs. index, hash brace vs. block brace
//! - regexp vs. division, heredoc vs. shift, percent literal vs. modulo
//! - statement vs. modifier `if`/`unless`/`while`/`until`/`rescue`
//! - known local variables (flagged with [`TokenFlags::LOCAL_VAR`])
//!
//! String-like literals are single tokens. Heredoc tokens span only their
//! `<<TAG` opener; bodies are consumed at the following newline and
//! reported separately. Lexing stops at a line consisting of `__END__`.
//!
//! [`TokenFlags::LOCAL_VAR`]: peek_ir::TokenFlags::LOCAL_VAR

mod keywords;
mod lex_error;
mod lexer;
mod literals;
mod locals;
mod numbers;

use peek_diagnostic::ErrorCode;
use peek_ir::{Span, Token, TokenFlags, TokenKind};
use peek_lexer_core::SourceBuffer;

pub use lex_error::LexError;

/// Kind of a source comment.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CommentKind {
    /// `# ...` up to (not including) the newline.
    Line,
    /// `=begin` through the `=end` line.
    Block,
}

/// A comment. Comments never become tokens.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Comment {
    pub kind: CommentKind,
    pub span: Span,
}

/// Everything the lexer learned about a source text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LexOutput {
    /// Tokens, always terminated by a single `Eof`.
    pub tokens: Vec<Token>,
    /// Line and block comments in source order.
    pub comments: Vec<Comment>,
    /// Heredoc bodies in declaration order (terminator line excluded).
    pub heredoc_bodies: Vec<Span>,
    /// Byte offset of the `__END__` line, if the source has a data segment.
    pub data_segment: Option<u32>,
    pub errors: Vec<LexError>,
}

impl LexOutput {
    /// Offset where lexed source ends: the data segment or the source end.
    pub fn code_end(&self) -> u32 {
        self.tokens.last().map_or(0, |tok| tok.span.start)
    }
}

/// Tokenize `source`.
///
/// Lexing never fails outright; problems are collected in
/// [`LexOutput::errors`] and scanning resumes after the offending input.
#[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
pub fn lex(source: &str) -> LexOutput {
    let Some(buffer) = SourceBuffer::new(source) else {
        return LexOutput {
            tokens: vec![Token::new(TokenKind::Eof, Span::DUMMY, TokenFlags::empty())],
            errors: vec![LexError::new(
                ErrorCode::E0008,
                "source is larger than 4 GiB",
                Span::DUMMY,
            )],
            ..LexOutput::default()
        };
    };

    let mut cursor = buffer.cursor();
    cursor.advance_n(buffer.bom_len());
    let mut lexer = lexer::Lexer::new(cursor);
    lexer.run();
    let output = lexer.finish();

    tracing::debug!(
        tokens = output.tokens.len(),
        comments = output.comments.len(),
        heredocs = output.heredoc_bodies.len(),
        data_segment = ?output.data_segment,
        errors = output.errors.len(),
        "lexed"
    );
    output
}
