//! Token cursor for navigating the token stream.
//!
//! Provides low-level token access, lookahead, and consumption methods.
//! The token slice always ends with `Eof`, and the cursor never moves past
//! it.

use peek_ir::{Span, Token, TokenFlags, TokenKind};
use tracing::trace;

use crate::ParseError;

/// Cursor for navigating tokens.
pub struct Cursor<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Create a new cursor at the start of the token stream.
    ///
    /// `tokens` must be non-empty and end with `Eof`, as the lexer
    /// guarantees.
    pub fn new(tokens: &'a [Token]) -> Self {
        debug_assert!(
            tokens.last().is_some_and(|tok| tok.kind == TokenKind::Eof),
            "token stream must end with Eof"
        );
        Cursor { tokens, pos: 0 }
    }

    /// Get the current position in the token stream.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Set the cursor position directly.
    ///
    /// Used to roll back after lookahead. The position must be within the
    /// token stream.
    pub fn set_position(&mut self, pos: usize) {
        debug_assert!(
            pos < self.tokens.len(),
            "cursor position {} out of bounds (max {})",
            pos,
            self.tokens.len()
        );
        self.pos = pos;
    }

    /// Get the current token.
    #[inline]
    pub fn current(&self) -> Token {
        self.token_at(self.pos)
    }

    /// Get the current token's kind.
    #[inline]
    pub fn current_kind(&self) -> TokenKind {
        self.current().kind
    }

    /// Get the current token's span.
    #[inline]
    pub fn current_span(&self) -> Span {
        self.current().span
    }

    /// Check if at end of token stream.
    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.current_kind() == TokenKind::Eof
    }

    /// Check if the current token matches the given kind.
    #[inline]
    pub fn check(&self, kind: TokenKind) -> bool {
        self.current_kind() == kind
    }

    /// Peek at the token kind at offset `n` from current position.
    ///
    /// `peek_kind_at(0)` is the current token. Returns `Eof` past the end.
    #[inline]
    pub fn peek_kind_at(&self, n: usize) -> TokenKind {
        self.token_at(self.pos + n).kind
    }

    /// Peek at the next token (one-token lookahead).
    #[inline]
    pub fn peek_next(&self) -> Token {
        self.token_at(self.pos + 1)
    }

    /// Token at `index`, or the final `Eof` past the end.
    #[inline]
    fn token_at(&self, index: usize) -> Token {
        match self.tokens.get(index) {
            Some(&tok) => tok,
            None => self.eof(),
        }
    }

    #[cold]
    fn eof(&self) -> Token {
        self.tokens.last().copied().unwrap_or(Token::new(
            TokenKind::Eof,
            Span::DUMMY,
            TokenFlags::empty(),
        ))
    }

    /// Advance to the next token and return the consumed token.
    ///
    /// Stays on `Eof` once there.
    #[inline]
    pub fn advance(&mut self) -> Token {
        let token = self.current();
        trace!(
            pos = self.pos,
            kind = %token.kind.display_name(),
            span_start = token.span.start,
            span_end = token.span.end,
            "advance"
        );
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    /// Consume the current token if it has the given kind.
    #[inline]
    pub fn eat(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume a token of the given kind or report what was found instead.
    pub fn expect(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(ParseError::unexpected(
                self.current(),
                &format!("`{}`", kind.display_name()),
            ))
        }
    }

    /// Skip newline tokens.
    #[inline]
    pub fn skip_newlines(&mut self) {
        while self.check(TokenKind::Newline) {
            self.advance();
        }
    }

    /// Skip statement terminators (newlines and semicolons).
    #[inline]
    pub fn skip_terms(&mut self) {
        while matches!(self.current_kind(), TokenKind::Newline | TokenKind::Semi) {
            self.advance();
        }
    }
}
