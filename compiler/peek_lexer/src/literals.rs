//! String-like literals: quoted strings, percent literals, regexps,
//! symbols, character literals and heredocs.
//!
//! Each literal is one token. Interpolated code (`#{ ... }`) is scanned by
//! a nested lexer only to find the matching `}`; its tokens are discarded.

use peek_diagnostic::ErrorCode;
use peek_ir::{Span, StrKind, TokenKind};
use peek_lexer_core::Cursor;

use crate::lexer::{gvar_len, is_ident_char, is_ident_start, is_space, operator_method_len};
use crate::lexer::{LexState, Lexer, PendingHeredoc};
use crate::LexError;

impl Lexer<'_> {
    /// `"..."`, `'...'`, `` `...` `` and the quoted part of `:"..."`.
    /// The cursor is on the opening quote; `start` may precede it.
    pub(crate) fn quoted(&mut self, start: u32, quote: u8, kind: StrKind, interpolates: bool) {
        self.cursor.advance();
        self.literal_body(start, quote, quote, interpolates);
        self.push(TokenKind::Str(kind), start, LexState::End);
    }

    /// Scan to just past the closing delimiter. `open != close` enables
    /// nesting (`%(a (b) c)`).
    fn literal_body(&mut self, start: u32, close: u8, open: u8, interpolates: bool) {
        let mut depth = 0u32;
        loop {
            match self.cursor.skip_to_literal_delim(close, open, interpolates) {
                0 if self.cursor.is_eof() => {
                    self.errors.push(LexError::unterminated(
                        "literal",
                        Span::new(start, self.cursor.pos()),
                    ));
                    return;
                }
                b if b == close => {
                    self.cursor.advance();
                    if depth == 0 {
                        return;
                    }
                    depth -= 1;
                }
                b'\\' => {
                    self.cursor.advance();
                    if !self.cursor.is_eof() {
                        self.cursor.advance_char();
                    }
                }
                b'#' if interpolates => {
                    self.cursor.advance();
                    if self.cursor.current() == b'{' {
                        self.cursor.advance();
                        self.skip_interpolation();
                    }
                }
                _ => {
                    depth += 1;
                    self.cursor.advance();
                }
            }
        }
    }

    /// Skip the code of an interpolation; the cursor is just past `#{`.
    fn skip_interpolation(&mut self) {
        let start = self.cursor.pos().saturating_sub(2);
        let mut inner = self.nested();
        // Heredocs opened on either side of `#{` share the next newline.
        inner.pending_heredocs = std::mem::take(&mut self.pending_heredocs);
        inner.run();
        self.cursor = inner.cursor;
        self.heredoc_bodies.append(&mut inner.heredoc_bodies);
        self.pending_heredocs = std::mem::take(&mut inner.pending_heredocs);
        if !inner.closed() {
            self.errors.push(LexError::new(
                ErrorCode::E0007,
                "interpolation has no closing `}`",
                Span::new(start, self.cursor.pos()),
            ));
        }
        self.errors.append(&mut inner.errors);
    }

    pub(crate) fn regexp(&mut self, start: u32) {
        self.cursor.advance();
        self.literal_body(start, b'/', b'/', true);
        self.cursor.eat_while(|b| b.is_ascii_lowercase());
        self.push(TokenKind::Str(StrKind::Regexp), start, LexState::End);
    }

    /// `%q() %Q() %() %w[] %W[] %i[] %I[] %x() %r{} %s()`. Returns `false`
    /// when the `%` does not open a literal.
    pub(crate) fn percent_literal(&mut self, start: u32) -> bool {
        let (kind, interpolates, delimiter_at) = match self.cursor.peek() {
            b'q' => (StrKind::Plain, false, 2),
            b'Q' => (StrKind::Interpolated, true, 2),
            b'w' | b'i' => (StrKind::Words, false, 2),
            b'W' | b'I' => (StrKind::Words, true, 2),
            b'x' => (StrKind::Shell, true, 2),
            b'r' => (StrKind::Regexp, true, 2),
            b's' => (StrKind::Symbol, false, 2),
            _ => (StrKind::Interpolated, true, 1),
        };
        let open = self.cursor.peek_at(delimiter_at);
        if open.is_ascii_alphanumeric() || is_space(open) || open >= 0x80 {
            return false;
        }
        let close = match open {
            b'(' => b')',
            b'[' => b']',
            b'{' => b'}',
            b'<' => b'>',
            other => other,
        };

        self.cursor.advance_n(delimiter_at + 1);
        self.literal_body(start, close, open, interpolates);
        if kind == StrKind::Regexp {
            self.cursor.eat_while(|b| b.is_ascii_lowercase());
        }
        self.push(TokenKind::Str(kind), start, LexState::End);
        true
    }

    /// `?a`, `?\n`, `?\C-a`. Returns `false` when the `?` is a ternary.
    pub(crate) fn char_literal(&mut self, start: u32) -> bool {
        let c = self.cursor.peek();
        if is_space(c) {
            return false;
        }
        if c == b'\\' {
            self.cursor.advance_n(2);
            self.char_escape(start);
        } else {
            let width = Cursor::utf8_char_width(c);
            if is_ident_char(c) && is_ident_char(self.cursor.peek_at(1 + width)) {
                return false;
            }
            self.cursor.advance();
            self.cursor.advance_char();
        }
        self.push(TokenKind::Str(StrKind::Char), start, LexState::End);
        true
    }

    /// Consume one escape sequence; the cursor is just past the backslash.
    fn char_escape(&mut self, start: u32) {
        if self.cursor.is_eof() {
            self.errors.push(LexError::new(
                ErrorCode::E0004,
                "character literal ends after `\\`",
                Span::new(start, self.cursor.pos()),
            ));
            return;
        }
        let escape = self.cursor.current();
        self.cursor.advance_char();
        match escape {
            b'u' if self.cursor.current() == b'{' => {
                self.cursor.eat_while(|b| b != b'}' && b != b'\n');
                if self.cursor.current() == b'}' {
                    self.cursor.advance();
                }
            }
            b'u' => self.eat_up_to(4, |b| b.is_ascii_hexdigit()),
            b'x' => self.eat_up_to(2, |b| b.is_ascii_hexdigit()),
            b'0'..=b'7' => self.eat_up_to(2, |b| matches!(b, b'0'..=b'7')),
            b'C' | b'M' if self.cursor.current() == b'-' => {
                self.cursor.advance();
                self.control_char(start);
            }
            b'c' => self.control_char(start),
            _ => {}
        }
    }

    /// The character after `\C-`, `\M-` or `\c`, itself possibly escaped.
    fn control_char(&mut self, start: u32) {
        if self.cursor.current() == b'\\' {
            self.cursor.advance();
            self.char_escape(start);
        } else if !self.cursor.is_eof() {
            self.cursor.advance_char();
        }
    }

    fn eat_up_to(&mut self, max: u32, pred: impl Fn(u8) -> bool) {
        for _ in 0..max {
            if self.cursor.is_eof() || !pred(self.cursor.current()) {
                break;
            }
            self.cursor.advance();
        }
    }

    /// `:name`, `:name=`, `:+`, `:@ivar`, `:$gvar`, `:"dynamic"`.
    /// Returns `false` when the colon does not start a symbol.
    pub(crate) fn symbol(&mut self, start: u32) -> bool {
        let c = self.cursor.peek();
        match c {
            b'"' | b'\'' => {
                self.cursor.advance();
                self.quoted(start, c, StrKind::Symbol, c == b'"');
                true
            }
            b'@' => {
                let sigil = if self.cursor.peek2() == b'@' { 2 } else { 1 };
                if !is_ident_start(self.cursor.peek_at(1 + sigil)) {
                    return false;
                }
                self.cursor.advance_n(1 + sigil);
                self.eat_ident_chars();
                self.push(TokenKind::Symbol, start, LexState::End);
                true
            }
            b'$' => {
                let Some(len) = gvar_len(self.cursor.rest().get(1..).unwrap_or_default()) else {
                    return false;
                };
                self.cursor.advance_n(1 + len);
                self.push(TokenKind::Symbol, start, LexState::End);
                true
            }
            _ if is_ident_start(c) => {
                self.cursor.advance();
                self.eat_ident_chars();
                match self.cursor.current() {
                    b'?' | b'!' if self.cursor.peek() != b'=' => self.cursor.advance(),
                    b'=' if !matches!(self.cursor.peek(), b'=' | b'~' | b'>') => {
                        self.cursor.advance();
                    }
                    _ => {}
                }
                self.push(TokenKind::Symbol, start, LexState::End);
                true
            }
            _ => {
                let Some(len) = operator_method_len(self.cursor.rest().get(1..).unwrap_or_default())
                else {
                    return false;
                };
                self.cursor.advance_n(1 + len);
                self.push(TokenKind::Symbol, start, LexState::End);
                true
            }
        }
    }

    /// `<<TAG`, `<<-TAG`, `<<~TAG`, optionally with a quoted tag. Returns
    /// `false` when the `<<` is a shift.
    pub(crate) fn heredoc_opener(&mut self, start: u32) -> bool {
        let rest = self.cursor.rest();
        let indented = matches!(rest.get(2), Some(b'-' | b'~'));
        let tag_at = if indented { 3 } else { 2 };

        let (tag_start, tag_end, opener_len) = match rest.get(tag_at) {
            Some(&quote @ (b'\'' | b'"' | b'`')) => {
                let body = rest.get(tag_at + 1..).unwrap_or_default();
                let Some(len) = body.iter().position(|&b| b == quote || b == b'\n') else {
                    return false;
                };
                if body.get(len) != Some(&quote) {
                    return false;
                }
                (tag_at + 1, tag_at + 1 + len, tag_at + len + 2)
            }
            Some(&b) if is_ident_start(b) => {
                let len = rest
                    .get(tag_at..)
                    .unwrap_or_default()
                    .iter()
                    .take_while(|&&b| is_ident_char(b))
                    .count();
                (tag_at, tag_at + len, tag_at + len)
            }
            _ => return false,
        };

        let (Ok(tag_start), Ok(tag_end), Ok(opener_len)) = (
            u32::try_from(tag_start),
            u32::try_from(tag_end),
            u32::try_from(opener_len),
        ) else {
            return false;
        };
        let tag = self.cursor.slice(start + tag_start, start + tag_end);
        self.cursor.advance_n(opener_len);
        self.pending_heredocs.push(PendingHeredoc {
            tag,
            indented,
            opener: Span::new(start, self.cursor.pos()),
        });
        self.push(TokenKind::Str(StrKind::Heredoc), start, LexState::End);
        true
    }

    /// Consume the bodies of all pending heredocs, in declaration order.
    /// The cursor is at the start of the line after the openers.
    pub(crate) fn read_heredoc_bodies(&mut self) {
        for doc in std::mem::take(&mut self.pending_heredocs) {
            let body_start = self.cursor.pos();
            loop {
                if self.cursor.is_eof() {
                    self.errors
                        .push(LexError::unterminated_heredoc(doc.tag, doc.opener));
                    self.heredoc_bodies
                        .push(Span::new(body_start, self.cursor.pos()));
                    break;
                }
                let line_start = self.cursor.pos();
                self.cursor.eat_until_newline_or_eof();
                let line = self.cursor.slice_from(line_start);
                let line = line.strip_suffix('\r').unwrap_or(line);
                let line = if doc.indented { line.trim_start() } else { line };
                self.cursor.eat_line();
                if line == doc.tag {
                    self.heredoc_bodies.push(Span::new(body_start, line_start));
                    break;
                }
            }
        }
    }
}
