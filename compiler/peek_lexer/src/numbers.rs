//! Numeric literals.
//!
//! Values are never computed: the transform only needs the literal's
//! extent and whether it is an integer, float, rational or imaginary.

use peek_diagnostic::ErrorCode;
use peek_ir::{Span, TokenKind};

use crate::lexer::{is_ident_char, LexState, Lexer};
use crate::LexError;

impl Lexer<'_> {
    /// Scan a number; the cursor is on its first digit (`start` may point
    /// at a sign).
    pub(crate) fn number(&mut self, start: u32) {
        let mut kind = TokenKind::Integer;

        if self.cursor.current() == b'0' && self.cursor.peek().is_ascii_alphabetic() {
            let radix = self.cursor.peek().to_ascii_lowercase();
            let digit: fn(u8) -> bool = match radix {
                b'x' => |b| b.is_ascii_hexdigit() || b == b'_',
                b'b' => |b| matches!(b, b'0' | b'1' | b'_'),
                b'o' => |b| matches!(b, b'0'..=b'7' | b'_'),
                b'd' => |b| b.is_ascii_digit() || b == b'_',
                _ => |_| false,
            };
            if matches!(radix, b'x' | b'b' | b'o' | b'd') {
                self.cursor.advance_n(2);
                let digits = self.cursor.pos();
                self.cursor.eat_while(digit);
                if self.cursor.pos() == digits {
                    self.errors.push(LexError::new(
                        ErrorCode::E0003,
                        "numeric literal without digits",
                        Span::new(start, self.cursor.pos()),
                    ));
                }
            } else {
                self.eat_digits();
            }
        } else {
            self.eat_digits();
            if self.cursor.current() == b'.' && self.cursor.peek().is_ascii_digit() {
                self.cursor.advance();
                self.eat_digits();
                kind = TokenKind::Float;
            }
            if matches!(self.cursor.current(), b'e' | b'E') {
                let signed = matches!(self.cursor.peek(), b'+' | b'-');
                let first = if signed {
                    self.cursor.peek2()
                } else {
                    self.cursor.peek()
                };
                if first.is_ascii_digit() {
                    self.cursor.advance_n(if signed { 2 } else { 1 });
                    self.eat_digits();
                    kind = TokenKind::Float;
                }
            }
        }

        // `3r`, `3i`, `3ri`
        if self.cursor.current() == b'r'
            && (!is_ident_char(self.cursor.peek())
                || (self.cursor.peek() == b'i' && !is_ident_char(self.cursor.peek2())))
        {
            self.cursor.advance();
            kind = TokenKind::Rational;
        }
        if self.cursor.current() == b'i' && !is_ident_char(self.cursor.peek()) {
            self.cursor.advance();
            kind = TokenKind::Imaginary;
        }

        if is_ident_char(self.cursor.current()) {
            self.cursor.eat_while(is_ident_char);
            self.errors.push(LexError::new(
                ErrorCode::E0003,
                "invalid numeric literal",
                Span::new(start, self.cursor.pos()),
            ));
        }
        self.push(kind, start, LexState::End);
    }

    #[inline]
    fn eat_digits(&mut self) {
        self.cursor.eat_while(|b| b.is_ascii_digit() || b == b'_');
    }
}
