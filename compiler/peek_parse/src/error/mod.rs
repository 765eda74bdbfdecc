//! Parse errors.
//!
//! The parser stops at the first error: the wrapper either rewrites a
//! whole, well-formed program or reports why it cannot.

use std::fmt;

use peek_diagnostic::ErrorCode;
use peek_ir::{Span, Token, TokenKind};

/// A parse error: code, human-readable message and location.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct ParseError {
    pub code: ErrorCode,
    pub message: String,
    pub span: Span,
}

impl ParseError {
    #[cold]
    pub fn new(code: ErrorCode, message: impl Into<String>, span: Span) -> Self {
        ParseError {
            code,
            message: message.into(),
            span,
        }
    }

    /// `found` where `expected` should have been.
    #[cold]
    pub(crate) fn unexpected(found: Token, expected: &str) -> Self {
        Self::new(
            ErrorCode::E1001,
            format!("expected {expected}, found {}", found.kind.display_name()),
            found.span,
        )
    }

    #[cold]
    pub(crate) fn expected_expression(found: Token) -> Self {
        Self::new(
            ErrorCode::E1002,
            format!("expected expression, found {}", found.kind.display_name()),
            found.span,
        )
    }

    /// A bracket opened at `open` that never closed.
    #[cold]
    pub(crate) fn unclosed(open: Token, found: Token) -> Self {
        Self::new(
            ErrorCode::E1003,
            format!(
                "unclosed `{}`, found {}",
                open.kind.display_name(),
                found.kind.display_name()
            ),
            open.span.merge(found.span),
        )
    }

    /// A name was required (`alias`, `undef`, `module`).
    #[cold]
    pub(crate) fn expected_name(found: Token, what: &str) -> Self {
        Self::new(
            ErrorCode::E1004,
            format!("expected {what}, found {}", found.kind.display_name()),
            found.span,
        )
    }

    /// `def` not followed by a method name.
    #[cold]
    pub(crate) fn invalid_def(keyword: Token, found: Token) -> Self {
        Self::new(
            ErrorCode::E1006,
            format!("expected a method name after `def`, found {}", found.kind.display_name()),
            keyword.span.merge(found.span),
        )
    }

    #[cold]
    pub(crate) fn invalid_target(span: Span) -> Self {
        Self::new(ErrorCode::E1005, "cannot assign to this expression", span)
    }

    /// A keyword construct whose `end` is missing.
    #[cold]
    pub(crate) fn missing_end(keyword: Token, found: Token) -> Self {
        let message = if found.kind == TokenKind::Eof {
            format!("`{}` has no matching `end`", keyword.kind.display_name())
        } else {
            format!(
                "expected `end` to close `{}`, found {}",
                keyword.kind.display_name(),
                found.kind.display_name()
            )
        };
        Self::new(ErrorCode::E1007, message, keyword.span.merge(found.span))
    }

    #[cold]
    pub(crate) fn unsupported(what: &str, span: Span) -> Self {
        Self::new(ErrorCode::E1008, format!("{what} is not supported"), span)
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ParseError {}
