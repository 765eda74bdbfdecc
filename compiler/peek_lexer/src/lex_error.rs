//! Lexer errors.

use peek_diagnostic::ErrorCode;
use peek_ir::Span;

/// A lexical error: code, human-readable message and location.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct LexError {
    pub code: ErrorCode,
    pub message: String,
    pub span: Span,
}

impl LexError {
    #[cold]
    pub fn new(code: ErrorCode, message: impl Into<String>, span: Span) -> Self {
        LexError {
            code,
            message: message.into(),
            span,
        }
    }

    /// A literal whose closing delimiter never appeared.
    #[cold]
    pub(crate) fn unterminated(what: &str, span: Span) -> Self {
        Self::new(ErrorCode::E0001, format!("unterminated {what}"), span)
    }

    #[cold]
    pub(crate) fn invalid_char(byte: u8, span: Span) -> Self {
        let message = if byte.is_ascii_graphic() {
            format!("invalid character `{}`", char::from(byte))
        } else {
            format!("invalid byte 0x{byte:02X}")
        };
        Self::new(ErrorCode::E0002, message, span)
    }

    #[cold]
    pub(crate) fn unterminated_heredoc(tag: &str, span: Span) -> Self {
        Self::new(
            ErrorCode::E0005,
            format!("heredoc `{tag}` has no terminator line"),
            span,
        )
    }
}
