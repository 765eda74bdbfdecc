use std::fmt;

/// Error codes for every diagnostic the pipeline can produce.
///
/// Format: E#### where first digit indicates phase:
/// - E0xxx: Lexer errors
/// - E1xxx: Parser errors
/// - E9xxx: Internal errors (broken invariants, never user input)
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Lexer Errors (E0xxx)
    /// Unterminated string-like literal
    E0001,
    /// Invalid character in source
    E0002,
    /// Invalid number literal
    E0003,
    /// Unterminated character literal
    E0004,
    /// Unterminated heredoc
    E0005,
    /// Unterminated `=begin` block comment
    E0006,
    /// Unterminated interpolation
    E0007,
    /// Source larger than 4 GiB
    E0008,

    // Parser Errors (E1xxx)
    /// Unexpected token
    E1001,
    /// Expected expression
    E1002,
    /// Unclosed delimiter
    E1003,
    /// Expected a name
    E1004,
    /// Invalid assignment target
    E1005,
    /// Invalid method definition
    E1006,
    /// Missing `end`
    E1007,
    /// Unsupported syntax
    E1008,

    // Internal Errors (E9xxx)
    /// Planner invariant violated
    E9001,
    /// Patcher invariant violated
    E9002,
}

impl ErrorCode {
    /// Check if this is a lexer error.
    pub fn is_lexer_error(&self) -> bool {
        self.as_str().starts_with("E0")
    }

    /// Check if this is a parser error.
    pub fn is_parser_error(&self) -> bool {
        self.as_str().starts_with("E1")
    }

    /// Check if this is an internal error.
    pub fn is_internal(&self) -> bool {
        self.as_str().starts_with("E9")
    }

    /// Get the numeric code as a string (e.g., "E1001").
    pub fn as_str(&self) -> &'static str {
        match self {
            // Lexer
            ErrorCode::E0001 => "E0001",
            ErrorCode::E0002 => "E0002",
            ErrorCode::E0003 => "E0003",
            ErrorCode::E0004 => "E0004",
            ErrorCode::E0005 => "E0005",
            ErrorCode::E0006 => "E0006",
            ErrorCode::E0007 => "E0007",
            ErrorCode::E0008 => "E0008",
            // Parser
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E1004 => "E1004",
            ErrorCode::E1005 => "E1005",
            ErrorCode::E1006 => "E1006",
            ErrorCode::E1007 => "E1007",
            ErrorCode::E1008 => "E1008",
            // Internal
            ErrorCode::E9001 => "E9001",
            ErrorCode::E9002 => "E9002",
        }
    }

    /// One-line description of the error class.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E0001 => "unterminated literal",
            ErrorCode::E0002 => "invalid character",
            ErrorCode::E0003 => "invalid number literal",
            ErrorCode::E0004 => "unterminated character literal",
            ErrorCode::E0005 => "unterminated heredoc",
            ErrorCode::E0006 => "unterminated block comment",
            ErrorCode::E0007 => "unterminated interpolation",
            ErrorCode::E0008 => "source too large",
            ErrorCode::E1001 => "unexpected token",
            ErrorCode::E1002 => "expected expression",
            ErrorCode::E1003 => "unclosed delimiter",
            ErrorCode::E1004 => "expected a name",
            ErrorCode::E1005 => "invalid assignment target",
            ErrorCode::E1006 => "invalid method definition",
            ErrorCode::E1007 => "missing `end`",
            ErrorCode::E1008 => "unsupported syntax",
            ErrorCode::E9001 => "wrap planner invariant violated",
            ErrorCode::E9002 => "text patcher invariant violated",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
