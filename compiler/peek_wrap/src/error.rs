//! Errors reported by [`wrap`](crate::wrap).

use peek_diagnostic::{ErrorCode, Location};
use thiserror::Error;

/// Why a source could not be rewritten. No partial output accompanies an
/// error.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum WrapError {
    /// The source does not lex or parse.
    #[error("{code}: {message} at {location}")]
    Syntax {
        code: ErrorCode,
        message: String,
        location: Location,
    },

    /// Spans are 32-bit; larger sources cannot be addressed.
    #[error("source is {len} bytes, larger than the 4 GiB limit")]
    TooLarge { len: usize },

    /// A planner or patcher invariant does not hold. Always a bug.
    #[error("{code}: internal error: {message}")]
    Internal { code: ErrorCode, message: String },
}

impl WrapError {
    #[cold]
    pub(crate) fn planner(message: impl Into<String>) -> Self {
        WrapError::Internal {
            code: ErrorCode::E9001,
            message: message.into(),
        }
    }

    #[cold]
    pub(crate) fn patcher(message: impl Into<String>) -> Self {
        WrapError::Internal {
            code: ErrorCode::E9002,
            message: message.into(),
        }
    }

    /// The stable code of this error.
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            WrapError::Syntax { code, .. } | WrapError::Internal { code, .. } => Some(*code),
            WrapError::TooLarge { .. } => None,
        }
    }
}
