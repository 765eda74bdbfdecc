//! Parser snapshots for speculative parsing.
//!
//! The grammar only needs token lookahead to disambiguate: whether a
//! statement is a multiple assignment, whether `def a.b` names a singleton
//! receiver. [`Parser::look_ahead`](crate::Parser) runs a token-consuming
//! predicate and restores the snapshot afterwards.
//!
//! Arena state is NOT captured. Lookahead predicates must not allocate
//! nodes.

use crate::context::ParseContext;

/// A lightweight snapshot of parser state.
#[derive(Clone, Copy, Debug)]
pub struct ParserSnapshot {
    /// Position in the token stream.
    pub(crate) cursor_pos: usize,
    /// Parse context flags.
    pub(crate) context: ParseContext,
}

impl ParserSnapshot {
    #[inline]
    pub(crate) fn new(cursor_pos: usize, context: ParseContext) -> Self {
        Self {
            cursor_pos,
            context,
        }
    }
}
