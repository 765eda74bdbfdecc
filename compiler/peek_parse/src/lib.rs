//! Recursive descent parser for the wrapped language.
//!
//! Produces a flat syntax tree in a [`NodeArena`] whose node spans follow
//! the usual expression-range conventions: a call spans its receiver to its
//! last argument or closing delimiter, a block spans its call to the closing
//! `}` or `end`, a modifier form spans its body to its condition, and a
//! heredoc spans its `<<TAG` opener only.
//!
//! The lexer has already resolved every whitespace-sensitive ambiguity, so
//! the grammar works on token kinds alone. Parsing stops at the first
//! error.

mod context;
mod cursor;
mod error;
mod grammar;
mod snapshot;

pub use context::ParseContext;
pub use cursor::Cursor;
pub use error::ParseError;

use peek_ir::{Node, NodeArena, NodeId, NodeKind, NodeRange, Span, Token, TokenKind};
use peek_lexer::LexOutput;
use snapshot::ParserSnapshot;
use tracing::debug;

/// A parsed program.
#[derive(Clone, Debug)]
pub struct ParseOutput {
    pub arena: NodeArena,
    /// Top-level node: the only statement, an implicit `Begin` sequence of
    /// several, or `INVALID` for a program without statements.
    pub root: NodeId,
}

impl ParseOutput {
    /// Get a node by id.
    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        self.arena.get(id)
    }
}

/// Parse the tokens of a lexed source.
///
/// Lexical errors are not inspected here; callers report them first.
#[tracing::instrument(level = "debug", skip_all, fields(tokens = lexed.tokens.len()))]
pub fn parse(lexed: &LexOutput) -> Result<ParseOutput, ParseError> {
    let mut parser = Parser::new(&lexed.tokens);
    let root = parser.parse_program()?;
    debug!(nodes = parser.arena.len(), root = ?root, "parsed");
    Ok(ParseOutput {
        arena: parser.arena,
        root,
    })
}

/// Parser state.
pub(crate) struct Parser<'a> {
    cursor: Cursor<'a>,
    arena: NodeArena,
    context: ParseContext,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Parser {
            cursor: Cursor::new(tokens),
            arena: NodeArena::with_capacity(tokens.len()),
            context: ParseContext::new(),
        }
    }

    // Cursor delegation

    #[inline]
    fn current(&self) -> Token {
        self.cursor.current()
    }

    #[inline]
    fn current_kind(&self) -> TokenKind {
        self.cursor.current_kind()
    }

    #[inline]
    fn current_span(&self) -> Span {
        self.cursor.current_span()
    }

    #[inline]
    fn is_at_end(&self) -> bool {
        self.cursor.is_at_end()
    }

    #[inline]
    fn check(&self, kind: TokenKind) -> bool {
        self.cursor.check(kind)
    }

    #[inline]
    fn peek_kind_at(&self, n: usize) -> TokenKind {
        self.cursor.peek_kind_at(n)
    }

    #[inline]
    fn advance(&mut self) -> Token {
        self.cursor.advance()
    }

    #[inline]
    fn eat(&mut self, kind: TokenKind) -> bool {
        self.cursor.eat(kind)
    }

    #[inline]
    fn expect(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        self.cursor.expect(kind)
    }

    #[inline]
    fn skip_newlines(&mut self) {
        self.cursor.skip_newlines();
    }

    #[inline]
    fn skip_terms(&mut self) {
        self.cursor.skip_terms();
    }

    /// Consume the closing delimiter matching `open`.
    fn expect_closing(&mut self, open: Token, close: TokenKind) -> Result<Token, ParseError> {
        if self.check(close) {
            Ok(self.advance())
        } else {
            Err(ParseError::unclosed(open, self.current()))
        }
    }

    /// Consume the `end` closing the construct opened by `keyword`.
    fn expect_end(&mut self, keyword: Token) -> Result<Token, ParseError> {
        if self.check(TokenKind::KwEnd) {
            Ok(self.advance())
        } else {
            Err(ParseError::missing_end(keyword, self.current()))
        }
    }

    // Context and lookahead

    /// Run `f` with the context replaced by `context`.
    fn scoped<T>(&mut self, context: ParseContext, f: impl FnOnce(&mut Self) -> T) -> T {
        let saved = self.context;
        self.context = context;
        let result = f(self);
        self.context = saved;
        result
    }

    /// Run `f` with `flag` added to the current context.
    fn with_context<T>(&mut self, flag: ParseContext, f: impl FnOnce(&mut Self) -> T) -> T {
        self.scoped(self.context.with(flag), f)
    }

    fn snapshot(&self) -> ParserSnapshot {
        ParserSnapshot::new(self.cursor.position(), self.context)
    }

    fn restore(&mut self, snapshot: ParserSnapshot) {
        self.cursor.set_position(snapshot.cursor_pos);
        self.context = snapshot.context;
    }

    /// Run a token-consuming predicate, then rewind.
    fn look_ahead<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let snapshot = self.snapshot();
        let result = f(self);
        self.restore(snapshot);
        result
    }

    // Arena helpers

    #[inline]
    fn alloc(&mut self, kind: NodeKind, span: Span) -> NodeId {
        self.arena.alloc(kind, span)
    }

    #[inline]
    fn alloc_list(&mut self, ids: impl IntoIterator<Item = NodeId>) -> NodeRange {
        self.arena.alloc_list(ids)
    }

    #[inline]
    fn span_of(&self, id: NodeId) -> Span {
        self.arena.span(id)
    }

    /// Span from `start` to the end of the last valid node in `ids`, or
    /// `fallback` when none is valid.
    fn span_through(&self, start: u32, ids: &[NodeId], fallback: Span) -> Span {
        match ids.iter().rev().find(|id| id.is_valid()) {
            Some(&last) => Span::new(start, self.span_of(last).end),
            None => Span::new(start, fallback.end.max(start)),
        }
    }
}
