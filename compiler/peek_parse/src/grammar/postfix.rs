//! Calls: method chains, argument lists and blocks.
//!
//! A `{` block binds to the nearest call; a `do` block binds to the
//! outermost command, so command arguments are parsed with
//! `NO_DO_BLOCK` and the block is attached once they end.

use peek_ir::{NodeId, NodeKind, NodeRange, Span, Token, TokenKind};
use smallvec::SmallVec;
use tracing::trace;

use super::operators::starts_command_arg;
use crate::{ParseContext, ParseError, Parser};

impl Parser<'_> {
    /// A primary expression followed by `.meth`, `::Name`, `[index]`.
    pub(crate) fn primary_postfix(&mut self) -> Result<NodeId, ParseError> {
        let node = self.primary()?;
        self.postfix(node)
    }

    fn postfix(&mut self, mut node: NodeId) -> Result<NodeId, ParseError> {
        loop {
            let start = self.span_of(node).start;
            node = match self.current_kind() {
                TokenKind::Dot | TokenKind::AndDot => {
                    let dot = self.advance();
                    let safe_nav = dot.kind == TokenKind::AndDot;
                    match self.current_kind() {
                        TokenKind::Ident | TokenKind::Constant => {
                            let name = self.advance();
                            self.call_rest(node, name.span, start, safe_nav)?
                        }
                        // `callable.(args)`
                        TokenKind::LParen => self.call_rest(node, dot.span, start, safe_nav)?,
                        _ => {
                            return Err(ParseError::unexpected(self.current(), "a method name"))
                        }
                    }
                }
                TokenKind::Colon2 => {
                    self.advance();
                    let name = self.current();
                    match name.kind {
                        TokenKind::Constant if !self.constant_is_call() => {
                            self.advance();
                            self.alloc(
                                NodeKind::Const { scope: node },
                                Span::new(start, name.span.end),
                            )
                        }
                        TokenKind::Ident | TokenKind::Constant => {
                            self.advance();
                            self.call_rest(node, name.span, start, false)?
                        }
                        _ => return Err(ParseError::unexpected(name, "a constant or method name")),
                    }
                }
                TokenKind::LBracket => self.index(node)?,
                _ => return Ok(node),
            };
        }
    }

    /// `recv[args]`
    fn index(&mut self, recv: NodeId) -> Result<NodeId, ParseError> {
        let open = self.advance();
        let (args, close) = self.delimited_list(open, TokenKind::RBracket)?;
        let start = self.span_of(recv).start;
        Ok(self.alloc(
            NodeKind::Send {
                recv,
                selector: open.span.merge(close.span),
                args,
                safe_nav: false,
            },
            Span::new(start, close.span.end),
        ))
    }

    /// Whether a `Constant` at the cursor is a method call rather than a
    /// constant reference: `Integer("1")`, `Integer "1"`, `Set { }`.
    pub(crate) fn constant_is_call(&self) -> bool {
        let next = self.cursor.peek_next();
        match next.kind {
            TokenKind::LParen | TokenKind::LBrace => true,
            TokenKind::KwDo => self.context.allows_do_block(),
            kind => next.flags.has_space_before() && starts_command_arg(kind),
        }
    }

    /// The arguments and block of a call whose receiver and name have been
    /// consumed.
    pub(crate) fn call_rest(
        &mut self,
        recv: NodeId,
        selector: Span,
        start: u32,
        safe_nav: bool,
    ) -> Result<NodeId, ParseError> {
        let (args, end) = if self.check(TokenKind::LParen) {
            let open = self.advance();
            let (args, close) = self.delimited_list(open, TokenKind::RParen)?;
            (args, close.span.end)
        } else if self.at_command_arg() {
            self.command_args()?
        } else {
            (NodeRange::EMPTY, selector.end)
        };
        let call = self.alloc(
            NodeKind::Send {
                recv,
                selector,
                args,
                safe_nav,
            },
            Span::new(start, end),
        );
        self.block_suffix(call)
    }

    /// Whether the current token starts the arguments of a command call.
    pub(crate) fn at_command_arg(&self) -> bool {
        let tok = self.current();
        if !tok.flags.has_space_before() || !starts_command_arg(tok.kind) {
            return false;
        }
        // `a !b` passes `!b`; `a ! b` is not an argument
        match tok.kind {
            TokenKind::Bang | TokenKind::Tilde => !self.cursor.peek_next().flags.has_space_before(),
            _ => true,
        }
    }

    /// Arguments without parentheses, up to the end of the statement.
    /// Returns the list and the end offset of the last argument.
    pub(crate) fn command_args(&mut self) -> Result<(NodeRange, u32), ParseError> {
        self.with_context(
            ParseContext::ARG_LIST.union(ParseContext::NO_DO_BLOCK),
            |p| {
                let mut items: SmallVec<[NodeId; 4]> = SmallVec::new();
                loop {
                    items.push(p.call_arg()?);
                    if !p.eat(TokenKind::Comma) {
                        break;
                    }
                }
                let end = p.span_of(items[items.len() - 1]).end;
                Ok((p.group_hash_args(&items), end))
            },
        )
    }

    /// Items between `open` and `close`, newlines allowed anywhere and a
    /// trailing comma accepted. `do` blocks bind inside.
    pub(crate) fn delimited_list(
        &mut self,
        open: Token,
        close: TokenKind,
    ) -> Result<(NodeRange, Token), ParseError> {
        self.scoped(ParseContext::ARG_LIST, |p| {
            let mut items: SmallVec<[NodeId; 4]> = SmallVec::new();
            p.skip_newlines();
            while !p.check(close) {
                items.push(p.call_arg()?);
                p.skip_newlines();
                if !p.eat(TokenKind::Comma) {
                    break;
                }
                p.skip_newlines();
            }
            let close = p.expect_closing(open, close)?;
            Ok((p.group_hash_args(&items), close))
        })
    }

    /// One argument: `*a`, `**h`, `&b`, `key: v`, `k => v`, or a value.
    pub(crate) fn call_arg(&mut self) -> Result<NodeId, ParseError> {
        match self.current_kind() {
            TokenKind::StarSplat => self.prefixed_arg(NodeKind::Splat),
            TokenKind::DStarSplat => self.prefixed_arg(NodeKind::DoubleSplat),
            TokenKind::AmpBlock => self.prefixed_arg(NodeKind::BlockPass),
            TokenKind::Label => self.label_pair(),
            _ => {
                let value = self.arg()?;
                if self.check(TokenKind::Arrow) {
                    self.arrow_pair(value)
                } else {
                    Ok(value)
                }
            }
        }
    }

    /// `*a`, `**a`, `&a`, or the anonymous forms `*`, `**`, `&`.
    fn prefixed_arg(&mut self, make: fn(NodeId) -> NodeKind) -> Result<NodeId, ParseError> {
        let op = self.advance();
        if !super::operators::starts_expression(self.current_kind()) {
            return Ok(self.alloc(make(NodeId::INVALID), op.span));
        }
        let operand = self.arg()?;
        let span = op.span.merge(self.span_of(operand));
        Ok(self.alloc(make(operand), span))
    }

    /// `key: value`, or the shorthand `key:` whose value is omitted.
    pub(crate) fn label_pair(&mut self) -> Result<NodeId, ParseError> {
        let label = self.advance();
        let key = self.alloc(NodeKind::Sym, label.span);
        if matches!(
            self.current_kind(),
            TokenKind::Comma | TokenKind::RParen | TokenKind::RBrace | TokenKind::RBracket
        ) || self.current_kind().is_terminator()
        {
            return Ok(self.alloc(
                NodeKind::Pair {
                    key,
                    value: NodeId::INVALID,
                },
                label.span,
            ));
        }
        let value = self.arg()?;
        let span = label.span.merge(self.span_of(value));
        Ok(self.alloc(NodeKind::Pair { key, value }, span))
    }

    /// `key => value` with `key` already parsed.
    pub(crate) fn arrow_pair(&mut self, key: NodeId) -> Result<NodeId, ParseError> {
        self.expect(TokenKind::Arrow)?;
        self.skip_newlines();
        let value = self.arg()?;
        let span = self.span_of(key).merge(self.span_of(value));
        Ok(self.alloc(NodeKind::Pair { key, value }, span))
    }

    /// Collect runs of pairs and double splats into brace-less hashes.
    fn group_hash_args(&mut self, items: &[NodeId]) -> NodeRange {
        let mut grouped: SmallVec<[NodeId; 4]> = SmallVec::new();
        let mut run_start = None;
        for (i, &item) in items.iter().enumerate() {
            let in_hash = matches!(
                self.arena.kind(item),
                NodeKind::Pair { .. } | NodeKind::DoubleSplat(_)
            );
            match (in_hash, run_start) {
                (true, None) => run_start = Some(i),
                (false, Some(start)) => {
                    grouped.push(self.bare_hash(&items[start..i]));
                    run_start = None;
                    grouped.push(item);
                }
                (true, Some(_)) => {}
                (false, None) => grouped.push(item),
            }
        }
        if let Some(start) = run_start {
            grouped.push(self.bare_hash(&items[start..]));
        }
        self.alloc_list(grouped)
    }

    fn bare_hash(&mut self, pairs: &[NodeId]) -> NodeId {
        let span = self.span_of(pairs[0]).merge(self.span_of(pairs[pairs.len() - 1]));
        let pairs = self.alloc_list(pairs.iter().copied());
        self.alloc(
            NodeKind::Hash {
                pairs,
                braces: false,
            },
            span,
        )
    }

    /// Attach a `{ }` block, or a `do ... end` block where allowed.
    pub(crate) fn block_suffix(&mut self, call: NodeId) -> Result<NodeId, ParseError> {
        match self.current_kind() {
            TokenKind::LBrace => {
                let open = self.advance();
                let params = self.block_params()?;
                let body = self.compstmt()?;
                let close = self.expect_closing(open, TokenKind::RBrace)?;
                Ok(self.block(call, params, body, close))
            }
            TokenKind::KwDo if self.context.allows_do_block() => {
                let keyword = self.advance();
                let params = self.block_params()?;
                let body = self.body_stmt()?;
                let close = self.expect_end(keyword)?;
                Ok(self.block(call, params, body, close))
            }
            _ => Ok(call),
        }
    }

    pub(crate) fn block(
        &mut self,
        call: NodeId,
        params: NodeId,
        body: NodeId,
        close: Token,
    ) -> NodeId {
        let span = self.span_of(call).merge(close.span);
        trace!(start = span.start, end = span.end, "block");
        self.alloc(NodeKind::Block { call, params, body }, span)
    }

    /// `|a, (b, c), *d|`: skipped, kept only as a span.
    fn block_params(&mut self) -> Result<NodeId, ParseError> {
        self.skip_newlines();
        if !self.check(TokenKind::Pipe) {
            return Ok(NodeId::INVALID);
        }
        let open = self.advance();
        while !self.check(TokenKind::Pipe) {
            if self.is_at_end() {
                return Err(ParseError::unclosed(open, self.current()));
            }
            self.advance();
        }
        let close = self.advance();
        Ok(self.alloc(NodeKind::Params, open.span.merge(close.span)))
    }
}
