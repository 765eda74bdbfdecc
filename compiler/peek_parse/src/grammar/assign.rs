//! Assignment: single targets, attribute and index targets, and multiple
//! assignment (`a, *b = c`).

use peek_ir::{NodeId, NodeKind, TokenKind};
use smallvec::SmallVec;

use crate::{ParseContext, ParseError, Parser};

impl Parser<'_> {
    /// The right side of `lhs =`, with `lhs` already parsed.
    ///
    /// Attribute and index targets become the setter call itself:
    /// `a.b = v` is a call of `b=` with argument `v`, `a[i] = v` a call
    /// of `[]=` with arguments `i, v`.
    pub(crate) fn assignment(&mut self, lhs: NodeId) -> Result<NodeId, ParseError> {
        let target = self.assignment_target(lhs)?;
        let value = self.assignment_value()?;
        let span = self.span_of(target).merge(self.span_of(value));

        if let NodeKind::Send {
            recv,
            selector,
            args,
            safe_nav,
        } = self.arena.kind(target)
        {
            let mut setter_args: SmallVec<[NodeId; 4]> =
                self.arena.list(args).iter().copied().collect();
            setter_args.push(value);
            let args = self.alloc_list(setter_args);
            return Ok(self.alloc(
                NodeKind::Send {
                    recv,
                    selector,
                    args,
                    safe_nav,
                },
                span,
            ));
        }
        Ok(self.alloc(NodeKind::Asgn { target, value }, span))
    }

    /// Check that `node` can be assigned to, turning a bare method name
    /// into a local variable.
    pub(crate) fn assignment_target(&mut self, node: NodeId) -> Result<NodeId, ParseError> {
        let span = self.span_of(node);
        match self.arena.kind(node) {
            NodeKind::Lvar
            | NodeKind::Ivar
            | NodeKind::Gvar
            | NodeKind::Cvar
            | NodeKind::Const { .. } => Ok(node),
            // `a` that the lexer did not know as a local yet
            NodeKind::Send {
                recv,
                selector,
                args,
                ..
            } if !recv.is_valid() && args.is_empty() && selector == span => {
                self.arena.set_kind(node, NodeKind::Lvar);
                Ok(node)
            }
            // `a.b`, `a&.b`, `A::b`, `a[i]`
            NodeKind::Send { recv, .. } if recv.is_valid() => Ok(node),
            _ => Err(ParseError::invalid_target(span)),
        }
    }

    /// An assignment's value: one expression, or an implicit array when
    /// it starts with a splat or (outside argument lists) is followed by a
    /// comma.
    pub(crate) fn assignment_value(&mut self) -> Result<NodeId, ParseError> {
        if self.check(TokenKind::StarSplat) {
            return self.implicit_array(None);
        }
        let mut value = self.arg()?;
        while self.check(TokenKind::KwRescueMod) {
            value = self.rescue_modifier(value)?;
        }
        if !self.context.in_arg_list() && self.check(TokenKind::Comma) {
            return self.implicit_array(Some(value));
        }
        Ok(value)
    }

    /// `1, *a, 2` without brackets.
    fn implicit_array(&mut self, first: Option<NodeId>) -> Result<NodeId, ParseError> {
        let mut elems: SmallVec<[NodeId; 4]> = SmallVec::new();
        elems.extend(first);
        self.with_context(ParseContext::ARG_LIST, |p| {
            if elems.is_empty() {
                elems.push(p.list_item()?);
            }
            while p.eat(TokenKind::Comma) {
                elems.push(p.list_item()?);
            }
            Ok::<(), ParseError>(())
        })?;
        let span = self.span_of(elems[0]).merge(self.span_of(elems[elems.len() - 1]));
        let elems = self.alloc_list(elems);
        Ok(self.alloc(
            NodeKind::Array {
                elems,
                bracketed: false,
            },
            span,
        ))
    }

    /// `*a` or an expression, as an element of an unbracketed list.
    pub(crate) fn list_item(&mut self) -> Result<NodeId, ParseError> {
        if self.check(TokenKind::StarSplat) {
            let star = self.advance();
            let operand = self.arg()?;
            let span = star.span.merge(self.span_of(operand));
            return Ok(self.alloc(NodeKind::Splat(operand), span));
        }
        self.arg()
    }

    /// Whether the statement at the cursor is `targets, ... = values`.
    ///
    /// Scans the left side without allocating: only names, attribute and
    /// index targets, commas, splats and nested parentheses may precede
    /// the `=`, and at least one comma or splat must appear.
    pub(crate) fn at_multiple_assignment(&mut self) -> bool {
        if !matches!(
            self.current_kind(),
            TokenKind::Ident
                | TokenKind::Constant
                | TokenKind::Ivar
                | TokenKind::Cvar
                | TokenKind::Gvar
                | TokenKind::KwSelf
                | TokenKind::StarSplat
                | TokenKind::LParenBeg
                | TokenKind::Colon3
        ) {
            return false;
        }
        self.look_ahead(|p| {
            let mut depth = 0u32;
            let mut list = false;
            let mut after_name = false;
            loop {
                let kind = p.current_kind();
                match kind {
                    TokenKind::Ident
                    | TokenKind::Constant
                    | TokenKind::Ivar
                    | TokenKind::Cvar
                    | TokenKind::Gvar
                    | TokenKind::KwSelf => {
                        if after_name && depth == 0 {
                            return false;
                        }
                        after_name = true;
                    }
                    TokenKind::Comma | TokenKind::StarSplat | TokenKind::Star => {
                        list |= depth == 0;
                        after_name = false;
                    }
                    TokenKind::Dot | TokenKind::AndDot | TokenKind::Colon2 | TokenKind::Colon3 => {
                        after_name = false;
                    }
                    TokenKind::LParenBeg | TokenKind::LParen | TokenKind::LBracket => {
                        depth += 1;
                        after_name = false;
                    }
                    TokenKind::RParen | TokenKind::RBracket if depth > 0 => {
                        depth -= 1;
                        after_name = true;
                    }
                    TokenKind::Assign if depth == 0 => return list,
                    _ if depth > 0 && kind != TokenKind::Eof => {}
                    _ => return false,
                }
                p.advance();
            }
        })
    }

    /// `a, (b, *c), d.e = value`
    pub(crate) fn multiple_assignment(&mut self) -> Result<NodeId, ParseError> {
        let targets = self.mlhs(TokenKind::Assign)?;
        self.expect(TokenKind::Assign)?;
        let value = if self.check(TokenKind::StarSplat) {
            self.implicit_array(None)?
        } else {
            let first = self.arg()?;
            if self.check(TokenKind::Comma) {
                self.implicit_array(Some(first))?
            } else {
                first
            }
        };
        let span = self.span_of(targets).merge(self.span_of(value));
        Ok(self.alloc(NodeKind::Masgn { targets, value }, span))
    }

    /// Comma-separated assignment targets up to (not including) `until`
    /// or a closing parenthesis.
    pub(crate) fn mlhs(&mut self, until: TokenKind) -> Result<NodeId, ParseError> {
        let start = self.current_span();
        let items = self.mlhs_list(until)?;
        let span = self.span_through(start.start, &items, start);
        let items = self.alloc_list(items);
        Ok(self.alloc(NodeKind::Mlhs { items }, span))
    }

    fn mlhs_list(&mut self, until: TokenKind) -> Result<SmallVec<[NodeId; 4]>, ParseError> {
        let mut items = SmallVec::new();
        loop {
            items.push(self.mlhs_item()?);
            if !self.eat(TokenKind::Comma) {
                break;
            }
            // trailing comma: `a, = list`
            if self.check(until) || self.check(TokenKind::RParen) {
                break;
            }
        }
        Ok(items)
    }

    fn mlhs_item(&mut self) -> Result<NodeId, ParseError> {
        match self.current_kind() {
            TokenKind::StarSplat | TokenKind::Star => {
                let star = self.advance();
                if matches!(
                    self.current_kind(),
                    TokenKind::Comma | TokenKind::Assign | TokenKind::RParen | TokenKind::KwIn
                ) {
                    return Ok(self.alloc(NodeKind::Splat(NodeId::INVALID), star.span));
                }
                let target = self.mlhs_item()?;
                let span = star.span.merge(self.span_of(target));
                Ok(self.alloc(NodeKind::Splat(target), span))
            }
            TokenKind::LParenBeg | TokenKind::LParen => {
                let open = self.advance();
                let items = self.mlhs_list(TokenKind::RParen)?;
                let close = self.expect_closing(open, TokenKind::RParen)?;
                let items = self.alloc_list(items);
                Ok(self.alloc(NodeKind::Mlhs { items }, open.span.merge(close.span)))
            }
            _ => {
                let target = self.primary_postfix()?;
                self.assignment_target(target)
            }
        }
    }
}
