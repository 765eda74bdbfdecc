//! Keyword control flow: conditionals, loops, `case`, `begin`/`rescue`/
//! `ensure`, jumps, `yield`, `super`, `defined?` and `BEGIN`/`END`.

use peek_ir::{IfForm, NodeId, NodeKind, NodeRange, Span, Token, TokenKind};
use smallvec::SmallVec;

use super::operators::starts_expression;
use crate::{ParseContext, ParseError, Parser};

impl Parser<'_> {
    /// Skip the separator between a header and its body: newlines,
    /// semicolons, and an optional `then`.
    fn then_separator(&mut self) {
        self.skip_terms();
        if self.eat(TokenKind::KwThen) {
            self.skip_terms();
        }
    }

    /// `if c ... elsif c ... else ... end`, `unless c ... else ... end`
    pub(crate) fn if_expr(&mut self) -> Result<NodeId, ParseError> {
        let keyword = self.advance();
        let unless = keyword.kind == TokenKind::KwUnless;
        let cond = self.condition()?;
        self.then_separator();
        let body = self.compstmt()?;
        let alternative = self.if_tail(keyword)?;
        let close = self.expect_end(keyword)?;

        let (then_branch, else_branch, form) = if unless {
            (alternative, body, IfForm::Unless)
        } else {
            (body, alternative, IfForm::If)
        };
        Ok(self.alloc(
            NodeKind::If {
                cond,
                then_branch,
                else_branch,
                form,
            },
            keyword.span.merge(close.span),
        ))
    }

    /// The `elsif`/`else` part of a conditional, stopping before `end`.
    fn if_tail(&mut self, keyword: Token) -> Result<NodeId, ParseError> {
        match self.current_kind() {
            TokenKind::KwElsif if keyword.kind != TokenKind::KwUnless => {
                let elsif = self.advance();
                let cond = self.condition()?;
                self.then_separator();
                let then_branch = self.compstmt()?;
                let else_branch = self.if_tail(keyword)?;
                let span = self.span_through(
                    elsif.span.start,
                    &[cond, then_branch, else_branch],
                    elsif.span,
                );
                Ok(self.alloc(
                    NodeKind::If {
                        cond,
                        then_branch,
                        else_branch,
                        form: IfForm::Elsif,
                    },
                    span,
                ))
            }
            TokenKind::KwElse => {
                self.advance();
                self.compstmt()
            }
            _ => Ok(NodeId::INVALID),
        }
    }

    /// `while c do ... end`, `until c ... end`
    pub(crate) fn while_expr(&mut self) -> Result<NodeId, ParseError> {
        let keyword = self.advance();
        let until = keyword.kind == TokenKind::KwUntil;
        let cond = self.with_context(ParseContext::NO_DO_BLOCK, Self::condition)?;
        self.skip_terms();
        self.eat(TokenKind::KwDo);
        let body = self.compstmt()?;
        let close = self.expect_end(keyword)?;
        Ok(self.alloc(
            NodeKind::While {
                cond,
                body,
                until,
                post: false,
            },
            keyword.span.merge(close.span),
        ))
    }

    /// `case subject when a, b then ... else ... end`
    pub(crate) fn case_expr(&mut self) -> Result<NodeId, ParseError> {
        let keyword = self.advance();
        let subject = if self.current_kind().is_terminator() || self.check(TokenKind::KwWhen) {
            NodeId::INVALID
        } else {
            self.expr()?
        };
        self.skip_terms();

        let mut whens: SmallVec<[NodeId; 4]> = SmallVec::new();
        while self.check(TokenKind::KwWhen) {
            whens.push(self.when_clause()?);
        }
        if self.check(TokenKind::KwIn) {
            return Err(ParseError::unsupported(
                "`case ... in` pattern matching",
                self.current_span(),
            ));
        }
        if whens.is_empty() {
            return Err(ParseError::unexpected(self.current(), "`when`"));
        }
        let else_body = if self.eat(TokenKind::KwElse) {
            self.compstmt()?
        } else {
            NodeId::INVALID
        };
        let close = self.expect_end(keyword)?;
        let whens = self.alloc_list(whens);
        Ok(self.alloc(
            NodeKind::Case {
                subject,
                whens,
                else_body,
            },
            keyword.span.merge(close.span),
        ))
    }

    fn when_clause(&mut self) -> Result<NodeId, ParseError> {
        let keyword = self.advance();
        let conds = self.value_list()?;
        self.then_separator();
        let body = self.compstmt()?;
        let mut last: SmallVec<[NodeId; 4]> = self.arena.list(conds).iter().copied().collect();
        last.push(body);
        let span = self.span_through(keyword.span.start, &last, keyword.span);
        Ok(self.alloc(NodeKind::When { conds, body }, span))
    }

    /// `a, *b, c` where `=>` is not a hash pair: `when` conditions and
    /// `rescue` exception classes.
    fn value_list(&mut self) -> Result<NodeRange, ParseError> {
        let items = self.with_context(ParseContext::ARG_LIST, |p| {
            let mut items: SmallVec<[NodeId; 4]> = SmallVec::new();
            loop {
                items.push(p.list_item()?);
                if !p.eat(TokenKind::Comma) {
                    break;
                }
            }
            Ok::<_, ParseError>(items)
        })?;
        Ok(self.alloc_list(items))
    }

    /// `for a, b in iterable do ... end`
    pub(crate) fn for_expr(&mut self) -> Result<NodeId, ParseError> {
        let keyword = self.advance();
        let var = self.mlhs(TokenKind::KwIn)?;
        let var = match self.arena.kind(var) {
            NodeKind::Mlhs { items } if items.len() == 1 => self.arena.list(items)[0],
            _ => var,
        };
        self.expect(TokenKind::KwIn)?;
        let iter = self.with_context(ParseContext::NO_DO_BLOCK, Self::expr)?;
        self.skip_terms();
        self.eat(TokenKind::KwDo);
        let body = self.compstmt()?;
        let close = self.expect_end(keyword)?;
        Ok(self.alloc(
            NodeKind::For { var, iter, body },
            keyword.span.merge(close.span),
        ))
    }

    /// `begin ... rescue ... else ... ensure ... end`
    pub(crate) fn begin_expr(&mut self) -> Result<NodeId, ParseError> {
        let keyword = self.advance();
        let body = self.body_stmt()?;
        let close = self.expect_end(keyword)?;
        Ok(self.alloc(NodeKind::KwBegin { body }, keyword.span.merge(close.span)))
    }

    /// A statement sequence with optional `rescue`, `else` and `ensure`
    /// clauses: the body of `begin`, `def`, `class`, `module` and `do`
    /// blocks.
    pub(crate) fn body_stmt(&mut self) -> Result<NodeId, ParseError> {
        let start = self.current_span();
        let body = self.compstmt()?;

        let mut clauses: SmallVec<[NodeId; 2]> = SmallVec::new();
        while self.check(TokenKind::KwRescue) {
            clauses.push(self.rescue_clause()?);
        }
        let mut node = body;
        if !clauses.is_empty() {
            let else_body = if self.eat(TokenKind::KwElse) {
                self.compstmt()?
            } else {
                NodeId::INVALID
            };
            let mut parts: SmallVec<[NodeId; 4]> = SmallVec::new();
            parts.push(body);
            parts.extend(clauses.iter().copied());
            parts.push(else_body);
            let from = if body.is_valid() {
                self.span_of(body).start
            } else {
                self.span_of(clauses[0]).start
            };
            let span = self.span_through(from, &parts, start);
            let clauses = self.alloc_list(clauses);
            node = self.alloc(
                NodeKind::Rescue {
                    body,
                    clauses,
                    else_body,
                    modifier: false,
                },
                span,
            );
        }

        if self.check(TokenKind::KwEnsure) {
            let keyword = self.advance();
            let ensure_body = self.compstmt()?;
            let from = if node.is_valid() {
                self.span_of(node).start
            } else {
                keyword.span.start
            };
            let span = self.span_through(from, &[node, ensure_body], keyword.span);
            node = self.alloc(NodeKind::Ensure { body: node, ensure_body }, span);
        }
        Ok(node)
    }

    /// `rescue A, B => e then ...`
    fn rescue_clause(&mut self) -> Result<NodeId, ParseError> {
        let keyword = self.advance();
        let classes = if starts_expression(self.current_kind()) {
            let list = self.value_list()?;
            let items = self.arena.list(list);
            let span = self.span_of(items[0]).merge(self.span_of(items[items.len() - 1]));
            self.alloc(
                NodeKind::Array {
                    elems: list,
                    bracketed: false,
                },
                span,
            )
        } else {
            NodeId::INVALID
        };
        let var = if self.eat(TokenKind::Arrow) {
            let target = self.primary_postfix()?;
            self.assignment_target(target)?
        } else {
            NodeId::INVALID
        };
        self.then_separator();
        let body = self.compstmt()?;
        let span = self.span_through(keyword.span.start, &[classes, var, body], keyword.span);
        Ok(self.alloc(NodeKind::ResBody { classes, var, body }, span))
    }

    /// `return`, `break`, `next`, each with an optional value.
    pub(crate) fn jump(&mut self) -> Result<NodeId, ParseError> {
        let keyword = self.advance();
        let value = if starts_expression(self.current_kind()) {
            self.with_context(ParseContext::ARG_LIST, |p| {
                let first = p.call_arg()?;
                if !p.check(TokenKind::Comma) {
                    return Ok(first);
                }
                let mut elems: SmallVec<[NodeId; 4]> = SmallVec::new();
                elems.push(first);
                while p.eat(TokenKind::Comma) {
                    elems.push(p.call_arg()?);
                }
                let span = p.span_of(first).merge(p.span_of(elems[elems.len() - 1]));
                let elems = p.alloc_list(elems);
                Ok(p.alloc(
                    NodeKind::Array {
                        elems,
                        bracketed: false,
                    },
                    span,
                ))
            })?
        } else {
            NodeId::INVALID
        };
        let span = self.span_through(keyword.span.start, &[value], keyword.span);
        let kind = match keyword.kind {
            TokenKind::KwReturn => NodeKind::Return(value),
            TokenKind::KwBreak => NodeKind::Break(value),
            _ => NodeKind::Next(value),
        };
        Ok(self.alloc(kind, span))
    }

    /// `yield`, `yield(a)`, `yield a, b`
    pub(crate) fn yield_expr(&mut self) -> Result<NodeId, ParseError> {
        let keyword = self.advance();
        let (args, end) = self.keyword_args(keyword)?;
        Ok(self.alloc(NodeKind::Yield { args }, Span::new(keyword.span.start, end)))
    }

    /// `super` (forwarding the current arguments), `super()`, `super a`,
    /// each with an optional block.
    pub(crate) fn super_expr(&mut self) -> Result<NodeId, ParseError> {
        let keyword = self.advance();
        let node = if self.check(TokenKind::LParen) || self.at_command_arg() {
            let (args, end) = self.keyword_args(keyword)?;
            self.alloc(NodeKind::Super { args }, Span::new(keyword.span.start, end))
        } else {
            self.alloc(NodeKind::ZSuper, keyword.span)
        };
        self.block_suffix(node)
    }

    /// Parenthesized or command arguments after `yield` or `super`.
    fn keyword_args(&mut self, keyword: Token) -> Result<(NodeRange, u32), ParseError> {
        if self.check(TokenKind::LParen) {
            let open = self.advance();
            let (args, close) = self.delimited_list(open, TokenKind::RParen)?;
            Ok((args, close.span.end))
        } else if self.at_command_arg() {
            self.command_args()
        } else {
            Ok((NodeRange::EMPTY, keyword.span.end))
        }
    }

    /// `defined?(a)`, `defined? a`
    pub(crate) fn defined(&mut self) -> Result<NodeId, ParseError> {
        let keyword = self.advance();
        let (operand, end) = if self.check(TokenKind::LParen) {
            let open = self.advance();
            self.skip_newlines();
            let operand = self.scoped(ParseContext::NONE, Self::expr)?;
            self.skip_newlines();
            let close = self.expect_closing(open, TokenKind::RParen)?;
            (operand, close.span.end)
        } else {
            let operand = self.arg()?;
            (operand, self.span_of(operand).end)
        };
        Ok(self.alloc(
            NodeKind::Defined(operand),
            Span::new(keyword.span.start, end),
        ))
    }

    /// `BEGIN { ... }`, `END { ... }`
    pub(crate) fn exe_block(&mut self) -> Result<NodeId, ParseError> {
        let keyword = self.advance();
        let open = self.expect(TokenKind::LBrace)?;
        let body = self.compstmt()?;
        let close = self.expect_closing(open, TokenKind::RBrace)?;
        let span = keyword.span.merge(close.span);
        let kind = if keyword.kind == TokenKind::KwPreExe {
            NodeKind::Preexe(body)
        } else {
            NodeKind::Postexe(body)
        };
        Ok(self.alloc(kind, span))
    }
}
