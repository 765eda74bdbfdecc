//! Grammar productions, one file per area.
//!
//! Every production returns `Result<NodeId, ParseError>`; absent optional
//! children are `NodeId::INVALID`. Entry points that recurse through the
//! whole grammar go through `ensure_sufficient_stack`.

mod assign;
mod control;
mod defs;
mod expr;
mod operators;
mod postfix;
mod primary;

use peek_ir::{NodeId, NodeKind, Span, TokenKind};
use peek_stack::ensure_sufficient_stack;
use smallvec::SmallVec;

use crate::{ParseContext, ParseError, Parser};

/// Tokens that end a statement sequence without being part of it.
fn closes_sequence(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Eof
            | TokenKind::KwEnd
            | TokenKind::KwElse
            | TokenKind::KwElsif
            | TokenKind::KwWhen
            | TokenKind::KwIn
            | TokenKind::KwRescue
            | TokenKind::KwEnsure
            | TokenKind::RBrace
            | TokenKind::RParen
    )
}

impl Parser<'_> {
    /// Parse a whole program.
    pub(crate) fn parse_program(&mut self) -> Result<NodeId, ParseError> {
        let body = self.compstmt()?;
        if !self.is_at_end() {
            return Err(ParseError::unexpected(self.current(), "end of input"));
        }
        Ok(body)
    }

    /// A statement sequence up to a closing keyword or delimiter.
    ///
    /// Returns `INVALID` for no statements, the statement itself for one,
    /// and an implicit `Begin` for several. Statements always start in a
    /// fresh context.
    pub(crate) fn compstmt(&mut self) -> Result<NodeId, ParseError> {
        self.scoped(ParseContext::NONE, |p| {
            let mut stmts: SmallVec<[NodeId; 8]> = SmallVec::new();
            loop {
                p.skip_terms();
                if closes_sequence(p.current_kind()) {
                    break;
                }
                stmts.push(p.stmt()?);
                if !p.current_kind().is_terminator() && !closes_sequence(p.current_kind()) {
                    return Err(ParseError::unexpected(p.current(), "end of statement"));
                }
            }
            Ok(p.sequence(&stmts))
        })
    }

    /// Fold statements into one node.
    pub(crate) fn sequence(&mut self, stmts: &[NodeId]) -> NodeId {
        match stmts {
            [] => NodeId::INVALID,
            [only] => *only,
            [first, .., last] => {
                let span = self.span_of(*first).merge(self.span_of(*last));
                let stmts = self.alloc_list(stmts.iter().copied());
                self.alloc(
                    NodeKind::Begin {
                        stmts,
                        paren: false,
                    },
                    span,
                )
            }
        }
    }

    /// A statement: an expression followed by any number of modifiers.
    pub(crate) fn stmt(&mut self) -> Result<NodeId, ParseError> {
        ensure_sufficient_stack(|| self.stmt_inner())
    }

    fn stmt_inner(&mut self) -> Result<NodeId, ParseError> {
        let mut node = if self.at_multiple_assignment() {
            self.multiple_assignment()?
        } else {
            self.expr()?
        };

        loop {
            let start = self.span_of(node).start;
            node = match self.current_kind() {
                TokenKind::KwIfMod | TokenKind::KwUnlessMod => {
                    let unless = self.advance().kind == TokenKind::KwUnlessMod;
                    let cond = self.condition()?;
                    let span = Span::new(start, self.span_of(cond).end);
                    let (then_branch, else_branch) = if unless {
                        (NodeId::INVALID, node)
                    } else {
                        (node, NodeId::INVALID)
                    };
                    self.alloc(
                        NodeKind::If {
                            cond,
                            then_branch,
                            else_branch,
                            form: peek_ir::IfForm::Modifier,
                        },
                        span,
                    )
                }
                TokenKind::KwWhileMod | TokenKind::KwUntilMod => {
                    let until = self.advance().kind == TokenKind::KwUntilMod;
                    let cond = self.condition()?;
                    let span = Span::new(start, self.span_of(cond).end);
                    let post = matches!(self.arena.kind(node), NodeKind::KwBegin { .. });
                    self.alloc(
                        NodeKind::While {
                            cond,
                            body: node,
                            until,
                            post,
                        },
                        span,
                    )
                }
                TokenKind::KwRescueMod => self.rescue_modifier(node)?,
                _ => return Ok(node),
            };
        }
    }

    /// `body rescue fallback`
    pub(crate) fn rescue_modifier(&mut self, body: NodeId) -> Result<NodeId, ParseError> {
        let keyword = self.advance();
        let fallback = self.arg()?;
        let clause_span = keyword.span.merge(self.span_of(fallback));
        let clause = self.alloc(
            NodeKind::ResBody {
                classes: NodeId::INVALID,
                var: NodeId::INVALID,
                body: fallback,
            },
            clause_span,
        );
        let clauses = self.alloc_list([clause]);
        let span = self.span_of(body).merge(clause_span);
        Ok(self.alloc(
            NodeKind::Rescue {
                body,
                clauses,
                else_body: NodeId::INVALID,
                modifier: true,
            },
            span,
        ))
    }

    /// A condition: an expression where a bare regexp literal matches
    /// against the last read line.
    pub(crate) fn condition(&mut self) -> Result<NodeId, ParseError> {
        let cond = self.expr()?;
        Ok(self.as_condition(cond))
    }

    pub(crate) fn as_condition(&mut self, cond: NodeId) -> NodeId {
        if self.arena.kind(cond) == NodeKind::Str(peek_ir::StrKind::Regexp) {
            let span = self.span_of(cond);
            self.alloc(NodeKind::MatchCurrentLine(cond), span)
        } else {
            cond
        }
    }
}
