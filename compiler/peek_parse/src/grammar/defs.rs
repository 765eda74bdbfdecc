//! Definitions: `def`, `class`, `module`, `alias` and `undef`.
//!
//! Parameter lists are skipped as token runs and kept only as a `Params`
//! span; nothing downstream looks inside them.

use peek_ir::{NodeId, NodeKind, NodeRange, StrKind, Token, TokenKind};

use crate::{ParseError, Parser};

/// Tokens that can name a method in `alias` and `undef`.
fn is_method_name(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Ident
            | TokenKind::Constant
            | TokenKind::MethodName
            | TokenKind::Symbol
            | TokenKind::Str(StrKind::Symbol)
    )
}

impl Parser<'_> {
    /// `def name(params) body end`, `def recv.name ...`, `def name = value`
    pub(crate) fn def(&mut self) -> Result<NodeId, ParseError> {
        let keyword = self.advance();
        let singleton = self.def_receiver()?;

        let name = self.current();
        if !matches!(
            name.kind,
            TokenKind::Ident | TokenKind::Constant | TokenKind::MethodName
        ) {
            return Err(ParseError::invalid_def(keyword, name));
        }
        self.advance();

        let params = self.def_params()?;

        if self.eat(TokenKind::Assign) {
            self.skip_newlines();
            let mut body = self.arg()?;
            while self.check(TokenKind::KwRescueMod) {
                body = self.rescue_modifier(body)?;
            }
            let span = keyword.span.merge(self.span_of(body));
            return Ok(self.alloc(
                NodeKind::Def {
                    singleton,
                    params,
                    body,
                },
                span,
            ));
        }

        let body = self.body_stmt()?;
        let close = self.expect_end(keyword)?;
        Ok(self.alloc(
            NodeKind::Def {
                singleton,
                params,
                body,
            },
            keyword.span.merge(close.span),
        ))
    }

    /// The `recv.` of a singleton method definition, if present.
    fn def_receiver(&mut self) -> Result<NodeId, ParseError> {
        if self.peek_kind_at(1) != TokenKind::Dot {
            return Ok(NodeId::INVALID);
        }
        let recv = self.current();
        let kind = match recv.kind {
            TokenKind::KwSelf => NodeKind::SelfRef,
            TokenKind::Constant => NodeKind::Const {
                scope: NodeId::INVALID,
            },
            TokenKind::Ident if recv.flags.is_local_var() => NodeKind::Lvar,
            TokenKind::Ident => NodeKind::Send {
                recv: NodeId::INVALID,
                selector: recv.span,
                args: NodeRange::EMPTY,
                safe_nav: false,
            },
            _ => return Ok(NodeId::INVALID),
        };
        self.advance();
        self.expect(TokenKind::Dot)?;
        Ok(self.alloc(kind, recv.span))
    }

    /// `(a, b = 1)` or `a, b` up to the end of the line.
    fn def_params(&mut self) -> Result<NodeId, ParseError> {
        let start = self.current_span();
        let end = match self.current_kind() {
            TokenKind::LParen | TokenKind::LParenArg | TokenKind::LParenBeg => {
                self.skip_balanced()?
            }
            kind if kind.is_terminator() || kind == TokenKind::Assign => {
                return Ok(NodeId::INVALID);
            }
            _ => {
                let mut end = start;
                while !self.current_kind().is_terminator() {
                    end = match self.current_kind() {
                        TokenKind::LParen
                        | TokenKind::LParenArg
                        | TokenKind::LParenBeg
                        | TokenKind::LBracket
                        | TokenKind::LBracketArray
                        | TokenKind::LBrace
                        | TokenKind::LBraceHash => self.skip_balanced()?,
                        _ => self.advance().span,
                    };
                }
                end
            }
        };
        Ok(self.alloc(NodeKind::Params, start.merge(end)))
    }

    /// `class Path < Super ... end`, `class << target ... end`
    pub(crate) fn class(&mut self) -> Result<NodeId, ParseError> {
        let keyword = self.advance();
        if self.eat(TokenKind::Shl) {
            let target = self.expr()?;
            self.skip_terms();
            let body = self.body_stmt()?;
            let close = self.expect_end(keyword)?;
            return Ok(self.alloc(
                NodeKind::SClass { target, body },
                keyword.span.merge(close.span),
            ));
        }

        let path = self.definition_path("a class name")?;
        let superclass = if self.eat(TokenKind::Lt) {
            self.arg()?
        } else {
            NodeId::INVALID
        };
        let body = self.body_stmt()?;
        let close = self.expect_end(keyword)?;
        Ok(self.alloc(
            NodeKind::Class {
                path,
                superclass,
                body,
            },
            keyword.span.merge(close.span),
        ))
    }

    /// `module Path ... end`
    pub(crate) fn module(&mut self) -> Result<NodeId, ParseError> {
        let keyword = self.advance();
        let path = self.definition_path("a module name")?;
        let body = self.body_stmt()?;
        let close = self.expect_end(keyword)?;
        Ok(self.alloc(
            NodeKind::Module { path, body },
            keyword.span.merge(close.span),
        ))
    }

    /// `A`, `A::B`, `::A`
    fn definition_path(&mut self, what: &str) -> Result<NodeId, ParseError> {
        if !matches!(
            self.current_kind(),
            TokenKind::Constant | TokenKind::Colon3
        ) {
            return Err(ParseError::expected_name(self.current(), what));
        }
        self.primary_postfix()
    }

    /// `alias new old`, `alias $new $old`
    pub(crate) fn alias(&mut self) -> Result<NodeId, ParseError> {
        let keyword = self.advance();
        let globals = self.check(TokenKind::Gvar);
        self.alias_name(globals)?;
        let last = self.alias_name(globals)?;
        Ok(self.alloc(NodeKind::Alias, keyword.span.merge(last.span)))
    }

    fn alias_name(&mut self, globals: bool) -> Result<Token, ParseError> {
        let tok = self.current();
        let ok = if globals {
            tok.kind == TokenKind::Gvar
        } else {
            is_method_name(tok.kind)
        };
        if !ok {
            let what = if globals {
                "a global variable"
            } else {
                "a method name"
            };
            return Err(ParseError::expected_name(tok, what));
        }
        Ok(self.advance())
    }

    /// `undef a, :b, +`
    pub(crate) fn undef(&mut self) -> Result<NodeId, ParseError> {
        let keyword = self.advance();
        let mut end = self.alias_name(false)?.span;
        while self.eat(TokenKind::Comma) {
            end = self.alias_name(false)?.span;
        }
        Ok(self.alloc(NodeKind::Undef, keyword.span.merge(end)))
    }
}
