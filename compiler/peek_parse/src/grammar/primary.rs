//! Primary expressions: literals, variables, identifiers and constants,
//! parenthesized sequences, array and hash literals, lambdas.

use peek_ir::{NodeId, NodeKind, Span, StrKind, TokenKind};
use peek_stack::ensure_sufficient_stack;
use smallvec::SmallVec;

use crate::{ParseContext, ParseError, Parser};

impl Parser<'_> {
    pub(crate) fn primary(&mut self) -> Result<NodeId, ParseError> {
        ensure_sufficient_stack(|| self.primary_inner())
    }

    fn primary_inner(&mut self) -> Result<NodeId, ParseError> {
        let tok = self.current();
        let atom = match tok.kind {
            TokenKind::Integer => NodeKind::Int,
            TokenKind::Float => NodeKind::Float,
            TokenKind::Rational => NodeKind::Rational,
            TokenKind::Imaginary => NodeKind::Complex,
            TokenKind::Symbol => NodeKind::Sym,
            TokenKind::Ivar => NodeKind::Ivar,
            TokenKind::Cvar => NodeKind::Cvar,
            TokenKind::Gvar => NodeKind::Gvar,
            TokenKind::KwNil => NodeKind::Nil,
            TokenKind::KwTrue => NodeKind::True,
            TokenKind::KwFalse => NodeKind::False,
            TokenKind::KwSelf => NodeKind::SelfRef,
            TokenKind::KwFile => NodeKind::File,
            TokenKind::KwLine => NodeKind::Line,
            TokenKind::KwEncoding => NodeKind::Encoding,
            TokenKind::KwRedo => NodeKind::Redo,
            TokenKind::KwRetry => NodeKind::Retry,

            TokenKind::Str(kind) => return Ok(self.string(kind)),
            TokenKind::Ident => return self.identifier(),
            TokenKind::Constant => return self.constant(),
            TokenKind::Colon3 => return self.top_constant(),
            TokenKind::LParen | TokenKind::LParenArg | TokenKind::LParenBeg => {
                return self.paren();
            }
            TokenKind::LBracketArray => return self.array_literal(),
            TokenKind::LBraceHash => return self.hash_literal(),
            TokenKind::Lambda => return self.lambda(),
            TokenKind::Label => return self.label_pair(),
            TokenKind::KwNot => return self.expr(),

            TokenKind::KwIf | TokenKind::KwUnless => return self.if_expr(),
            TokenKind::KwWhile | TokenKind::KwUntil => return self.while_expr(),
            TokenKind::KwCase => return self.case_expr(),
            TokenKind::KwFor => return self.for_expr(),
            TokenKind::KwBegin => return self.begin_expr(),
            TokenKind::KwReturn | TokenKind::KwBreak | TokenKind::KwNext => {
                return self.jump();
            }
            TokenKind::KwYield => return self.yield_expr(),
            TokenKind::KwSuper => return self.super_expr(),
            TokenKind::KwDefined => return self.defined(),
            TokenKind::KwPreExe | TokenKind::KwPostExe => return self.exe_block(),

            TokenKind::KwDef => return self.def(),
            TokenKind::KwClass => return self.class(),
            TokenKind::KwModule => return self.module(),
            TokenKind::KwAlias => return self.alias(),
            TokenKind::KwUndef => return self.undef(),

            _ => return Err(ParseError::expected_expression(tok)),
        };
        self.advance();
        Ok(self.alloc(atom, tok.span))
    }

    /// A string-like literal. Adjacent plain and interpolated strings
    /// concatenate into one literal: `"a" 'b'`.
    fn string(&mut self, kind: StrKind) -> NodeId {
        let first = self.advance();
        let mut span = first.span;
        let mut kind = kind;
        if matches!(kind, StrKind::Plain | StrKind::Interpolated) {
            while let TokenKind::Str(next @ (StrKind::Plain | StrKind::Interpolated)) =
                self.current_kind()
            {
                span = span.merge(self.advance().span);
                if next == StrKind::Interpolated {
                    kind = StrKind::Interpolated;
                }
            }
        }
        self.alloc(NodeKind::Str(kind), span)
    }

    /// A local variable, or a call with an implicit `self` receiver.
    fn identifier(&mut self) -> Result<NodeId, ParseError> {
        let name = self.advance();
        if name.flags.is_local_var() && !self.check(TokenKind::LParen) {
            return Ok(self.alloc(NodeKind::Lvar, name.span));
        }
        self.call_rest(NodeId::INVALID, name.span, name.span.start, false)
    }

    fn constant(&mut self) -> Result<NodeId, ParseError> {
        if self.constant_is_call() {
            let name = self.advance();
            return self.call_rest(NodeId::INVALID, name.span, name.span.start, false);
        }
        let name = self.advance();
        Ok(self.alloc(
            NodeKind::Const {
                scope: NodeId::INVALID,
            },
            name.span,
        ))
    }

    /// `::Name`
    fn top_constant(&mut self) -> Result<NodeId, ParseError> {
        let colons = self.advance();
        let name = self.current();
        if name.kind != TokenKind::Constant {
            return Err(ParseError::unexpected(name, "a constant"));
        }
        self.advance();
        let scope = self.alloc(NodeKind::Cbase, colons.span);
        Ok(self.alloc(NodeKind::Const { scope }, colons.span.merge(name.span)))
    }

    /// `( stmts )`
    fn paren(&mut self) -> Result<NodeId, ParseError> {
        let open = self.advance();
        let body = self.compstmt()?;
        let close = self.expect_closing(open, TokenKind::RParen)?;
        let stmts = match self.arena.try_get(body).map(|node| node.kind) {
            None => peek_ir::NodeRange::EMPTY,
            Some(NodeKind::Begin {
                stmts,
                paren: false,
            }) => stmts,
            Some(_) => self.alloc_list([body]),
        };
        Ok(self.alloc(
            NodeKind::Begin { stmts, paren: true },
            open.span.merge(close.span),
        ))
    }

    /// `[a, *b, c: 1]`
    fn array_literal(&mut self) -> Result<NodeId, ParseError> {
        let open = self.advance();
        let (elems, close) = self.delimited_list(open, TokenKind::RBracket)?;
        Ok(self.alloc(
            NodeKind::Array {
                elems,
                bracketed: true,
            },
            open.span.merge(close.span),
        ))
    }

    /// `{k => v, k: v, **h}`
    fn hash_literal(&mut self) -> Result<NodeId, ParseError> {
        let open = self.advance();
        let mut pairs: SmallVec<[NodeId; 4]> = SmallVec::new();
        self.scoped(ParseContext::ARG_LIST, |p| {
            p.skip_newlines();
            while !p.check(TokenKind::RBrace) {
                let pair = match p.current_kind() {
                    TokenKind::Label => p.label_pair()?,
                    TokenKind::DStarSplat => {
                        let op = p.advance();
                        let operand = p.arg()?;
                        let span = op.span.merge(p.span_of(operand));
                        p.alloc(NodeKind::DoubleSplat(operand), span)
                    }
                    _ => {
                        let key = p.arg()?;
                        p.arrow_pair(key)?
                    }
                };
                pairs.push(pair);
                p.skip_newlines();
                if !p.eat(TokenKind::Comma) {
                    break;
                }
                p.skip_newlines();
            }
            Ok::<(), ParseError>(())
        })?;
        let close = self.expect_closing(open, TokenKind::RBrace)?;
        let pairs = self.alloc_list(pairs);
        Ok(self.alloc(
            NodeKind::Hash {
                pairs,
                braces: true,
            },
            open.span.merge(close.span),
        ))
    }

    /// `->(a) { body }`, `-> a do body end`
    fn lambda(&mut self) -> Result<NodeId, ParseError> {
        let arrow = self.advance();
        let lambda = self.alloc(NodeKind::Lambda, arrow.span);

        let params_start = self.current_span();
        let mut params_end = None;
        while !matches!(
            self.current_kind(),
            TokenKind::LBrace | TokenKind::KwDo | TokenKind::Eof
        ) {
            if matches!(
                self.current_kind(),
                TokenKind::LParen | TokenKind::LParenArg | TokenKind::LParenBeg
            ) {
                params_end = Some(self.skip_balanced()?);
            } else {
                params_end = Some(self.advance().span);
            }
        }
        let params = match params_end {
            Some(end) => self.alloc(NodeKind::Params, params_start.merge(end)),
            None => NodeId::INVALID,
        };

        let open = self.current();
        let (body, close) = match open.kind {
            TokenKind::LBrace => {
                self.advance();
                let body = self.compstmt()?;
                (body, self.expect_closing(open, TokenKind::RBrace)?)
            }
            TokenKind::KwDo => {
                self.advance();
                let body = self.body_stmt()?;
                (body, self.expect_end(open)?)
            }
            _ => return Err(ParseError::unexpected(open, "a lambda body")),
        };
        Ok(self.block(lambda, params, body, close))
    }

    /// Skip a parenthesized token run, nested brackets included. Returns
    /// the span of the closing parenthesis.
    pub(crate) fn skip_balanced(&mut self) -> Result<Span, ParseError> {
        let open = self.advance();
        let mut depth = 1u32;
        loop {
            let tok = self.advance();
            match tok.kind {
                TokenKind::LParen
                | TokenKind::LParenArg
                | TokenKind::LParenBeg
                | TokenKind::LBracket
                | TokenKind::LBracketArray
                | TokenKind::LBrace
                | TokenKind::LBraceHash => depth += 1,
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(tok.span);
                    }
                }
                TokenKind::Eof => return Err(ParseError::unclosed(open, tok)),
                _ => {}
            }
        }
    }
}
