//! Expression parsing, from `and`/`or` down to the unary operators.
//!
//! One method per precedence level, lowest first:
//! `and or` < `not` < assignment < `? :` < `.. ...` < `||` < `&&` <
//! equality < comparison < `| ^` < `&` < shifts < `+ -` < `* / %` <
//! unary minus < `**` < `! ~ +`.
//!
//! Binary operators other than `&&`/`||` are method calls: a `Send` whose
//! selector is the operator token.

use peek_ir::{IfForm, NodeId, NodeKind, NodeRange, Span, TokenKind};
use peek_stack::ensure_sufficient_stack;

use super::operators::{
    is_additive_op, is_bit_and_op, is_bit_or_op, is_comparison_op, is_equality_op,
    is_multiplicative_op, is_shift_op, starts_expression,
};
use crate::{ParseError, Parser};

type Level<'a> = fn(&mut Parser<'a>) -> Result<NodeId, ParseError>;

impl<'a> Parser<'a> {
    /// `expr and expr`, `expr or expr`
    pub(crate) fn expr(&mut self) -> Result<NodeId, ParseError> {
        let mut lhs = self.not_expr()?;
        loop {
            let and = match self.current_kind() {
                TokenKind::KwAnd => true,
                TokenKind::KwOr => false,
                _ => return Ok(lhs),
            };
            self.advance();
            self.skip_newlines();
            let rhs = self.not_expr()?;
            lhs = self.logical(and, lhs, rhs);
        }
    }

    fn not_expr(&mut self) -> Result<NodeId, ParseError> {
        if !self.check(TokenKind::KwNot) {
            return self.arg();
        }
        let keyword = self.advance();
        let operand = self.not_expr()?;
        let span = keyword.span.merge(self.span_of(operand));
        Ok(self.alloc(
            NodeKind::Send {
                recv: operand,
                selector: keyword.span,
                args: NodeRange::EMPTY,
                safe_nav: false,
            },
            span,
        ))
    }

    /// Assignment level: `a = 1`, `a += 1`, `a.b = 1`, `a[i] ||= 1`.
    pub(crate) fn arg(&mut self) -> Result<NodeId, ParseError> {
        ensure_sufficient_stack(|| self.arg_inner())
    }

    fn arg_inner(&mut self) -> Result<NodeId, ParseError> {
        let lhs = self.ternary()?;
        match self.current_kind() {
            TokenKind::Assign => {
                self.advance();
                self.assignment(lhs)
            }
            TokenKind::OpAsgn => {
                self.advance();
                let target = self.assignment_target(lhs)?;
                let value = self.assignment_value()?;
                let span = self.span_of(target).merge(self.span_of(value));
                Ok(self.alloc(NodeKind::OpAsgn { target, value }, span))
            }
            _ => Ok(lhs),
        }
    }

    /// `cond ? a : b`
    fn ternary(&mut self) -> Result<NodeId, ParseError> {
        let cond = self.range()?;
        if !self.check(TokenKind::Question) {
            return Ok(cond);
        }
        self.advance();
        self.skip_newlines();
        let then_branch = self.arg()?;
        if self.check(TokenKind::Newline)
            && self.look_ahead(|p| {
                p.skip_newlines();
                p.check(TokenKind::Colon)
            })
        {
            self.skip_newlines();
        }
        self.expect(TokenKind::Colon)?;
        self.skip_newlines();
        let else_branch = self.arg()?;
        let cond = self.as_condition(cond);
        let span = self.span_of(cond).merge(self.span_of(else_branch));
        Ok(self.alloc(
            NodeKind::If {
                cond,
                then_branch,
                else_branch,
                form: IfForm::Ternary,
            },
            span,
        ))
    }

    /// `a..b`, `a...b`, endless `a..`
    fn range(&mut self) -> Result<NodeId, ParseError> {
        let lo = self.oror()?;
        let exclusive = match self.current_kind() {
            TokenKind::DotDot => false,
            TokenKind::DotDotDot => true,
            _ => return Ok(lo),
        };
        let op = self.advance();
        let hi = if starts_expression(self.current_kind()) {
            self.oror()?
        } else {
            NodeId::INVALID
        };
        let end = if hi.is_valid() {
            self.span_of(hi)
        } else {
            op.span
        };
        let span = self.span_of(lo).merge(end);
        Ok(self.alloc(NodeKind::Range { lo, hi, exclusive }, span))
    }

    fn oror(&mut self) -> Result<NodeId, ParseError> {
        let mut lhs = self.andand()?;
        while self.eat(TokenKind::OrOr) {
            let rhs = self.andand()?;
            lhs = self.logical(false, lhs, rhs);
        }
        Ok(lhs)
    }

    fn andand(&mut self) -> Result<NodeId, ParseError> {
        let mut lhs = self.equality()?;
        while self.eat(TokenKind::AndAnd) {
            let rhs = self.equality()?;
            lhs = self.logical(true, lhs, rhs);
        }
        Ok(lhs)
    }

    fn equality(&mut self) -> Result<NodeId, ParseError> {
        self.binary_level(is_equality_op, Self::comparison)
    }

    fn comparison(&mut self) -> Result<NodeId, ParseError> {
        self.binary_level(is_comparison_op, Self::bit_or)
    }

    fn bit_or(&mut self) -> Result<NodeId, ParseError> {
        self.binary_level(is_bit_or_op, Self::bit_and)
    }

    fn bit_and(&mut self) -> Result<NodeId, ParseError> {
        self.binary_level(is_bit_and_op, Self::shift)
    }

    fn shift(&mut self) -> Result<NodeId, ParseError> {
        self.binary_level(is_shift_op, Self::additive)
    }

    fn additive(&mut self) -> Result<NodeId, ParseError> {
        self.binary_level(is_additive_op, Self::multiplicative)
    }

    fn multiplicative(&mut self) -> Result<NodeId, ParseError> {
        self.binary_level(is_multiplicative_op, Self::unary_minus)
    }

    /// Left-associative loop over one precedence level.
    fn binary_level(
        &mut self,
        is_op: fn(TokenKind) -> bool,
        next: Level<'a>,
    ) -> Result<NodeId, ParseError> {
        let mut lhs = next(self)?;
        while is_op(self.current_kind()) {
            let op = self.advance();
            let rhs = next(self)?;
            lhs = self.operator_call(lhs, op.span, rhs);
        }
        Ok(lhs)
    }

    /// `-a` (binds looser than `**`: `-a ** 2` is `-(a ** 2)`)
    fn unary_minus(&mut self) -> Result<NodeId, ParseError> {
        if !self.check(TokenKind::UMinus) {
            return self.pow();
        }
        let op = self.advance();
        let operand = self.unary_minus()?;
        Ok(self.prefix_call(op.span, operand))
    }

    /// `a ** b`, right-associative.
    fn pow(&mut self) -> Result<NodeId, ParseError> {
        let base = self.unary()?;
        if !self.check(TokenKind::Pow) {
            return Ok(base);
        }
        let op = self.advance();
        let exponent = self.unary_minus()?;
        Ok(self.operator_call(base, op.span, exponent))
    }

    /// `!a`, `~a`, `+a`
    fn unary(&mut self) -> Result<NodeId, ParseError> {
        if matches!(
            self.current_kind(),
            TokenKind::Bang | TokenKind::Tilde | TokenKind::UPlus
        ) {
            let op = self.advance();
            let operand = self.unary()?;
            return Ok(self.prefix_call(op.span, operand));
        }
        self.primary_postfix()
    }

    fn logical(&mut self, and: bool, lhs: NodeId, rhs: NodeId) -> NodeId {
        let span = self.span_of(lhs).merge(self.span_of(rhs));
        let kind = if and {
            NodeKind::And { lhs, rhs }
        } else {
            NodeKind::Or { lhs, rhs }
        };
        self.alloc(kind, span)
    }

    fn operator_call(&mut self, lhs: NodeId, selector: Span, rhs: NodeId) -> NodeId {
        let span = self.span_of(lhs).merge(self.span_of(rhs));
        let args = self.alloc_list([rhs]);
        self.alloc(
            NodeKind::Send {
                recv: lhs,
                selector,
                args,
                safe_nav: false,
            },
            span,
        )
    }

    fn prefix_call(&mut self, selector: Span, operand: NodeId) -> NodeId {
        let span = selector.merge(self.span_of(operand));
        self.alloc(
            NodeKind::Send {
                recv: operand,
                selector,
                args: NodeRange::EMPTY,
                safe_nav: false,
            },
            span,
        )
    }
}
