//! Operator classification for the binary precedence levels.
//!
//! Each `is_*_op` recognizes the operators of one level; the level
//! functions in `expr.rs` loop over them.

use peek_ir::TokenKind;

/// `<=> == === != =~ !~`
#[inline]
pub(super) fn is_equality_op(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Cmp
            | TokenKind::EqEq
            | TokenKind::EqEqEq
            | TokenKind::NotEq
            | TokenKind::Match
            | TokenKind::NotMatch
    )
}

/// `< <= > >=`
#[inline]
pub(super) fn is_comparison_op(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Lt | TokenKind::LtEq | TokenKind::Gt | TokenKind::GtEq
    )
}

/// `| ^`
#[inline]
pub(super) fn is_bit_or_op(kind: TokenKind) -> bool {
    matches!(kind, TokenKind::Pipe | TokenKind::Caret)
}

#[inline]
pub(super) fn is_bit_and_op(kind: TokenKind) -> bool {
    kind == TokenKind::Amp
}

/// `<< >>`
#[inline]
pub(super) fn is_shift_op(kind: TokenKind) -> bool {
    matches!(kind, TokenKind::Shl | TokenKind::Shr)
}

#[inline]
pub(super) fn is_additive_op(kind: TokenKind) -> bool {
    matches!(kind, TokenKind::Plus | TokenKind::Minus)
}

/// `* / %`
#[inline]
pub(super) fn is_multiplicative_op(kind: TokenKind) -> bool {
    matches!(kind, TokenKind::Star | TokenKind::Slash | TokenKind::Percent)
}

/// Whether a token can begin an expression.
pub(super) fn starts_expression(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Integer
            | TokenKind::Float
            | TokenKind::Rational
            | TokenKind::Imaginary
            | TokenKind::Str(_)
            | TokenKind::Symbol
            | TokenKind::Ident
            | TokenKind::Constant
            | TokenKind::Ivar
            | TokenKind::Cvar
            | TokenKind::Gvar
            | TokenKind::Label
            | TokenKind::KwBegin
            | TokenKind::KwCase
            | TokenKind::KwClass
            | TokenKind::KwDef
            | TokenKind::KwDefined
            | TokenKind::KwFalse
            | TokenKind::KwFor
            | TokenKind::KwIf
            | TokenKind::KwModule
            | TokenKind::KwNil
            | TokenKind::KwNot
            | TokenKind::KwSelf
            | TokenKind::KwSuper
            | TokenKind::KwTrue
            | TokenKind::KwUnless
            | TokenKind::KwUntil
            | TokenKind::KwWhile
            | TokenKind::KwYield
            | TokenKind::KwFile
            | TokenKind::KwLine
            | TokenKind::KwEncoding
            | TokenKind::KwReturn
            | TokenKind::KwBreak
            | TokenKind::KwNext
            | TokenKind::KwRedo
            | TokenKind::KwRetry
            | TokenKind::LParen
            | TokenKind::LParenArg
            | TokenKind::LParenBeg
            | TokenKind::LBracketArray
            | TokenKind::LBraceHash
            | TokenKind::Colon3
            | TokenKind::Lambda
            | TokenKind::UPlus
            | TokenKind::UMinus
            | TokenKind::StarSplat
            | TokenKind::DStarSplat
            | TokenKind::AmpBlock
            | TokenKind::Bang
            | TokenKind::Tilde
    )
}

/// Whether a token, preceded by whitespace, starts the arguments of a
/// command call (`puts 1`, `a.b -1`, `foo *args`).
pub(super) fn starts_command_arg(kind: TokenKind) -> bool {
    match kind {
        TokenKind::LParen
        | TokenKind::LParenBeg
        | TokenKind::KwClass
        | TokenKind::KwFor
        | TokenKind::KwModule
        | TokenKind::KwNot
        | TokenKind::KwReturn
        | TokenKind::KwBreak
        | TokenKind::KwNext
        | TokenKind::KwRedo
        | TokenKind::KwRetry
        | TokenKind::LBraceHash => false,
        _ => starts_expression(kind),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_are_disjoint() {
        let levels: [fn(TokenKind) -> bool; 7] = [
            is_equality_op,
            is_comparison_op,
            is_bit_or_op,
            is_bit_and_op,
            is_shift_op,
            is_additive_op,
            is_multiplicative_op,
        ];
        let ops = [
            TokenKind::Cmp,
            TokenKind::EqEq,
            TokenKind::Lt,
            TokenKind::Pipe,
            TokenKind::Amp,
            TokenKind::Shl,
            TokenKind::Plus,
            TokenKind::Star,
        ];
        for op in ops {
            let matching = levels.iter().filter(|level| level(op)).count();
            assert_eq!(matching, 1, "{op:?} belongs to exactly one level");
        }
    }

    #[test]
    fn test_command_args_exclude_statement_keywords() {
        assert!(starts_command_arg(TokenKind::Integer));
        assert!(starts_command_arg(TokenKind::UMinus));
        assert!(starts_command_arg(TokenKind::LParenArg));
        assert!(!starts_command_arg(TokenKind::KwReturn));
        assert!(!starts_command_arg(TokenKind::LParen));
        assert!(!starts_command_arg(TokenKind::Minus));
        assert!(!starts_command_arg(TokenKind::KwDo));
    }
}
