//! Keyword resolution.
//!
//! `lookup` returns the statement form of a keyword; the lexer swaps in
//! the modifier form via [`modifier_form`] when the keyword follows a
//! complete expression. Identifiers after `.`/`::` and method names after
//! `def` never reach this table.

use peek_ir::TokenKind;

/// Look up a reserved word by text.
///
/// Uses length-bucketing for fast rejection: all keywords are 2-12 bytes.
#[inline]
pub(crate) fn lookup(text: &str) -> Option<TokenKind> {
    let len = text.len();
    if !(2..=12).contains(&len) {
        return None;
    }

    match len {
        2 => match text {
            "do" => Some(TokenKind::KwDo),
            "if" => Some(TokenKind::KwIf),
            "in" => Some(TokenKind::KwIn),
            "or" => Some(TokenKind::KwOr),
            _ => None,
        },
        3 => match text {
            "and" => Some(TokenKind::KwAnd),
            "def" => Some(TokenKind::KwDef),
            "end" => Some(TokenKind::KwEnd),
            "END" => Some(TokenKind::KwPostExe),
            "for" => Some(TokenKind::KwFor),
            "nil" => Some(TokenKind::KwNil),
            "not" => Some(TokenKind::KwNot),
            _ => None,
        },
        4 => match text {
            "case" => Some(TokenKind::KwCase),
            "else" => Some(TokenKind::KwElse),
            "next" => Some(TokenKind::KwNext),
            "redo" => Some(TokenKind::KwRedo),
            "self" => Some(TokenKind::KwSelf),
            "then" => Some(TokenKind::KwThen),
            "true" => Some(TokenKind::KwTrue),
            "when" => Some(TokenKind::KwWhen),
            _ => None,
        },
        5 => match text {
            "alias" => Some(TokenKind::KwAlias),
            "begin" => Some(TokenKind::KwBegin),
            "BEGIN" => Some(TokenKind::KwPreExe),
            "break" => Some(TokenKind::KwBreak),
            "class" => Some(TokenKind::KwClass),
            "elsif" => Some(TokenKind::KwElsif),
            "false" => Some(TokenKind::KwFalse),
            "retry" => Some(TokenKind::KwRetry),
            "super" => Some(TokenKind::KwSuper),
            "undef" => Some(TokenKind::KwUndef),
            "until" => Some(TokenKind::KwUntil),
            "while" => Some(TokenKind::KwWhile),
            "yield" => Some(TokenKind::KwYield),
            _ => None,
        },
        6 => match text {
            "ensure" => Some(TokenKind::KwEnsure),
            "module" => Some(TokenKind::KwModule),
            "rescue" => Some(TokenKind::KwRescue),
            "return" => Some(TokenKind::KwReturn),
            "unless" => Some(TokenKind::KwUnless),
            _ => None,
        },
        8 => match text {
            "defined?" => Some(TokenKind::KwDefined),
            "__FILE__" => Some(TokenKind::KwFile),
            "__LINE__" => Some(TokenKind::KwLine),
            _ => None,
        },
        12 => match text {
            "__ENCODING__" => Some(TokenKind::KwEncoding),
            _ => None,
        },
        _ => None,
    }
}

/// The modifier form of a statement keyword, if it has one.
#[inline]
pub(crate) fn modifier_form(kind: TokenKind) -> Option<TokenKind> {
    match kind {
        TokenKind::KwIf => Some(TokenKind::KwIfMod),
        TokenKind::KwUnless => Some(TokenKind::KwUnlessMod),
        TokenKind::KwWhile => Some(TokenKind::KwWhileMod),
        TokenKind::KwUntil => Some(TokenKind::KwUntilMod),
        TokenKind::KwRescue => Some(TokenKind::KwRescueMod),
        _ => None,
    }
}
