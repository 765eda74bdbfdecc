//! Tokens produced by the lexer.
//!
//! Token kinds already encode the lexer's whitespace- and state-sensitive
//! decisions (unary vs. binary minus, array vs. index bracket, hash vs.
//! block brace, statement vs. modifier `if`), so the parser never has to
//! look at raw bytes.

use bitflags::bitflags;

use crate::Span;

/// Flavour of a string-like literal token.
///
/// All of these are scanned as one token, delimiters included. Interpolated
/// code is skipped over, never tokenized for the parser.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum StrKind {
    /// `'a'`, `%q(a)`: no interpolation.
    Plain,
    /// `"a"`, `%Q(a)`, `%(a)`: may interpolate.
    Interpolated,
    /// `` `ls` ``, `%x(ls)`.
    Shell,
    /// `/a/i`, `%r{a}`.
    Regexp,
    /// `:"a"`, `:'a'`, `%s(a)`.
    Symbol,
    /// `?a`, `?\C-a`.
    Char,
    /// `%w[]`, `%W[]`, `%i[]`, `%I[]`.
    Words,
    /// `<<A`, `<<-A`, `<<~A`: the span covers the opener only.
    Heredoc,
}

/// Token kind.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // === Literals ===
    Integer,
    Float,
    Rational,
    Imaginary,
    Str(StrKind),
    /// `:name`, `:+`, `:[]=`.
    Symbol,

    // === Names ===
    Ident,
    Constant,
    Ivar,
    Cvar,
    /// `$a`, `$!`, `$1`.
    Gvar,
    /// `name:` in hashes, keyword arguments and parameters.
    Label,
    /// Operator method name after `def`, `alias` or `undef` (`==`, `[]=`, `-@`).
    MethodName,

    // === Keywords ===
    KwAlias,
    KwAnd,
    KwBegin,
    /// `BEGIN`
    KwPreExe,
    KwBreak,
    KwCase,
    KwClass,
    KwDef,
    KwDefined,
    KwDo,
    KwElse,
    KwElsif,
    KwEnd,
    /// `END`
    KwPostExe,
    KwEnsure,
    KwFalse,
    KwFor,
    KwIf,
    KwIfMod,
    KwIn,
    KwModule,
    KwNext,
    KwNil,
    KwNot,
    KwOr,
    KwRedo,
    KwRescue,
    KwRescueMod,
    KwRetry,
    KwReturn,
    KwSelf,
    KwSuper,
    KwThen,
    KwTrue,
    KwUndef,
    KwUnless,
    KwUnlessMod,
    KwUntil,
    KwUntilMod,
    KwWhen,
    KwWhile,
    KwWhileMod,
    KwYield,
    /// `__FILE__`
    KwFile,
    /// `__LINE__`
    KwLine,
    /// `__ENCODING__`
    KwEncoding,

    // === Delimiters ===
    /// `(` directly after a method name: call arguments.
    LParen,
    /// `(` after a method name and a space: `a (1)`.
    LParenArg,
    /// `(` at expression start: grouping.
    LParenBeg,
    RParen,
    /// `[` after a value: indexing.
    LBracket,
    /// `[` at expression start: array literal.
    LBracketArray,
    RBracket,
    /// `{` after a call: block.
    LBrace,
    /// `{` at expression start: hash literal.
    LBraceHash,
    RBrace,

    // === Punctuation ===
    Comma,
    Semi,
    Newline,
    Dot,
    /// `&.`
    AndDot,
    /// `::` after a value.
    Colon2,
    /// `::` at expression start.
    Colon3,
    /// Ternary `:`.
    Colon,
    /// Ternary `?`.
    Question,
    /// `=>`
    Arrow,
    /// `->`
    Lambda,
    DotDot,
    DotDotDot,
    Assign,
    /// `+=`, `||=`, `<<=` and friends.
    OpAsgn,

    // === Operators ===
    Plus,
    Minus,
    Star,
    Pow,
    Slash,
    Percent,
    UPlus,
    UMinus,
    /// Prefix `*`.
    StarSplat,
    /// Prefix `**`.
    DStarSplat,
    /// Prefix `&`.
    AmpBlock,
    Bang,
    Tilde,
    Amp,
    Pipe,
    Caret,
    Shl,
    Shr,
    AndAnd,
    OrOr,
    Lt,
    LtEq,
    Gt,
    GtEq,
    EqEq,
    EqEqEq,
    NotEq,
    /// `=~`
    Match,
    /// `!~`
    NotMatch,
    /// `<=>`
    Cmp,

    Eof,
}

impl TokenKind {
    /// Human-readable name used in diagnostics.
    pub fn display_name(self) -> &'static str {
        match self {
            TokenKind::Integer => "integer",
            TokenKind::Float => "float",
            TokenKind::Rational => "rational",
            TokenKind::Imaginary => "imaginary",
            TokenKind::Str(StrKind::Heredoc) => "heredoc",
            TokenKind::Str(StrKind::Regexp) => "regexp",
            TokenKind::Str(_) => "string",
            TokenKind::Symbol => "symbol",
            TokenKind::Ident => "identifier",
            TokenKind::Constant => "constant",
            TokenKind::Ivar => "instance variable",
            TokenKind::Cvar => "class variable",
            TokenKind::Gvar => "global variable",
            TokenKind::Label => "label",
            TokenKind::MethodName => "method name",
            TokenKind::KwAlias => "alias",
            TokenKind::KwAnd => "and",
            TokenKind::KwBegin => "begin",
            TokenKind::KwPreExe => "BEGIN",
            TokenKind::KwBreak => "break",
            TokenKind::KwCase => "case",
            TokenKind::KwClass => "class",
            TokenKind::KwDef => "def",
            TokenKind::KwDefined => "defined?",
            TokenKind::KwDo => "do",
            TokenKind::KwElse => "else",
            TokenKind::KwElsif => "elsif",
            TokenKind::KwEnd => "end",
            TokenKind::KwPostExe => "END",
            TokenKind::KwEnsure => "ensure",
            TokenKind::KwFalse => "false",
            TokenKind::KwFor => "for",
            TokenKind::KwIf | TokenKind::KwIfMod => "if",
            TokenKind::KwIn => "in",
            TokenKind::KwModule => "module",
            TokenKind::KwNext => "next",
            TokenKind::KwNil => "nil",
            TokenKind::KwNot => "not",
            TokenKind::KwOr => "or",
            TokenKind::KwRedo => "redo",
            TokenKind::KwRescue | TokenKind::KwRescueMod => "rescue",
            TokenKind::KwRetry => "retry",
            TokenKind::KwReturn => "return",
            TokenKind::KwSelf => "self",
            TokenKind::KwSuper => "super",
            TokenKind::KwThen => "then",
            TokenKind::KwTrue => "true",
            TokenKind::KwUndef => "undef",
            TokenKind::KwUnless | TokenKind::KwUnlessMod => "unless",
            TokenKind::KwUntil | TokenKind::KwUntilMod => "until",
            TokenKind::KwWhen => "when",
            TokenKind::KwWhile | TokenKind::KwWhileMod => "while",
            TokenKind::KwYield => "yield",
            TokenKind::KwFile => "__FILE__",
            TokenKind::KwLine => "__LINE__",
            TokenKind::KwEncoding => "__ENCODING__",
            TokenKind::LParen | TokenKind::LParenArg | TokenKind::LParenBeg => "(",
            TokenKind::RParen => ")",
            TokenKind::LBracket | TokenKind::LBracketArray => "[",
            TokenKind::RBracket => "]",
            TokenKind::LBrace | TokenKind::LBraceHash => "{",
            TokenKind::RBrace => "}",
            TokenKind::Comma => ",",
            TokenKind::Semi => ";",
            TokenKind::Newline => "newline",
            TokenKind::Dot => ".",
            TokenKind::AndDot => "&.",
            TokenKind::Colon2 | TokenKind::Colon3 => "::",
            TokenKind::Colon => ":",
            TokenKind::Question => "?",
            TokenKind::Arrow => "=>",
            TokenKind::Lambda => "->",
            TokenKind::DotDot => "..",
            TokenKind::DotDotDot => "...",
            TokenKind::Assign => "=",
            TokenKind::OpAsgn => "operator assignment",
            TokenKind::Plus | TokenKind::UPlus => "+",
            TokenKind::Minus | TokenKind::UMinus => "-",
            TokenKind::Star | TokenKind::StarSplat => "*",
            TokenKind::Pow | TokenKind::DStarSplat => "**",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::AmpBlock | TokenKind::Amp => "&",
            TokenKind::Bang => "!",
            TokenKind::Tilde => "~",
            TokenKind::Pipe => "|",
            TokenKind::Caret => "^",
            TokenKind::Shl => "<<",
            TokenKind::Shr => ">>",
            TokenKind::AndAnd => "&&",
            TokenKind::OrOr => "||",
            TokenKind::Lt => "<",
            TokenKind::LtEq => "<=",
            TokenKind::Gt => ">",
            TokenKind::GtEq => ">=",
            TokenKind::EqEq => "==",
            TokenKind::EqEqEq => "===",
            TokenKind::NotEq => "!=",
            TokenKind::Match => "=~",
            TokenKind::NotMatch => "!~",
            TokenKind::Cmp => "<=>",
            TokenKind::Eof => "end of input",
        }
    }

    /// Check if this token ends a statement.
    #[inline]
    pub fn is_terminator(self) -> bool {
        matches!(self, TokenKind::Newline | TokenKind::Semi | TokenKind::Eof)
    }
}

bitflags! {
    /// Per-token trivia and lexer context.
    ///
    /// Captures the layout preceding each token and lexer knowledge the
    /// parser needs (which identifiers are known local variables).
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct TokenFlags: u8 {
        /// Whitespace (or a `\` line continuation) preceded this token.
        const SPACE_BEFORE = 1 << 0;
        /// A newline preceded this token.
        const NEWLINE_BEFORE = 1 << 1;
        /// Token is the first token on its line.
        const LINE_START = 1 << 2;
        /// Identifier names a local variable already assigned in scope.
        const LOCAL_VAR = 1 << 3;
    }
}

impl TokenFlags {
    /// Check if space preceded this token.
    #[inline]
    pub const fn has_space_before(self) -> bool {
        self.contains(Self::SPACE_BEFORE)
    }

    /// Check if the identifier is a known local variable.
    #[inline]
    pub const fn is_local_var(self) -> bool {
        self.contains(Self::LOCAL_VAR)
    }
}

/// A token with its span and flags.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    pub flags: TokenFlags,
}

impl Token {
    #[inline]
    pub const fn new(kind: TokenKind, span: Span, flags: TokenFlags) -> Self {
        Token { kind, span, flags }
    }
}

const _: () = assert!(std::mem::size_of::<TokenFlags>() == 1);
const _: () = assert!(std::mem::size_of::<Token>() <= 12);
