//! The lexer state machine.
//!
//! [`Lexer::run`] alternates between skipping trivia (whitespace, comments,
//! line continuations, heredoc bodies, insignificant newlines) and scanning
//! one token. Every scanned token records the state the next token is read
//! in; that state is what disambiguates the grammar's context-sensitive
//! punctuation.

use peek_diagnostic::ErrorCode;
use peek_ir::{Span, StrKind, Token, TokenFlags, TokenKind};
use peek_lexer_core::Cursor;
use rustc_hash::FxHashSet;

use crate::keywords;
use crate::{Comment, CommentKind, LexError, LexOutput};

/// Where the lexer stands relative to expression boundaries.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum LexState {
    /// An expression may start here. Newlines are insignificant.
    Beg,
    /// After `return`, `break`, `next` or `rescue`: a value may follow,
    /// but a newline still ends the statement.
    Mid,
    /// After a method name that may take command arguments.
    Arg,
    /// After a complete value.
    End,
    /// After `.`, `&.` or `::`: a method or constant name follows.
    Dot,
    /// After `def`, `alias` or `undef`: a method name follows.
    Fname,
    /// After the method name of a `def`.
    EndFn,
}

impl LexState {
    #[inline]
    fn newline_significant(self) -> bool {
        !matches!(self, LexState::Beg | LexState::Dot | LexState::Fname)
    }

    #[inline]
    pub(crate) fn is_beg(self) -> bool {
        matches!(self, LexState::Beg | LexState::Mid)
    }
}

/// Which construct's parameter names are currently being declared.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum ParamMode {
    None,
    /// Between the pipes of `{ |a, b| ... }`.
    Block,
    /// After `->`, up to the body brace or `do`.
    Lambda,
    /// After a method name, until the parameter list closes.
    Def { depth: u32 },
    /// `for a, b in`
    For,
}

/// A heredoc whose body starts at the next physical newline.
pub(crate) struct PendingHeredoc<'a> {
    pub(crate) tag: &'a str,
    /// `<<-TAG` / `<<~TAG`: the terminator may be indented.
    pub(crate) indented: bool,
    pub(crate) opener: Span,
}

pub(crate) struct Lexer<'a> {
    pub(crate) cursor: Cursor<'a>,
    pub(crate) state: LexState,
    /// Flags for the next token pushed.
    pub(crate) flags: TokenFlags,
    pub(crate) tokens: Vec<Token>,
    pub(crate) comments: Vec<Comment>,
    pub(crate) heredoc_bodies: Vec<Span>,
    pub(crate) pending_heredocs: Vec<PendingHeredoc<'a>>,
    pub(crate) errors: Vec<LexError>,
    pub(crate) locals: FxHashSet<&'a str>,
    pub(crate) params: ParamMode,
    /// `rescue =>` was seen: the next identifier is a local.
    pub(crate) declare_next: bool,
    data_segment: Option<u32>,
    /// Method names still expected in `Fname` state (two for `alias`).
    fname_left: u8,
    fname_def: bool,
    in_undef: bool,
    after_rescue: bool,
    ternary_depth: u32,
    brace_depth: u32,
    /// Scanning the code of an interpolation: stop at the unmatched `}`.
    nested: bool,
    closed: bool,
}

impl<'a> Lexer<'a> {
    pub(crate) fn new(cursor: Cursor<'a>) -> Self {
        Lexer {
            cursor,
            state: LexState::Beg,
            flags: TokenFlags::LINE_START,
            tokens: Vec::with_capacity(cursor.source_len() as usize / 4 + 1),
            comments: Vec::new(),
            heredoc_bodies: Vec::new(),
            pending_heredocs: Vec::new(),
            errors: Vec::new(),
            locals: FxHashSet::default(),
            params: ParamMode::None,
            declare_next: false,
            data_segment: None,
            fname_left: 0,
            fname_def: false,
            in_undef: false,
            after_rescue: false,
            ternary_depth: 0,
            brace_depth: 0,
            nested: false,
            closed: false,
        }
    }

    /// A lexer for the code inside `#{ ... }`, starting at the current
    /// position and sharing the known locals.
    pub(crate) fn nested(&self) -> Self {
        let mut inner = Lexer::new(self.cursor);
        inner.locals = self.locals.clone();
        inner.nested = true;
        inner.flags = TokenFlags::empty();
        inner
    }

    /// Whether a nested scan found its closing `}`.
    #[inline]
    pub(crate) fn closed(&self) -> bool {
        self.closed
    }

    pub(crate) fn run(&mut self) {
        while self.skip_trivia() {
            self.scan_token();
            if self.closed {
                return;
            }
        }
        if self.nested {
            return;
        }

        for doc in std::mem::take(&mut self.pending_heredocs) {
            self.errors
                .push(LexError::unterminated_heredoc(doc.tag, doc.opener));
        }
        let end = self.cursor.pos();
        let flags = std::mem::take(&mut self.flags);
        self.tokens
            .push(Token::new(TokenKind::Eof, Span::point(end), flags));
    }

    pub(crate) fn finish(self) -> LexOutput {
        LexOutput {
            tokens: self.tokens,
            comments: self.comments,
            heredoc_bodies: self.heredoc_bodies,
            data_segment: self.data_segment,
            errors: self.errors,
        }
    }

    // === Token output ===

    /// Push a token spanning `start` to the cursor and enter `next`.
    #[inline]
    pub(crate) fn push(&mut self, kind: TokenKind, start: u32, next: LexState) {
        let span = Span::new(start, self.cursor.pos());
        let flags = std::mem::take(&mut self.flags);
        self.tokens.push(Token::new(kind, span, flags));
        self.state = next;
    }

    /// Advance over a `len`-byte operator and push it.
    #[inline]
    fn op(&mut self, kind: TokenKind, len: u32, start: u32, next: LexState) {
        self.cursor.advance_n(len);
        self.push(kind, start, next);
    }

    /// Push an assignment operator, declaring the locals it assigns.
    fn assign(&mut self, kind: TokenKind, len: u32, start: u32) {
        self.declare_assignment_targets();
        self.op(kind, len, start, LexState::Beg);
    }

    #[inline]
    pub(crate) fn last_kind(&self) -> Option<TokenKind> {
        self.tokens.last().map(|tok| tok.kind)
    }

    /// Whether an operand may start at the cursor.
    ///
    /// After a method name, `op_len` bytes of operator that are preceded by
    /// whitespace but not followed by it start an argument: `a -1`, `a *b`,
    /// `a [1]`, `a /re/`.
    pub(crate) fn value_start(&self, op_len: u32) -> bool {
        match self.state {
            LexState::Beg | LexState::Mid => true,
            LexState::Arg | LexState::EndFn => {
                self.flags.has_space_before() && !is_space(self.cursor.peek_at(op_len))
            }
            LexState::End | LexState::Dot | LexState::Fname => false,
        }
    }

    // === Trivia ===

    /// Skip everything that is not a token. Returns `false` at the end of
    /// input or at the data segment.
    fn skip_trivia(&mut self) -> bool {
        loop {
            if self.cursor.at_line_start() {
                if !self.nested && self.at_data_segment() {
                    self.data_segment = Some(self.cursor.pos());
                    return false;
                }
                if self.at_block_comment() {
                    self.block_comment();
                    continue;
                }
            }
            if self.cursor.is_eof() {
                return false;
            }
            match self.cursor.current() {
                b' ' | b'\t' | b'\r' | 0x0B | 0x0C => {
                    self.cursor.eat_whitespace();
                    self.flags |= TokenFlags::SPACE_BEFORE;
                }
                b'\\' if self.cursor.peek() == b'\n' => {
                    self.cursor.advance_n(2);
                    self.flags |= TokenFlags::SPACE_BEFORE;
                    self.read_heredoc_bodies();
                }
                b'\\' if self.cursor.peek() == b'\r' && self.cursor.peek2() == b'\n' => {
                    self.cursor.advance_n(3);
                    self.flags |= TokenFlags::SPACE_BEFORE;
                    self.read_heredoc_bodies();
                }
                b'#' => self.line_comment(),
                b'\n' => self.newline(),
                _ => return true,
            }
        }
    }

    fn newline(&mut self) {
        let start = self.cursor.pos();
        self.cursor.advance();
        self.read_heredoc_bodies();
        self.end_of_statement();

        if self.state.newline_significant() && !self.continues_with_dot() {
            let flags = std::mem::take(&mut self.flags);
            self.tokens.push(Token::new(
                TokenKind::Newline,
                Span::new(start, start + 1),
                flags,
            ));
            self.state = LexState::Beg;
        }
        self.flags |= TokenFlags::NEWLINE_BEFORE | TokenFlags::SPACE_BEFORE | TokenFlags::LINE_START;
    }

    /// Reset per-statement tracking at `;` or a newline.
    fn end_of_statement(&mut self) {
        self.after_rescue = false;
        self.in_undef = false;
        if self.params == (ParamMode::Def { depth: 0 }) {
            self.params = ParamMode::None;
        }
    }

    /// Whether the next code line starts with `.meth` or `&.meth`, making
    /// the newline a continuation. Blank and comment lines are skipped.
    fn continues_with_dot(&self) -> bool {
        let rest = self.cursor.rest();
        let mut i = 0;
        loop {
            while matches!(rest.get(i), Some(b' ' | b'\t' | b'\r')) {
                i += 1;
            }
            match rest.get(i) {
                Some(b'\n') => i += 1,
                Some(b'#') => match memchr::memchr(b'\n', rest.get(i..).unwrap_or_default()) {
                    Some(offset) => i += offset + 1,
                    None => return false,
                },
                Some(b'.') => return rest.get(i + 1) != Some(&b'.'),
                Some(b'&') => return rest.get(i + 1) == Some(&b'.'),
                _ => return false,
            }
        }
    }

    /// A line consisting exactly of `__END__`.
    fn at_data_segment(&self) -> bool {
        let rest = self.cursor.rest();
        rest.starts_with(b"__END__")
            && matches!(rest.get(7..), Some([] | [b'\n', ..] | [b'\r', b'\n', ..]))
    }

    fn at_block_comment(&self) -> bool {
        let rest = self.cursor.rest();
        rest.starts_with(b"=begin") && rest.get(6).map_or(true, |&b| is_space(b))
    }

    fn block_comment(&mut self) {
        let start = self.cursor.pos();
        loop {
            self.cursor.eat_line();
            if self.cursor.is_eof() {
                self.errors.push(LexError::new(
                    ErrorCode::E0006,
                    "`=begin` comment has no `=end`",
                    Span::new(start, self.cursor.pos()),
                ));
                break;
            }
            let rest = self.cursor.rest();
            if rest.starts_with(b"=end") && rest.get(4).map_or(true, |&b| is_space(b)) {
                self.cursor.eat_until_newline_or_eof();
                break;
            }
        }
        self.comments.push(Comment {
            kind: CommentKind::Block,
            span: Span::new(start, self.cursor.pos()),
        });
    }

    fn line_comment(&mut self) {
        let start = self.cursor.pos();
        self.cursor.eat_until_newline_or_eof();
        self.comments.push(Comment {
            kind: CommentKind::Line,
            span: Span::new(start, self.cursor.pos()),
        });
    }

    // === Tokens ===

    fn scan_token(&mut self) {
        let start = self.cursor.pos();
        if self.state == LexState::Fname && self.fname_left > 0 && self.method_name(start) {
            return;
        }
        self.scan_general(start);
    }

    /// Scan the name after `def`, `alias` or `undef`. Returns `false` when
    /// the input is not a method name and should be scanned normally.
    fn method_name(&mut self, start: u32) -> bool {
        let b = self.cursor.current();
        if is_ident_start(b) {
            self.eat_ident_chars();
            let text = self.cursor.slice_from(start);

            // `def self.name`, `def obj.name`
            if self.fname_def && self.cursor.current() == b'.' && self.cursor.peek() != b'.' {
                let kind = if text == "self" {
                    TokenKind::KwSelf
                } else if b.is_ascii_uppercase() {
                    TokenKind::Constant
                } else {
                    TokenKind::Ident
                };
                if kind == TokenKind::Ident && self.locals.contains(text) {
                    self.flags |= TokenFlags::LOCAL_VAR;
                }
                self.push(kind, start, LexState::Fname);
                let dot = self.cursor.pos();
                self.op(TokenKind::Dot, 1, dot, LexState::Fname);
                return true;
            }

            match self.cursor.current() {
                b'?' | b'!' if self.cursor.peek() != b'=' => self.cursor.advance(),
                b'=' if !matches!(self.cursor.peek(), b'=' | b'~' | b'>') => self.cursor.advance(),
                _ => {}
            }
            let kind = if b.is_ascii_uppercase() {
                TokenKind::Constant
            } else {
                TokenKind::Ident
            };
            self.push(kind, start, LexState::Fname);
            self.finish_method_name();
            return true;
        }

        if (b == b':' && self.cursor.peek() != b':') || b == b'$' {
            // `alias :new :old`, `alias $new $old`
            self.scan_general(start);
            if matches!(
                self.last_kind(),
                Some(TokenKind::Symbol | TokenKind::Gvar | TokenKind::Str(StrKind::Symbol))
            ) {
                self.finish_method_name();
            }
            return true;
        }

        if let Some(len) = operator_method_len(self.cursor.rest()) {
            self.cursor.advance_n(len);
            self.push(TokenKind::MethodName, start, LexState::Fname);
            self.finish_method_name();
            return true;
        }
        false
    }

    fn finish_method_name(&mut self) {
        self.fname_left = self.fname_left.saturating_sub(1);
        if self.fname_left > 0 {
            self.state = LexState::Fname;
        } else if self.fname_def {
            self.fname_def = false;
            self.state = LexState::EndFn;
            self.params = ParamMode::Def { depth: 0 };
        } else {
            self.state = LexState::End;
        }
    }

    fn scan_general(&mut self, start: u32) {
        use LexState::{Beg, End};
        use TokenKind as T;

        let b = self.cursor.current();
        match b {
            b'0'..=b'9' => self.number(start),
            b'"' => self.quoted(start, b'"', StrKind::Interpolated, true),
            b'\'' => self.quoted(start, b'\'', StrKind::Plain, false),
            b'`' => self.quoted(start, b'`', StrKind::Shell, true),
            b'@' => self.instance_var(start),
            b'$' => self.global_var(start),

            b'(' => self.open_paren(start),
            b')' => {
                if let ParamMode::Def { depth } = &mut self.params {
                    *depth = depth.saturating_sub(1);
                    if *depth == 0 {
                        self.params = ParamMode::None;
                    }
                }
                self.op(T::RParen, 1, start, End);
            }
            b'[' => {
                let kind = match self.state {
                    LexState::Beg | LexState::Mid => T::LBracketArray,
                    LexState::Arg | LexState::EndFn if self.flags.has_space_before() => {
                        T::LBracketArray
                    }
                    _ => T::LBracket,
                };
                self.op(kind, 1, start, Beg);
            }
            b']' => self.op(T::RBracket, 1, start, End),
            b'{' => {
                let kind = if self.params == ParamMode::Lambda {
                    self.params = ParamMode::None;
                    T::LBrace
                } else if self.state.is_beg() {
                    T::LBraceHash
                } else {
                    T::LBrace
                };
                self.brace_depth += 1;
                self.op(kind, 1, start, Beg);
            }
            b'}' => {
                self.cursor.advance();
                if self.nested && self.brace_depth == 0 {
                    self.closed = true;
                    return;
                }
                self.brace_depth = self.brace_depth.saturating_sub(1);
                self.push(T::RBrace, start, End);
            }

            b',' => {
                self.op(T::Comma, 1, start, Beg);
                if self.in_undef {
                    self.fname_left = 1;
                    self.state = LexState::Fname;
                }
            }
            b';' => {
                self.end_of_statement();
                self.op(T::Semi, 1, start, Beg);
            }
            b'.' => {
                if self.cursor.starts_with(b"...") {
                    self.op(T::DotDotDot, 3, start, Beg);
                } else if self.cursor.peek() == b'.' {
                    self.op(T::DotDot, 2, start, Beg);
                } else {
                    self.op(T::Dot, 1, start, LexState::Dot);
                }
            }
            b':' => self.colon(start),

            b'=' => {
                if self.cursor.starts_with(b"===") {
                    self.op(T::EqEqEq, 3, start, Beg);
                } else if self.cursor.peek() == b'=' {
                    self.op(T::EqEq, 2, start, Beg);
                } else if self.cursor.peek() == b'~' {
                    self.op(T::Match, 2, start, Beg);
                } else if self.cursor.peek() == b'>' {
                    if self.after_rescue {
                        self.declare_next = true;
                    }
                    self.op(T::Arrow, 2, start, Beg);
                } else {
                    self.assign(T::Assign, 1, start);
                }
            }
            b'!' => match self.cursor.peek() {
                b'=' => self.op(T::NotEq, 2, start, Beg),
                b'~' => self.op(T::NotMatch, 2, start, Beg),
                _ => self.op(T::Bang, 1, start, Beg),
            },
            b'~' => self.op(T::Tilde, 1, start, Beg),
            b'<' => self.less(start),
            b'>' => {
                if self.cursor.starts_with(b">>=") {
                    self.assign(T::OpAsgn, 3, start);
                } else if self.cursor.peek() == b'>' {
                    self.op(T::Shr, 2, start, Beg);
                } else if self.cursor.peek() == b'=' {
                    self.op(T::GtEq, 2, start, Beg);
                } else {
                    self.op(T::Gt, 1, start, Beg);
                }
            }
            b'+' | b'-' => self.plus_minus(start, b),
            b'*' => {
                if self.cursor.starts_with(b"**=") {
                    self.assign(T::OpAsgn, 3, start);
                } else if self.cursor.peek() == b'*' {
                    let kind = if self.value_start(2) { T::DStarSplat } else { T::Pow };
                    self.op(kind, 2, start, Beg);
                } else if self.cursor.peek() == b'=' {
                    self.assign(T::OpAsgn, 2, start);
                } else {
                    let kind = if self.value_start(1) { T::StarSplat } else { T::Star };
                    self.op(kind, 1, start, Beg);
                }
            }
            b'/' => {
                let beg = matches!(self.state, LexState::Beg | LexState::Mid);
                if beg {
                    self.regexp(start);
                } else if self.cursor.peek() == b'=' {
                    self.assign(T::OpAsgn, 2, start);
                } else if self.value_start(1) {
                    self.regexp(start);
                } else {
                    self.op(T::Slash, 1, start, Beg);
                }
            }
            b'%' => {
                if self.value_start(1) && self.percent_literal(start) {
                    return;
                }
                if self.cursor.peek() == b'=' {
                    self.assign(T::OpAsgn, 2, start);
                } else {
                    self.op(T::Percent, 1, start, Beg);
                }
            }
            b'&' => {
                if self.cursor.starts_with(b"&&=") {
                    self.assign(T::OpAsgn, 3, start);
                } else if self.cursor.peek() == b'&' {
                    self.op(T::AndAnd, 2, start, Beg);
                } else if self.cursor.peek() == b'=' {
                    self.assign(T::OpAsgn, 2, start);
                } else if self.cursor.peek() == b'.' {
                    self.op(T::AndDot, 2, start, LexState::Dot);
                } else {
                    let kind = if self.value_start(1) { T::AmpBlock } else { T::Amp };
                    self.op(kind, 1, start, Beg);
                }
            }
            b'|' => self.pipe(start),
            b'^' => {
                if self.cursor.peek() == b'=' {
                    self.assign(T::OpAsgn, 2, start);
                } else {
                    self.op(T::Caret, 1, start, Beg);
                }
            }
            b'?' => {
                if self.value_start(1) && self.char_literal(start) {
                    return;
                }
                self.ternary_depth += 1;
                self.op(T::Question, 1, start, Beg);
            }

            _ if is_ident_start(b) => self.identifier(start),
            _ => {
                self.cursor.advance_char();
                self.errors
                    .push(LexError::invalid_char(b, Span::new(start, self.cursor.pos())));
            }
        }
    }

    fn open_paren(&mut self, start: u32) {
        let space = self.flags.has_space_before();
        let kind = match self.state {
            LexState::Beg | LexState::Mid => TokenKind::LParenBeg,
            LexState::Arg | LexState::EndFn if space => TokenKind::LParenArg,
            LexState::End if space => TokenKind::LParenBeg,
            _ => TokenKind::LParen,
        };
        if let ParamMode::Def { depth } = &mut self.params {
            *depth += 1;
        }
        self.op(kind, 1, start, LexState::Beg);
    }

    fn colon(&mut self, start: u32) {
        if self.cursor.peek() == b':' {
            let top_level = self.state.is_beg()
                || (matches!(self.state, LexState::Arg | LexState::EndFn)
                    && self.flags.has_space_before()
                    && !is_space(self.cursor.peek2()));
            if top_level {
                self.op(TokenKind::Colon3, 2, start, LexState::Beg);
            } else {
                self.op(TokenKind::Colon2, 2, start, LexState::Dot);
            }
            return;
        }

        let ternary = is_space(self.cursor.peek())
            || (self.ternary_depth > 0
                && matches!(self.state, LexState::End | LexState::Arg | LexState::EndFn));
        if !ternary && self.symbol(start) {
            return;
        }
        self.ternary_depth = self.ternary_depth.saturating_sub(1);
        self.op(TokenKind::Colon, 1, start, LexState::Beg);
    }

    fn less(&mut self, start: u32) {
        use TokenKind as T;
        if self.cursor.starts_with(b"<=>") {
            self.op(T::Cmp, 3, start, LexState::Beg);
        } else if self.cursor.starts_with(b"<<=") {
            self.assign(T::OpAsgn, 3, start);
        } else if self.cursor.peek() == b'<' {
            // `class << self` is never a heredoc
            if self.value_start(2)
                && self.last_kind() != Some(T::KwClass)
                && self.heredoc_opener(start)
            {
                return;
            }
            self.op(T::Shl, 2, start, LexState::Beg);
        } else if self.cursor.peek() == b'=' {
            self.op(T::LtEq, 2, start, LexState::Beg);
        } else {
            self.op(T::Lt, 1, start, LexState::Beg);
        }
    }

    fn plus_minus(&mut self, start: u32, b: u8) {
        use TokenKind as T;
        if b == b'-' && self.cursor.peek() == b'>' {
            self.params = ParamMode::Lambda;
            self.op(T::Lambda, 2, start, LexState::Beg);
        } else if self.cursor.peek() == b'=' {
            self.assign(T::OpAsgn, 2, start);
        } else if self.value_start(1) {
            if self.cursor.peek().is_ascii_digit() {
                // signed numeric literal
                self.cursor.advance();
                self.number(start);
            } else {
                let kind = if b == b'+' { T::UPlus } else { T::UMinus };
                self.op(kind, 1, start, LexState::Beg);
            }
        } else {
            let kind = if b == b'+' { T::Plus } else { T::Minus };
            self.op(kind, 1, start, LexState::Beg);
        }
    }

    fn pipe(&mut self, start: u32) {
        use TokenKind as T;
        let opens_params = matches!(self.last_kind(), Some(T::LBrace | T::KwDo));
        if self.cursor.starts_with(b"||=") {
            self.assign(T::OpAsgn, 3, start);
        } else if self.cursor.peek() == b'|' {
            if opens_params {
                // `{ || ... }`: an empty parameter list
                self.op(T::Pipe, 1, start, LexState::Beg);
                self.op(T::Pipe, 1, start + 1, LexState::Beg);
            } else {
                self.op(T::OrOr, 2, start, LexState::Beg);
            }
        } else if self.cursor.peek() == b'=' {
            self.assign(T::OpAsgn, 2, start);
        } else {
            if self.params == ParamMode::Block {
                self.params = ParamMode::None;
            } else if opens_params {
                self.params = ParamMode::Block;
            }
            self.op(T::Pipe, 1, start, LexState::Beg);
        }
    }

    fn instance_var(&mut self, start: u32) {
        let (kind, sigil) = if self.cursor.peek() == b'@' {
            (TokenKind::Cvar, 2)
        } else {
            (TokenKind::Ivar, 1)
        };
        self.cursor.advance_n(sigil);
        if !is_ident_start(self.cursor.current()) {
            self.errors.push(LexError::invalid_char(
                b'@',
                Span::new(start, self.cursor.pos()),
            ));
            return;
        }
        self.eat_ident_chars();
        self.push(kind, start, LexState::End);
    }

    fn global_var(&mut self, start: u32) {
        if let Some(len) = gvar_len(self.cursor.rest()) {
            self.op(TokenKind::Gvar, len, start, LexState::End);
        } else {
            self.cursor.advance();
            self.errors.push(LexError::invalid_char(
                b'$',
                Span::new(start, self.cursor.pos()),
            ));
        }
    }

    fn identifier(&mut self, start: u32) {
        let state = self.state;
        self.eat_ident_chars();
        let base = self.cursor.slice_from(start);

        // `name:` in hashes, keyword arguments and parameters
        if self.cursor.current() == b':'
            && self.cursor.peek() != b':'
            && self.ternary_depth == 0
            && matches!(
                state,
                LexState::Beg | LexState::Mid | LexState::Arg | LexState::EndFn
            )
        {
            if self.declares_local() {
                self.locals.insert(base);
            }
            self.cursor.advance();
            self.push(TokenKind::Label, start, LexState::Beg);
            return;
        }

        let local = state != LexState::Dot && self.locals.contains(base);
        if matches!(self.cursor.current(), b'?' | b'!')
            && (self.cursor.peek() != b'=' || matches!(self.cursor.peek2(), b'=' | b'~'))
            && !local
        {
            self.cursor.advance();
        }
        let text = self.cursor.slice_from(start);
        let capitalized = text.as_bytes().first().is_some_and(u8::is_ascii_uppercase);

        if state == LexState::Dot {
            let kind = if capitalized {
                TokenKind::Constant
            } else {
                TokenKind::Ident
            };
            self.push(kind, start, LexState::Arg);
            return;
        }
        if let Some(kw) = keywords::lookup(text) {
            self.keyword(kw, start, state);
            return;
        }
        if capitalized {
            self.push(TokenKind::Constant, start, LexState::Arg);
            return;
        }

        if self.declares_local() {
            self.locals.insert(text);
        }
        if self.locals.contains(text) {
            self.flags |= TokenFlags::LOCAL_VAR;
            self.push(TokenKind::Ident, start, LexState::End);
        } else {
            self.push(TokenKind::Ident, start, LexState::Arg);
        }
    }

    fn keyword(&mut self, kind: TokenKind, start: u32, state: LexState) {
        use TokenKind as T;
        let kind = if state == LexState::Beg {
            kind
        } else {
            keywords::modifier_form(kind).unwrap_or(kind)
        };

        let next = match kind {
            T::KwEnd
            | T::KwSelf
            | T::KwNil
            | T::KwTrue
            | T::KwFalse
            | T::KwRedo
            | T::KwRetry
            | T::KwFile
            | T::KwLine
            | T::KwEncoding
            | T::KwPreExe
            | T::KwPostExe => LexState::End,
            T::KwReturn | T::KwBreak | T::KwNext | T::KwRescueMod => LexState::Mid,
            T::KwRescue => {
                self.after_rescue = true;
                LexState::Mid
            }
            T::KwDefined | T::KwYield | T::KwSuper | T::KwNot => LexState::Arg,
            T::KwDef => {
                self.fname_left = 1;
                self.fname_def = true;
                LexState::Fname
            }
            T::KwAlias => {
                self.fname_left = 2;
                self.fname_def = false;
                LexState::Fname
            }
            T::KwUndef => {
                self.fname_left = 1;
                self.fname_def = false;
                self.in_undef = true;
                LexState::Fname
            }
            T::KwFor => {
                self.params = ParamMode::For;
                LexState::Beg
            }
            T::KwIn => {
                if self.params == ParamMode::For {
                    self.params = ParamMode::None;
                }
                LexState::Beg
            }
            T::KwDo => {
                if self.params == ParamMode::Lambda {
                    self.params = ParamMode::None;
                }
                LexState::Beg
            }
            T::KwThen => {
                self.after_rescue = false;
                LexState::Beg
            }
            _ => LexState::Beg,
        };
        self.push(kind, start, next);
    }

    #[inline]
    pub(crate) fn eat_ident_chars(&mut self) {
        self.cursor.eat_while(is_ident_char);
    }
}

/// Operator method names, longest first.
const OPERATOR_METHODS: &[&[u8]] = &[
    b"[]=", b"===", b"<=>", b"[]", b"==", b"=~", b"!=", b"!~", b"**", b"+@", b"-@", b"~@",
    b"!@", b"<<", b">>", b"<=", b">=", b"+", b"-", b"*", b"/", b"%", b"<", b">", b"!", b"&",
    b"|", b"^", b"~", b"`",
];

/// Length of the operator method name `rest` starts with.
#[allow(
    clippy::cast_possible_truncation,
    reason = "operator names are at most three bytes"
)]
pub(crate) fn operator_method_len(rest: &[u8]) -> Option<u32> {
    OPERATOR_METHODS
        .iter()
        .find(|op| rest.starts_with(op))
        .map(|op| op.len() as u32)
}

/// Length of the global variable `rest` starts with (`rest[0] == b'$'`).
#[allow(
    clippy::cast_possible_truncation,
    reason = "bounded by the source length, which fits in u32"
)]
pub(crate) fn gvar_len(rest: &[u8]) -> Option<u32> {
    let body = rest.get(1..)?;
    let len = match *body.first()? {
        b if is_ident_start(b) => body.iter().take_while(|&&b| is_ident_char(b)).count(),
        b'0'..=b'9' => body.iter().take_while(|b| b.is_ascii_digit()).count(),
        b'-' if body.get(1).is_some_and(|&b| is_ident_char(b)) => 2,
        b'~' | b'*' | b'$' | b'?' | b'!' | b'@' | b'/' | b'\\' | b';' | b',' | b'.' | b'='
        | b':' | b'<' | b'>' | b'"' | b'&' | b'`' | b'\'' | b'+' => 1,
        _ => return None,
    };
    Some(1 + len as u32)
}

/// Whitespace, including the end-of-input sentinel.
#[inline]
pub(crate) fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0B | 0x0C | 0)
}

/// Bytes at or above 0x80 are parts of multi-byte identifier characters.
#[inline]
pub(crate) fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b >= 0x80
}

#[inline]
pub(crate) fn is_ident_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b >= 0x80
}
