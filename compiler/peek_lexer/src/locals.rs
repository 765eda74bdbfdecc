//! Local variable tracking.
//!
//! Whether an identifier names a local changes how what follows it is
//! read: `a -1` subtracts when `a` is a local and passes `-1` to a method
//! call otherwise. Names become locals when assigned or when declared as
//! block, lambda, method, `for` or `rescue =>` variables. Scopes are not
//! tracked; a name stays local until the end of the file.

use peek_ir::TokenKind;

use crate::lexer::{LexState, Lexer, ParamMode};

impl Lexer<'_> {
    /// Whether the identifier about to be pushed declares a local.
    pub(crate) fn declares_local(&mut self) -> bool {
        if self.declare_next {
            self.declare_next = false;
            return true;
        }
        match self.params {
            ParamMode::None => false,
            ParamMode::For => true,
            ParamMode::Def { depth } => {
                depth <= 1 && (self.state == LexState::EndFn || self.after_param_lead())
            }
            ParamMode::Block | ParamMode::Lambda => self.after_param_lead(),
        }
    }

    /// Parameter names follow list punctuation or a sigil; anything else
    /// (an `=`, an operator) means we are inside a default value.
    fn after_param_lead(&self) -> bool {
        use TokenKind as T;
        matches!(
            self.last_kind(),
            Some(
                T::Pipe
                    | T::Comma
                    | T::StarSplat
                    | T::Star
                    | T::DStarSplat
                    | T::Pow
                    | T::AmpBlock
                    | T::Amp
                    | T::LParen
                    | T::LParenArg
                    | T::LParenBeg
                    | T::Lambda
            )
        )
    }

    /// Declare the plain identifiers on the left of an `=` or op-assign
    /// about to be pushed: `a = 1`, `a, *b = c`, `(a, b), c = d`.
    pub(crate) fn declare_assignment_targets(&mut self) {
        use TokenKind as T;
        for i in (0..self.tokens.len()).rev() {
            let tok = self.tokens[i];
            match tok.kind {
                T::Ident => {
                    let after_dot = i > 0
                        && matches!(self.tokens[i - 1].kind, T::Dot | T::AndDot | T::Colon2);
                    let name = self.cursor.slice(tok.span.start, tok.span.end);
                    if after_dot || name.ends_with(['?', '!']) {
                        break;
                    }
                    self.locals.insert(name);
                }
                T::Comma | T::StarSplat | T::Star | T::LParenBeg | T::RParen => {}
                _ => break,
            }
        }
    }
}
