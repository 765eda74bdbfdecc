//! The text producers spliced into the rewritten program.

/// Caller-supplied instrumentation text.
///
/// `before_each`/`after_each` are called once per kept wrap, with the
/// 1-based line of the wrapped expression's start and end respectively.
/// Calls happen in line order, `before_all` first and `after_all` last.
pub trait Hooks {
    /// Text placed before the first statement.
    fn before_all(&mut self) -> String {
        String::new()
    }

    /// Text placed after the last statement.
    fn after_all(&mut self) -> String {
        String::new()
    }

    fn before_each(&mut self, line: u32) -> String;

    fn after_each(&mut self, line: u32) -> String;
}

impl<H: Hooks + ?Sized> Hooks for &mut H {
    fn before_all(&mut self) -> String {
        (**self).before_all()
    }

    fn after_all(&mut self) -> String {
        (**self).after_all()
    }

    fn before_each(&mut self, line: u32) -> String {
        (**self).before_each(line)
    }

    fn after_each(&mut self, line: u32) -> String {
        (**self).after_each(line)
    }
}

/// Hooks backed by four closures.
pub struct FnHooks<BA, AA, BE, AE> {
    before_all: BA,
    after_all: AA,
    before_each: BE,
    after_each: AE,
}

impl<BA, AA, BE, AE> FnHooks<BA, AA, BE, AE>
where
    BA: FnMut() -> String,
    AA: FnMut() -> String,
    BE: FnMut(u32) -> String,
    AE: FnMut(u32) -> String,
{
    pub fn new(before_all: BA, after_all: AA, before_each: BE, after_each: AE) -> Self {
        FnHooks {
            before_all,
            after_all,
            before_each,
            after_each,
        }
    }
}

impl<BA, AA, BE, AE> Hooks for FnHooks<BA, AA, BE, AE>
where
    BA: FnMut() -> String,
    AA: FnMut() -> String,
    BE: FnMut(u32) -> String,
    AE: FnMut(u32) -> String,
{
    fn before_all(&mut self) -> String {
        (self.before_all)()
    }

    fn after_all(&mut self) -> String {
        (self.after_all)()
    }

    fn before_each(&mut self, line: u32) -> String {
        (self.before_each)(line)
    }

    fn after_each(&mut self, line: u32) -> String {
        (self.after_each)(line)
    }
}

/// Fixed marker text, independent of line numbers.
///
/// ```
/// use peek_wrap::{wrap, Markers};
///
/// let mut markers = Markers::new("<", ">").with_body("[", "]");
/// assert_eq!(wrap("a\nb\n", &mut markers).unwrap(), "[<a>\n<b>]\n");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Markers {
    open: String,
    close: String,
    before_all: String,
    after_all: String,
}

impl Markers {
    /// Wrap every expression in `open` ... `close`; the body gets nothing.
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Markers {
            open: open.into(),
            close: close.into(),
            before_all: String::new(),
            after_all: String::new(),
        }
    }

    /// Also surround the whole body.
    #[must_use]
    pub fn with_body(mut self, before_all: impl Into<String>, after_all: impl Into<String>) -> Self {
        self.before_all = before_all.into();
        self.after_all = after_all.into();
        self
    }
}

impl Hooks for Markers {
    fn before_all(&mut self) -> String {
        self.before_all.clone()
    }

    fn after_all(&mut self) -> String {
        self.after_all.clone()
    }

    fn before_each(&mut self, _line: u32) -> String {
        self.open.clone()
    }

    fn after_each(&mut self, _line: u32) -> String {
        self.close.clone()
    }
}
