//! Parse context flags for context-sensitive parsing.
//!
//! Two constructs in the grammar change meaning depending on what encloses
//! them: a `do` keyword may open a block for the innermost call or belong
//! to an enclosing loop or command, and a comma may continue an argument
//! list or turn an assignment's right side into an implicit array.

/// Context flags for parsing.
///
/// Multiple flags can be combined using bitwise OR.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ParseContext(u16);

impl ParseContext {
    /// No special context.
    pub const NONE: Self = Self(0);

    /// A `do` seen here belongs to an enclosing construct: the condition
    /// of `while`/`until`, the iterable of `for`, or the arguments of a
    /// command call (`a b do ... end` attaches the block to `a`).
    pub const NO_DO_BLOCK: Self = Self(1 << 0);

    /// Commas separate list elements; `a = 1, 2` inside an argument list
    /// is two arguments, not an assignment of an array.
    pub const ARG_LIST: Self = Self(1 << 1);

    /// Create a new context with no flags set.
    #[inline]
    pub const fn new() -> Self {
        Self::NONE
    }

    /// Check if a flag is set.
    #[inline]
    pub const fn has(self, flag: Self) -> bool {
        (self.0 & flag.0) != 0
    }

    /// Add a flag to the context.
    #[inline]
    #[must_use]
    pub const fn with(self, flag: Self) -> Self {
        Self(self.0 | flag.0)
    }

    /// Remove a flag from the context.
    #[inline]
    #[must_use]
    pub const fn without(self, flag: Self) -> Self {
        Self(self.0 & !flag.0)
    }

    /// Combine two contexts (union of flags).
    #[inline]
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Check if `do` may open a block for the call being parsed.
    #[inline]
    pub const fn allows_do_block(self) -> bool {
        !self.has(Self::NO_DO_BLOCK)
    }

    /// Check if we're inside a comma-separated list.
    #[inline]
    pub const fn in_arg_list(self) -> bool {
        self.has(Self::ARG_LIST)
    }
}
