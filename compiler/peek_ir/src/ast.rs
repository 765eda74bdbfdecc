//! Flat syntax tree.
//!
//! Nodes live in a [`NodeArena`] and reference their children by
//! [`NodeId`]; variable-length child lists are [`NodeRange`]s into the
//! arena's shared list storage. Optional children use [`NodeId::INVALID`].
//!
//! Node kinds follow the usual expression-tree vocabulary for the language
//! being wrapped (`send`, `lvasgn`, `masgn`, `kwbegin`, `resbody`, ...), and
//! every node's span is its full expression range in the source.

use std::fmt;

use crate::{Span, StrKind};

/// Index into the node arena.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct NodeId(u32);

impl NodeId {
    /// Invalid node ID (sentinel value for absent children).
    pub const INVALID: NodeId = NodeId(u32::MAX);

    /// Create a new `NodeId`.
    #[inline]
    pub const fn new(index: u32) -> Self {
        NodeId(index)
    }

    /// Get the index into the arena.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Check if this is a valid ID.
    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 != u32::MAX
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "NodeId({})", self.0)
        } else {
            write!(f, "NodeId::INVALID")
        }
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::INVALID
    }
}

/// Range of node ids in the arena's flattened list storage.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct NodeRange {
    pub start: u32,
    pub len: u32,
}

impl NodeRange {
    /// Empty range.
    pub const EMPTY: NodeRange = NodeRange { start: 0, len: 0 };

    #[inline]
    pub const fn new(start: u32, len: u32) -> Self {
        NodeRange { start, len }
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.len as usize
    }
}

impl fmt::Debug for NodeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeRange({}..{})", self.start, self.start + self.len)
    }
}

/// Surface form of a conditional.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum IfForm {
    /// `if c ... end`
    If,
    /// `unless c ... end`
    Unless,
    /// `elsif c ...` nested in the else branch of its parent.
    Elsif,
    /// `c ? a : b`
    Ternary,
    /// `a if c`, `a unless c`
    Modifier,
}

/// Node kind.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    // === Literals ===
    Int,
    Float,
    Rational,
    Complex,
    Str(StrKind),
    Sym,
    Nil,
    True,
    False,
    SelfRef,
    /// `__FILE__`
    File,
    /// `__LINE__`
    Line,
    /// `__ENCODING__`
    Encoding,

    // === Variables and constants ===
    Lvar,
    Ivar,
    Gvar,
    Cvar,
    /// `A`, `A::B` (`scope` is the left side), `::A` (`scope` is a `Cbase`).
    Const {
        scope: NodeId,
    },
    /// The leading `::` of a top-level constant.
    Cbase,

    // === Collections ===
    Array {
        elems: NodeRange,
        bracketed: bool,
    },
    /// `{a: 1}`, or keyword arguments without braces.
    Hash {
        pairs: NodeRange,
        braces: bool,
    },
    Pair {
        key: NodeId,
        value: NodeId,
    },
    Splat(NodeId),
    DoubleSplat(NodeId),
    BlockPass(NodeId),
    Range {
        lo: NodeId,
        hi: NodeId,
        exclusive: bool,
    },

    // === Calls ===
    /// Method call, operator call, index, attribute assignment.
    Send {
        recv: NodeId,
        selector: Span,
        args: NodeRange,
        safe_nav: bool,
    },
    /// A call with a literal block, or a lambda literal.
    Block {
        call: NodeId,
        params: NodeId,
        body: NodeId,
    },
    /// The `->` of a lambda literal.
    Lambda,
    /// A parameter list. Default values are parsed but not kept.
    Params,
    And {
        lhs: NodeId,
        rhs: NodeId,
    },
    Or {
        lhs: NodeId,
        rhs: NodeId,
    },
    Defined(NodeId),
    Yield {
        args: NodeRange,
    },
    Super {
        args: NodeRange,
    },
    /// `super` with neither arguments nor parentheses.
    ZSuper,

    // === Assignment ===
    /// `a = 1`, `@a = 1`, `$a = 1`, `@@a = 1`, `A = 1`.
    Asgn {
        target: NodeId,
        value: NodeId,
    },
    /// `a += 1`, `a ||= 1`, `a &&= 1`, including attribute and index targets.
    OpAsgn {
        target: NodeId,
        value: NodeId,
    },
    Masgn {
        targets: NodeId,
        value: NodeId,
    },
    Mlhs {
        items: NodeRange,
    },

    // === Sequences and exceptions ===
    /// A statement sequence; `paren` for `( ... )`.
    Begin {
        stmts: NodeRange,
        paren: bool,
    },
    /// `begin ... end`
    KwBegin {
        body: NodeId,
    },
    Rescue {
        body: NodeId,
        clauses: NodeRange,
        else_body: NodeId,
        modifier: bool,
    },
    ResBody {
        classes: NodeId,
        var: NodeId,
        body: NodeId,
    },
    Ensure {
        body: NodeId,
        ensure_body: NodeId,
    },

    // === Control flow ===
    If {
        cond: NodeId,
        then_branch: NodeId,
        else_branch: NodeId,
        form: IfForm,
    },
    Case {
        subject: NodeId,
        whens: NodeRange,
        else_body: NodeId,
    },
    When {
        conds: NodeRange,
        body: NodeId,
    },
    While {
        cond: NodeId,
        body: NodeId,
        until: bool,
        post: bool,
    },
    For {
        var: NodeId,
        iter: NodeId,
        body: NodeId,
    },
    Return(NodeId),
    Break(NodeId),
    Next(NodeId),
    Redo,
    Retry,
    /// A bare regexp literal used as a condition.
    MatchCurrentLine(NodeId),

    // === Definitions ===
    Def {
        singleton: NodeId,
        params: NodeId,
        body: NodeId,
    },
    Class {
        path: NodeId,
        superclass: NodeId,
        body: NodeId,
    },
    SClass {
        target: NodeId,
        body: NodeId,
    },
    Module {
        path: NodeId,
        body: NodeId,
    },
    Alias,
    Undef,
    /// `BEGIN { ... }`
    Preexe(NodeId),
    /// `END { ... }`
    Postexe(NodeId),
}

impl NodeKind {
    /// Short tag name, as printed in debug output and traces.
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Int => "int",
            NodeKind::Float => "float",
            NodeKind::Rational => "rational",
            NodeKind::Complex => "complex",
            NodeKind::Str(StrKind::Shell) => "xstr",
            NodeKind::Str(StrKind::Regexp) => "regexp",
            NodeKind::Str(StrKind::Symbol) => "dsym",
            NodeKind::Str(StrKind::Interpolated) => "dstr",
            NodeKind::Str(StrKind::Words) => "words",
            NodeKind::Str(StrKind::Heredoc) => "heredoc",
            NodeKind::Str(StrKind::Plain | StrKind::Char) => "str",
            NodeKind::Sym => "sym",
            NodeKind::Nil => "nil",
            NodeKind::True => "true",
            NodeKind::False => "false",
            NodeKind::SelfRef => "self",
            NodeKind::File => "__FILE__",
            NodeKind::Line => "__LINE__",
            NodeKind::Encoding => "__ENCODING__",
            NodeKind::Lvar => "lvar",
            NodeKind::Ivar => "ivar",
            NodeKind::Gvar => "gvar",
            NodeKind::Cvar => "cvar",
            NodeKind::Const { .. } => "const",
            NodeKind::Cbase => "cbase",
            NodeKind::Array { .. } => "array",
            NodeKind::Hash { .. } => "hash",
            NodeKind::Pair { .. } => "pair",
            NodeKind::Splat(_) => "splat",
            NodeKind::DoubleSplat(_) => "kwsplat",
            NodeKind::BlockPass(_) => "block_pass",
            NodeKind::Range { exclusive: false, .. } => "irange",
            NodeKind::Range { exclusive: true, .. } => "erange",
            NodeKind::Send { safe_nav: false, .. } => "send",
            NodeKind::Send { safe_nav: true, .. } => "csend",
            NodeKind::Block { .. } => "block",
            NodeKind::Lambda => "lambda",
            NodeKind::Params => "args",
            NodeKind::And { .. } => "and",
            NodeKind::Or { .. } => "or",
            NodeKind::Defined(_) => "defined?",
            NodeKind::Yield { .. } => "yield",
            NodeKind::Super { .. } => "super",
            NodeKind::ZSuper => "zsuper",
            NodeKind::Asgn { .. } => "asgn",
            NodeKind::OpAsgn { .. } => "op_asgn",
            NodeKind::Masgn { .. } => "masgn",
            NodeKind::Mlhs { .. } => "mlhs",
            NodeKind::Begin { .. } => "begin",
            NodeKind::KwBegin { .. } => "kwbegin",
            NodeKind::Rescue { .. } => "rescue",
            NodeKind::ResBody { .. } => "resbody",
            NodeKind::Ensure { .. } => "ensure",
            NodeKind::If { .. } => "if",
            NodeKind::Case { .. } => "case",
            NodeKind::When { .. } => "when",
            NodeKind::While { until: false, .. } => "while",
            NodeKind::While { until: true, .. } => "until",
            NodeKind::For { .. } => "for",
            NodeKind::Return(_) => "return",
            NodeKind::Break(_) => "break",
            NodeKind::Next(_) => "next",
            NodeKind::Redo => "redo",
            NodeKind::Retry => "retry",
            NodeKind::MatchCurrentLine(_) => "match_current_line",
            NodeKind::Def { singleton, .. } if singleton.is_valid() => "defs",
            NodeKind::Def { .. } => "def",
            NodeKind::Class { .. } => "class",
            NodeKind::SClass { .. } => "sclass",
            NodeKind::Module { .. } => "module",
            NodeKind::Alias => "alias",
            NodeKind::Undef => "undef",
            NodeKind::Preexe(_) => "preexe",
            NodeKind::Postexe(_) => "postexe",
        }
    }
}

/// A syntax tree node: kind plus full expression span.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
}

const _: () = assert!(std::mem::size_of::<Node>() <= 40);

/// Arena owning every node of one parse.
#[derive(Clone, Debug, Default)]
pub struct NodeArena {
    nodes: Vec<Node>,
    lists: Vec<NodeId>,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an arena sized for roughly `token_count` tokens.
    pub fn with_capacity(token_count: usize) -> Self {
        NodeArena {
            nodes: Vec::with_capacity(token_count / 2 + 1),
            lists: Vec::with_capacity(token_count / 4 + 1),
        }
    }

    /// Allocate a node.
    #[inline]
    pub fn alloc(&mut self, kind: NodeKind, span: Span) -> NodeId {
        let id = NodeId::new(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX - 1));
        self.nodes.push(Node { kind, span });
        id
    }

    /// Allocate a child list.
    pub fn alloc_list(&mut self, ids: impl IntoIterator<Item = NodeId>) -> NodeRange {
        let start = self.lists.len();
        self.lists.extend(ids);
        let len = self.lists.len() - start;
        if len == 0 {
            return NodeRange::EMPTY;
        }
        NodeRange::new(
            u32::try_from(start).unwrap_or(u32::MAX),
            u32::try_from(len).unwrap_or(u32::MAX),
        )
    }

    /// Get a node by id.
    ///
    /// # Panics
    /// Panics if `id` is `INVALID` or was not allocated by this arena.
    #[inline]
    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Get a node by id, `None` for `INVALID` or foreign ids.
    #[inline]
    pub fn try_get(&self, id: NodeId) -> Option<&Node> {
        if id.is_valid() {
            self.nodes.get(id.index())
        } else {
            None
        }
    }

    /// Kind of a node.
    #[inline]
    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.get(id).kind
    }

    /// Span of a node.
    #[inline]
    pub fn span(&self, id: NodeId) -> Span {
        self.get(id).span
    }

    /// Ids in a child list.
    #[inline]
    pub fn list(&self, range: NodeRange) -> &[NodeId] {
        let start = range.start as usize;
        &self.lists[start..start + range.len()]
    }

    /// Replace the kind of an already allocated node.
    ///
    /// Used when a parsed expression turns out to be an assignment target.
    #[inline]
    pub fn set_kind(&mut self, id: NodeId, kind: NodeKind) {
        self.nodes[id.index()].kind = kind;
    }

    /// Number of allocated nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests;
