//! Fault injection: a reserved name whose text is swapped for something
//! that cannot run, so downstream error handling can be exercised without
//! feeding the transform invalid source.

use peek_ir::{NodeArena, NodeId, NodeKind};

/// The reserved spelling.
pub const SENTINEL: &str = "__TOTAL_FAILURE__";

/// What the sentinel is replaced with.
pub const SENTINEL_REPLACEMENT: &str = ".....TOTAL FAILURE!.....";

/// Whether `id` is a bare, receiverless, argumentless call spelled
/// [`SENTINEL`].
pub(crate) fn is_sentinel(arena: &NodeArena, source: &str, id: NodeId) -> bool {
    let node = arena.get(id);
    match node.kind {
        NodeKind::Send {
            recv,
            selector,
            args,
            ..
        } => {
            !recv.is_valid()
                && args.is_empty()
                && selector == node.span
                && selector.slice(source) == SENTINEL
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use peek_ir::NodeId;
    use peek_lexer::lex;
    use peek_parse::parse;

    use super::*;

    fn root_is_sentinel(source: &str) -> bool {
        let out = parse(&lex(source)).unwrap();
        is_sentinel(&out.arena, source, out.root)
    }

    #[test]
    fn bare_name_is_sentinel() {
        assert!(root_is_sentinel("__TOTAL_FAILURE__"));
    }

    #[test]
    fn calls_with_more_are_not() {
        assert!(!root_is_sentinel("__TOTAL_FAILURE__()"));
        assert!(!root_is_sentinel("__TOTAL_FAILURE__ 1"));
        assert!(!root_is_sentinel("a.__TOTAL_FAILURE__"));
        assert!(!root_is_sentinel("__TOTAL_FAILURES__"));
    }

    #[test]
    fn assigned_name_is_a_local_not_a_call() {
        let source = "__TOTAL_FAILURE__ = 1\n__TOTAL_FAILURE__";
        let out = parse(&lex(source)).unwrap();
        assert!((0..out.arena.len())
            .map(|i| NodeId::new(u32::try_from(i).unwrap()))
            .all(|id| !is_sentinel(&out.arena, source, id)));
    }
}
