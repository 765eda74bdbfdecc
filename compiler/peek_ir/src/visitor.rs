//! Child traversal over the flat syntax tree.
//!
//! `for_each_child` is the single source of truth for "what are this node's
//! children"; walkers that need per-kind rules match on `NodeKind`
//! themselves and fall back to it for the generic case.

use crate::{NodeArena, NodeId, NodeKind};

/// Call `f` for every present child of `id`, in source order.
pub fn for_each_child(arena: &NodeArena, id: NodeId, mut f: impl FnMut(NodeId)) {
    let mut one = |child: NodeId| {
        if child.is_valid() {
            f(child);
        }
    };
    match arena.kind(id) {
        NodeKind::Int
        | NodeKind::Float
        | NodeKind::Rational
        | NodeKind::Complex
        | NodeKind::Str(_)
        | NodeKind::Sym
        | NodeKind::Nil
        | NodeKind::True
        | NodeKind::False
        | NodeKind::SelfRef
        | NodeKind::File
        | NodeKind::Line
        | NodeKind::Encoding
        | NodeKind::Lvar
        | NodeKind::Ivar
        | NodeKind::Gvar
        | NodeKind::Cvar
        | NodeKind::Cbase
        | NodeKind::Lambda
        | NodeKind::Params
        | NodeKind::ZSuper
        | NodeKind::Redo
        | NodeKind::Retry
        | NodeKind::Alias
        | NodeKind::Undef => {}

        NodeKind::Const { scope } => one(scope),
        NodeKind::Splat(inner)
        | NodeKind::DoubleSplat(inner)
        | NodeKind::BlockPass(inner)
        | NodeKind::Defined(inner)
        | NodeKind::Return(inner)
        | NodeKind::Break(inner)
        | NodeKind::Next(inner)
        | NodeKind::MatchCurrentLine(inner)
        | NodeKind::Preexe(inner)
        | NodeKind::Postexe(inner)
        | NodeKind::KwBegin { body: inner } => one(inner),

        NodeKind::Array { elems: list, .. }
        | NodeKind::Hash { pairs: list, .. }
        | NodeKind::Yield { args: list }
        | NodeKind::Super { args: list }
        | NodeKind::Mlhs { items: list }
        | NodeKind::Begin { stmts: list, .. } => {
            for &child in arena.list(list) {
                one(child);
            }
        }

        NodeKind::Pair { key: a, value: b }
        | NodeKind::Range { lo: a, hi: b, .. }
        | NodeKind::And { lhs: a, rhs: b }
        | NodeKind::Or { lhs: a, rhs: b }
        | NodeKind::Asgn {
            target: a,
            value: b,
        }
        | NodeKind::OpAsgn {
            target: a,
            value: b,
        }
        | NodeKind::Masgn {
            targets: a,
            value: b,
        }
        | NodeKind::Ensure {
            body: a,
            ensure_body: b,
        }
        | NodeKind::SClass { target: a, body: b }
        | NodeKind::Module { path: a, body: b } => {
            one(a);
            one(b);
        }

        NodeKind::Send { recv, args, .. } => {
            one(recv);
            for &child in arena.list(args) {
                one(child);
            }
        }
        NodeKind::Block { call, params, body } => {
            one(call);
            one(params);
            one(body);
        }
        NodeKind::Rescue {
            body,
            clauses,
            else_body,
            ..
        } => {
            one(body);
            for &child in arena.list(clauses) {
                one(child);
            }
            one(else_body);
        }
        NodeKind::ResBody { classes, var, body } => {
            one(classes);
            one(var);
            one(body);
        }
        NodeKind::If {
            cond,
            then_branch,
            else_branch,
            ..
        } => {
            one(cond);
            one(then_branch);
            one(else_branch);
        }
        NodeKind::Case {
            subject,
            whens,
            else_body,
        } => {
            one(subject);
            for &child in arena.list(whens) {
                one(child);
            }
            one(else_body);
        }
        NodeKind::When { conds, body } => {
            for &child in arena.list(conds) {
                one(child);
            }
            one(body);
        }
        NodeKind::While { cond, body, .. } => {
            one(cond);
            one(body);
        }
        NodeKind::For { var, iter, body } => {
            one(var);
            one(iter);
            one(body);
        }
        NodeKind::Def {
            singleton,
            params,
            body,
        } => {
            one(singleton);
            one(params);
            one(body);
        }
        NodeKind::Class {
            path,
            superclass,
            body,
        } => {
            one(path);
            one(superclass);
            one(body);
        }
    }
}

/// Count the nodes reachable from `root` (inclusive).
pub fn count_reachable(arena: &NodeArena, root: NodeId) -> usize {
    if !root.is_valid() {
        return 0;
    }
    let mut count = 0;
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        count += 1;
        for_each_child(arena, id, |child| stack.push(child));
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Span;

    #[test]
    fn test_children_in_source_order() {
        let mut arena = NodeArena::new();
        let recv = arena.alloc(NodeKind::Lvar, Span::new(0, 1));
        let arg = arena.alloc(NodeKind::Int, Span::new(4, 5));
        let args = arena.alloc_list([arg]);
        let send = arena.alloc(
            NodeKind::Send {
                recv,
                selector: Span::new(2, 3),
                args,
                safe_nav: false,
            },
            Span::new(0, 5),
        );
        let mut seen = Vec::new();
        for_each_child(&arena, send, |child| seen.push(child));
        assert_eq!(seen, vec![recv, arg]);
        assert_eq!(count_reachable(&arena, send), 3);
    }

    #[test]
    fn test_absent_children_skipped() {
        let mut arena = NodeArena::new();
        let cond = arena.alloc(NodeKind::True, Span::new(3, 7));
        let node = arena.alloc(
            NodeKind::If {
                cond,
                then_branch: NodeId::INVALID,
                else_branch: NodeId::INVALID,
                form: crate::IfForm::If,
            },
            Span::new(0, 11),
        );
        let mut seen = Vec::new();
        for_each_child(&arena, node, |child| seen.push(child));
        assert_eq!(seen, vec![cond]);
        assert_eq!(count_reachable(&arena, NodeId::INVALID), 0);
    }
}
