//! Void-value classification.
//!
//! A node is void when evaluating it cannot produce a value for the
//! surrounding code because control always leaves non-locally first.
//! Wrapping such a node would place the closing marker after a jump, where
//! it never runs.

use peek_ir::{NodeArena, NodeId, NodeKind};
use peek_stack::ensure_sufficient_stack;

/// Whether `id` is a void-value expression. Absent nodes are not void.
///
/// Chains with a single deciding child (the last statement of a sequence,
/// the body of a `begin`) are followed in a loop; only conditionals and
/// `ensure` branch.
pub fn is_void(arena: &NodeArena, id: NodeId) -> bool {
    let mut id = id;
    loop {
        if !id.is_valid() {
            return false;
        }
        id = match arena.kind(id) {
            NodeKind::Return(_)
            | NodeKind::Break(_)
            | NodeKind::Next(_)
            | NodeKind::Redo
            | NodeKind::Retry => return true,

            // Either arm jumping is enough; a missing arm never is.
            NodeKind::If {
                then_branch,
                else_branch,
                ..
            } => {
                return ensure_sufficient_stack(|| {
                    is_void(arena, then_branch) || is_void(arena, else_branch)
                });
            }
            NodeKind::Ensure { body, ensure_body } => {
                return ensure_sufficient_stack(|| {
                    is_void(arena, body) || is_void(arena, ensure_body)
                });
            }

            NodeKind::Begin { stmts, .. } => match arena.list(stmts).last() {
                Some(&last) => last,
                None => return false,
            },
            NodeKind::KwBegin { body } | NodeKind::ResBody { body, .. } => body,

            // An `else` clause runs instead of the body's value.
            NodeKind::Rescue {
                body, else_body, ..
            } => {
                if else_body.is_valid() {
                    else_body
                } else {
                    body
                }
            }

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
            | NodeKind::Const { .. }
            | NodeKind::Cbase
            | NodeKind::Array { .. }
            | NodeKind::Hash { .. }
            | NodeKind::Pair { .. }
            | NodeKind::Splat(_)
            | NodeKind::DoubleSplat(_)
            | NodeKind::BlockPass(_)
            | NodeKind::Range { .. }
            | NodeKind::Send { .. }
            | NodeKind::Block { .. }
            | NodeKind::Lambda
            | NodeKind::Params
            | NodeKind::And { .. }
            | NodeKind::Or { .. }
            | NodeKind::Defined(_)
            | NodeKind::Yield { .. }
            | NodeKind::Super { .. }
            | NodeKind::ZSuper
            | NodeKind::Asgn { .. }
            | NodeKind::OpAsgn { .. }
            | NodeKind::Masgn { .. }
            | NodeKind::Mlhs { .. }
            | NodeKind::Case { .. }
            | NodeKind::When { .. }
            | NodeKind::While { .. }
            | NodeKind::For { .. }
            | NodeKind::MatchCurrentLine(_)
            | NodeKind::Def { .. }
            | NodeKind::Class { .. }
            | NodeKind::SClass { .. }
            | NodeKind::Module { .. }
            | NodeKind::Alias
            | NodeKind::Undef
            | NodeKind::Preexe(_)
            | NodeKind::Postexe(_) => return false,
        };
    }
}

#[cfg(test)]
mod tests;
