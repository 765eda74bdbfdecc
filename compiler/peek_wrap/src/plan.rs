//! Wrap planning: which node spans get markers.
//!
//! A depth-first walk adds candidate spans, parents before children. A
//! candidate is only a wish: the line grouper later keeps one per line.
//! Which children are walked is decided per kind, so that declaration
//! headers, parameter lists, splats and the like never receive markers
//! while the bodies they contain still do.

use peek_ir::{IfForm, NodeArena, NodeId, NodeKind, NodeRange, Span};
use peek_stack::ensure_sufficient_stack;
use smallvec::SmallVec;
use tracing::trace;

use crate::classify::is_void;
use crate::sentinel::{is_sentinel, SENTINEL_REPLACEMENT};
use crate::WrapError;

/// Text substituted for a span regardless of wrapping.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Replacement {
    pub span: Span,
    pub text: &'static str,
}

/// Output of a planning pass.
#[derive(Clone, Debug, Default)]
pub(crate) struct Plan {
    /// Candidate spans in the order they were added.
    pub candidates: Vec<Span>,
    pub replacements: SmallVec<[Replacement; 1]>,
}

pub(crate) struct Planner<'a> {
    arena: &'a NodeArena,
    source: &'a str,
    plan: Plan,
}

impl<'a> Planner<'a> {
    /// Plan the wraps for the tree rooted at `root`.
    pub(crate) fn plan(arena: &'a NodeArena, source: &'a str, root: NodeId) -> Result<Plan, WrapError> {
        let mut planner = Planner {
            arena,
            source,
            plan: Plan::default(),
        };
        planner.visit(root)?;
        Ok(planner.plan)
    }

    fn visit(&mut self, id: NodeId) -> Result<(), WrapError> {
        if !id.is_valid() {
            return Ok(());
        }
        ensure_sufficient_stack(|| self.visit_node(id))
    }

    fn visit_node(&mut self, id: NodeId) -> Result<(), WrapError> {
        let arena = self.arena;
        match arena.kind(id) {
            // Never wrapped, nothing inside is either.
            NodeKind::Params
            | NodeKind::Mlhs { .. }
            | NodeKind::Lambda
            | NodeKind::Redo
            | NodeKind::Retry
            | NodeKind::Alias
            | NodeKind::Undef
            | NodeKind::Splat(_)
            | NodeKind::DoubleSplat(_)
            | NodeKind::BlockPass(_)
            | NodeKind::MatchCurrentLine(_) => Ok(()),

            // The whole literal, never the code interpolated into it.
            NodeKind::Str(_) | NodeKind::Sym => self.add(id),

            NodeKind::Def { body, .. } => {
                self.add(id)?;
                self.visit(body)
            }
            NodeKind::Class { body, .. }
            | NodeKind::Module { body, .. }
            | NodeKind::SClass { body, .. }
            | NodeKind::ResBody { body, .. }
            | NodeKind::When { body, .. }
            | NodeKind::Preexe(body)
            | NodeKind::Postexe(body) => self.visit(body),

            NodeKind::Send { recv, args, .. } => {
                if is_sentinel(arena, self.source, id) {
                    self.plan.replacements.push(Replacement {
                        span: arena.span(id),
                        text: SENTINEL_REPLACEMENT,
                    });
                }
                self.add(id)?;
                self.visit(recv)?;
                self.visit_list(args)
            }
            NodeKind::Block { call, body, .. } => {
                self.add(id)?;
                if let NodeKind::Send { recv, .. } = arena.kind(call) {
                    self.visit(recv)?;
                }
                self.visit(body)
            }

            NodeKind::Begin { stmts, paren } => {
                if paren {
                    self.add_unless_void(id)?;
                }
                self.visit_list(stmts)
            }
            NodeKind::KwBegin { body } => {
                self.add_unless_void(id)?;
                self.visit(body)
            }

            NodeKind::Hash { pairs, braces } => {
                if braces {
                    self.add(id)?;
                }
                self.visit_list(pairs)
            }
            NodeKind::Pair { value, .. } => self.visit(value),
            NodeKind::Array { elems, .. } => {
                self.add(id)?;
                self.visit_list(elems)
            }

            NodeKind::Masgn { value, .. } => {
                self.add(id)?;
                match arena.kind(value) {
                    NodeKind::Array {
                        elems,
                        bracketed: false,
                    } => self.visit_list(elems),
                    _ => self.visit(value),
                }
            }
            NodeKind::Asgn { value, .. } | NodeKind::OpAsgn { value, .. } => {
                self.add(id)?;
                self.visit(value)
            }

            NodeKind::Rescue {
                body,
                clauses,
                else_body,
                modifier,
            } => {
                if modifier {
                    self.add(id)?;
                }
                self.visit(body)?;
                self.visit_list(clauses)?;
                self.visit(else_body)
            }
            NodeKind::Ensure { body, ensure_body } => {
                self.visit(body)?;
                self.visit(ensure_body)
            }

            NodeKind::If { cond, form, .. } => {
                // An `elsif` shares its markers with the `if` it continues.
                if form != IfForm::Elsif && !is_void(arena, cond) {
                    self.add_unless_void(id)?;
                }
                self.visit_children(id)
            }
            NodeKind::Case {
                subject,
                whens,
                else_body,
            } => {
                self.add(id)?;
                self.visit(subject)?;
                self.visit_list(whens)?;
                self.visit(else_body)
            }
            NodeKind::While { cond, body, .. } => {
                self.add_unless_void(id)?;
                self.visit(cond)?;
                self.visit(body)
            }
            NodeKind::For { iter, body, .. } => {
                self.add(id)?;
                self.visit(iter)?;
                self.visit(body)
            }

            // Void themselves; their value operand is not.
            NodeKind::Return(value) | NodeKind::Break(value) | NodeKind::Next(value) => {
                self.visit(value)
            }

            NodeKind::Int
            | NodeKind::Float
            | NodeKind::Rational
            | NodeKind::Complex
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
            | NodeKind::Range { .. }
            | NodeKind::And { .. }
            | NodeKind::Or { .. }
            | NodeKind::Defined(_)
            | NodeKind::Yield { .. }
            | NodeKind::Super { .. }
            | NodeKind::ZSuper => {
                self.add_unless_void(id)?;
                self.visit_children(id)
            }
        }
    }

    fn visit_list(&mut self, range: NodeRange) -> Result<(), WrapError> {
        let arena = self.arena;
        for &child in arena.list(range) {
            self.visit(child)?;
        }
        Ok(())
    }

    fn visit_children(&mut self, id: NodeId) -> Result<(), WrapError> {
        let mut children: SmallVec<[NodeId; 4]> = SmallVec::new();
        peek_ir::visitor::for_each_child(self.arena, id, |child| children.push(child));
        for child in children {
            self.visit(child)?;
        }
        Ok(())
    }

    fn add_unless_void(&mut self, id: NodeId) -> Result<(), WrapError> {
        if is_void(self.arena, id) {
            trace!(kind = self.arena.kind(id).name(), "void, not wrapped");
            return Ok(());
        }
        self.add(id)
    }

    fn add(&mut self, id: NodeId) -> Result<(), WrapError> {
        let span = self.arena.span(id);
        if span.start > span.end || span.end as usize > self.source.len() {
            return Err(WrapError::planner(format!(
                "`{}` node span {span:?} lies outside the {}-byte source",
                self.arena.kind(id).name(),
                self.source.len()
            )));
        }
        trace!(kind = self.arena.kind(id).name(), ?span, "wrap candidate");
        self.plan.candidates.push(span);
        Ok(())
    }
}

#[cfg(test)]
mod tests;
