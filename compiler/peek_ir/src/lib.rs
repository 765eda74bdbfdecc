//! Peek IR - shared source-level data structures
//!
//! This crate contains the types every stage of the wrapping pipeline
//! agrees on:
//! - Spans for source locations (byte offsets)
//! - Tokens and `TokenFlags` for lexer output
//! - The flat syntax tree (`Node`, `NodeKind`) in a `NodeArena`
//! - A child visitor used by tree walkers
//!
//! # Design Philosophy
//!
//! - **Flatten Everything**: No `Box<Node>`, use `NodeId(u32)` indices
//! - **Spans, not strings**: names are recovered from the source on demand

/// Compile-time assertion that a type has a specific size.
///
/// Used to prevent accidental size regressions in frequently-allocated types.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

pub mod ast;
mod span;
mod token;
pub mod visitor;

pub use ast::{IfForm, Node, NodeArena, NodeId, NodeKind, NodeRange};
pub use span::Span;
pub use token::{StrKind, Token, TokenFlags, TokenKind};
