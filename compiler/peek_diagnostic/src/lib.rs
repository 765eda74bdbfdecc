//! Diagnostics support shared by the lexer, parser and transform.
//!
//! - [`ErrorCode`]: stable, searchable codes per pipeline phase
//! - [`LineOffsetTable`]: byte offset to 1-based line/column lookup
//! - [`Location`]: a span resolved to lines and columns

mod error_code;
pub mod span_utils;

pub use error_code::ErrorCode;
pub use span_utils::{LineOffsetTable, Location};
