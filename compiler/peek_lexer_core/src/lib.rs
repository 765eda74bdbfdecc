//! Low-level scanning primitives.
//!
//! [`SourceBuffer`] copies the source into a zero-padded buffer so that a
//! [`Cursor`] can read the current byte and a few bytes of lookahead without
//! bounds checks at EOF: the first byte past the source is always `0x00`.

mod cursor;
mod source_buffer;

pub use cursor::Cursor;
pub use source_buffer::SourceBuffer;
