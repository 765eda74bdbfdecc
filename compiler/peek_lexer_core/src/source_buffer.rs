//! Sentinel-terminated source buffer for zero-bounds-check scanning.
//!
//! The buffer guarantees a `0x00` sentinel byte after the source content,
//! allowing the scanner to detect EOF without explicit bounds checking.
//! The total buffer size is rounded up to the next 64-byte boundary, with at
//! least [`LOOKAHEAD`] zero bytes after the sentinel for `peek()`/`peek2()`.

use crate::Cursor;

/// Cache line size in bytes, used for buffer alignment padding.
const CACHE_LINE: usize = 64;

/// Zero bytes guaranteed after the sentinel.
const LOOKAHEAD: usize = 4;

/// UTF-8 byte order mark.
const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Sentinel-terminated source buffer.
///
/// # Layout
///
/// ```text
/// [source_bytes..., 0x00, padding_zeros...]
///  ^                ^     ^
///  0                |     rounded up to 64-byte boundary
///              source_len (sentinel)
/// ```
#[derive(Clone, Debug)]
pub struct SourceBuffer {
    /// Owned buffer: `[source_bytes..., 0x00 sentinel, 0x00 padding...]`.
    buf: Vec<u8>,
    /// Length of the actual source content (excludes sentinel and padding).
    source_len: u32,
}

impl SourceBuffer {
    /// Create a new sentinel-terminated buffer from source code.
    ///
    /// Returns `None` if the source is larger than `u32::MAX` bytes, since
    /// every span in the pipeline is a pair of `u32` offsets.
    pub fn new(source: &str) -> Option<Self> {
        let source_bytes = source.as_bytes();
        let source_len = u32::try_from(source_bytes.len()).ok()?;
        let len = source_bytes.len();

        let padded_len = (len + 1 + LOOKAHEAD + CACHE_LINE - 1) & !(CACHE_LINE - 1);
        let mut buf = vec![0u8; padded_len];
        buf[..len].copy_from_slice(source_bytes);

        Some(Self { buf, source_len })
    }

    /// Returns the source bytes (without sentinel or padding).
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.source_len as usize]
    }

    /// Create a cursor positioned at the start of the source.
    pub fn cursor(&self) -> Cursor<'_> {
        Cursor::new(&self.buf, self.source_len)
    }

    /// Length of the source content in bytes.
    pub fn len(&self) -> u32 {
        self.source_len
    }

    /// Returns `true` if the source is empty.
    pub fn is_empty(&self) -> bool {
        self.source_len == 0
    }

    /// Length of a leading UTF-8 byte order mark, if any (0 or 3).
    pub fn bom_len(&self) -> u32 {
        if self.as_bytes().starts_with(UTF8_BOM) {
            3
        } else {
            0
        }
    }
}
