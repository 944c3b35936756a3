//! UTF-16 offset mapping.
//!
//! Host editors usually address text in UTF-16 code units, so every column
//! the engine reports is a UTF-16 count. These helpers convert between those
//! columns, byte offsets, and absolute positions in a whole text.

use std::ops::Range;

use crate::inline::InlineSpan;
use crate::line::Lines;

/// Length of `s` in UTF-16 code units.
pub fn utf16_len(s: &str) -> usize {
    s.chars().map(char::len_utf16).sum()
}

/// Convert a UTF-16 column within `line` into a byte offset.
///
/// Returns `None` if the column lies past the end of the line or in the
/// middle of a surrogate pair.
pub fn utf16_to_byte(line: &str, col: usize) -> Option<usize> {
    let mut units = 0usize;
    for (byte, c) in line.char_indices() {
        if units == col {
            return Some(byte);
        }
        if units > col {
            return None;
        }
        units += c.len_utf16();
    }
    (units == col).then_some(line.len())
}

/// Convert a byte offset within `line` into a UTF-16 column.
///
/// Returns `None` if the offset is past the end or not on a char boundary.
pub fn byte_to_utf16(line: &str, byte: usize) -> Option<usize> {
    line.get(..byte).map(utf16_len)
}

/// Absolute UTF-16 start offsets of every line in a text.
///
/// Lines come from [`Lines::split`], so the empty text has no lines; each
/// delimiter occupies one code unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineOffsets {
    starts: Vec<usize>,
    lengths: Vec<usize>,
}

impl LineOffsets {
    pub fn new(text: &str) -> Self {
        let mut starts = Vec::new();
        let mut lengths = Vec::new();
        let mut acc = 0usize;
        for line in Lines::split(text).iter() {
            starts.push(acc);
            lengths.push(line.utf16_len);
            acc += line.utf16_len + 1;
        }
        Self { starts, lengths }
    }

    /// Number of lines, counting the empty line after a trailing `\n`.
    pub fn line_count(&self) -> usize {
        self.starts.len()
    }

    /// Absolute UTF-16 offset at which `line` starts.
    pub fn line_start(&self, line: usize) -> Option<usize> {
        self.starts.get(line).copied()
    }

    /// Absolute range of `line`'s content, excluding its delimiter.
    pub fn line_range(&self, line: usize) -> Option<Range<usize>> {
        let start = self.line_start(line)?;
        Some(start..start + self.lengths[line])
    }

    /// Absolute range of an inline span, validated against the line length.
    pub fn span_range(&self, span: &InlineSpan) -> Option<Range<usize>> {
        let line = self.line_range(span.line)?;
        if span.is_empty() || span.end_col_utf16 > line.len() {
            return None;
        }
        Some(line.start + span.start_col_utf16..line.start + span.end_col_utf16)
    }
}
