//! Line splitting with offset bookkeeping.
//!
//! Text is split strictly on `\n`. A carriage return before the delimiter is
//! kept as trailing content, and a trailing delimiter yields a final empty
//! line, so `"a\n"` has two lines.

use crate::offset::utf16_len;

/// One line of a text snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Line<'a> {
    /// Zero-based position of this line in its own sequence.
    pub index: usize,
    /// Line content, without the delimiter.
    pub text: &'a str,
    /// Byte offset of the first character of this line within the text.
    pub byte_start: usize,
    /// Length of `text` in UTF-16 code units.
    pub utf16_len: usize,
}

impl<'a> Line<'a> {
    /// Length of the line content in bytes.
    pub fn byte_len(&self) -> usize {
        self.text.len()
    }
}

/// An indexed sequence of lines borrowed from one text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Lines<'a> {
    lines: Vec<Line<'a>>,
}

impl<'a> Lines<'a> {
    /// Split `text` into lines.
    ///
    /// The empty string produces no lines at all, so diffing an empty side
    /// against a non-empty one yields a single pure block.
    pub fn split(text: &'a str) -> Self {
        if text.is_empty() {
            return Self { lines: Vec::new() };
        }

        let mut lines = Vec::new();
        let mut byte_start = 0usize;
        for (index, segment) in text.split('\n').enumerate() {
            lines.push(Line {
                index,
                text: segment,
                byte_start,
                utf16_len: utf16_len(segment),
            });
            byte_start += segment.len() + 1;
        }
        Self { lines }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Line<'a>> {
        self.lines.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Line<'a>> {
        self.lines.iter()
    }

    /// The line texts, in order. This is the token sequence fed to the
    /// line-level differ.
    pub fn texts(&self) -> Vec<&'a str> {
        self.lines.iter().map(|l| l.text).collect()
    }

    /// Owned copies of the texts of lines in `range`.
    pub fn texts_in(&self, range: std::ops::Range<usize>) -> Vec<String> {
        self.lines[range].iter().map(|l| l.text.to_string()).collect()
    }
}
