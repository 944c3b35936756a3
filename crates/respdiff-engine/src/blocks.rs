//! Block aggregation: turns a line-level edit script into ordered
//! `DELETE` / `INSERT` / `CHANGE` blocks.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::script::EditScript;

/// The kind of a contiguous changed region.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DeltaKind {
    /// Previous lines removed without replacement.
    Delete,
    /// New lines added without a counterpart.
    Insert,
    /// Previous lines replaced by new lines.
    Change,
}

impl std::fmt::Display for DeltaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Delete => write!(f, "DELETE"),
            Self::Insert => write!(f, "INSERT"),
            Self::Change => write!(f, "CHANGE"),
        }
    }
}

/// A changed region expressed in line coordinates.
///
/// `start_line` / `line_count` address the current (target) text;
/// `source_start_line` / `source_line_count` address the previous text.
/// A `DELETE` block has zero target width: `start_line` is where the
/// removed lines used to sit in the current text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineBlock {
    pub kind: DeltaKind,
    pub start_line: usize,
    pub line_count: usize,
    pub source_start_line: usize,
    pub source_line_count: usize,
}

impl LineBlock {
    /// Target line indices covered by this block (empty for `DELETE`).
    pub fn target_range(&self) -> Range<usize> {
        self.start_line..self.start_line + self.line_count
    }

    /// Source line indices covered by this block (empty for `INSERT`).
    pub fn source_range(&self) -> Range<usize> {
        self.source_start_line..self.source_start_line + self.source_line_count
    }

    /// Number of leading target lines paired one-to-one with source lines.
    pub fn paired_lines(&self) -> usize {
        self.line_count.min(self.source_line_count)
    }

    /// Whether `line` (a target index) falls inside this block.
    pub fn contains_target_line(&self, line: usize) -> bool {
        self.target_range().contains(&line)
    }
}

/// Aggregate the non-equal regions of `script` into blocks.
///
/// Blocks come out ordered by ascending `start_line` and never overlap in
/// target space because regions of an edit script are disjoint and ordered.
pub fn aggregate(script: &EditScript) -> Vec<LineBlock> {
    script.regions().map(block_for_region).collect()
}

fn block_for_region((source, target): (Range<usize>, Range<usize>)) -> LineBlock {
    let kind = match (source.is_empty(), target.is_empty()) {
        (false, true) => DeltaKind::Delete,
        (true, false) => DeltaKind::Insert,
        _ => DeltaKind::Change,
    };
    LineBlock {
        kind,
        start_line: target.start,
        line_count: target.len(),
        source_start_line: source.start,
        source_line_count: source.len(),
    }
}
