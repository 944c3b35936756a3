//! The public entry points.
//!
//! Both views run the same pipeline up to block aggregation, so they can
//! never disagree on block boundaries:
//!
//! ```text
//! split lines -> edit script -> blocks -+-> inline spans -> Decorations
//!                                       +-> line texts   -> Vec<Delta>
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::blocks::{aggregate, DeltaKind, LineBlock};
use crate::config::DiffConfig;
use crate::error::{DiffError, DiffResult};
use crate::inline::{block_spans, InlineSpan};
use crate::line::Lines;
use crate::script::EditScript;

/// Which input of a comparison.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Previous,
    Current,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Previous => write!(f, "previous"),
            Self::Current => write!(f, "current"),
        }
    }
}

/// Structured result: line blocks plus inline spans.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decorations {
    pub line_blocks: Vec<LineBlock>,
    pub inline_spans: Vec<InlineSpan>,
}

impl Decorations {
    /// Returns `true` if the two texts were identical.
    pub fn is_empty(&self) -> bool {
        self.line_blocks.is_empty() && self.inline_spans.is_empty()
    }

    /// Total number of target lines in `INSERT` blocks.
    pub fn inserted_lines(&self) -> usize {
        self.count_lines(DeltaKind::Insert, |b| b.line_count)
    }

    /// Total number of source lines in `DELETE` blocks.
    pub fn deleted_lines(&self) -> usize {
        self.count_lines(DeltaKind::Delete, |b| b.source_line_count)
    }

    /// Total number of target lines in `CHANGE` blocks.
    pub fn changed_lines(&self) -> usize {
        self.count_lines(DeltaKind::Change, |b| b.line_count)
    }

    /// The block covering target line `line`, if any.
    pub fn block_for_line(&self, line: usize) -> Option<&LineBlock> {
        self.line_blocks.iter().find(|b| b.contains_target_line(line))
    }

    fn count_lines(&self, kind: DeltaKind, f: impl Fn(&LineBlock) -> usize) -> usize {
        self.line_blocks
            .iter()
            .filter(|b| b.kind == kind)
            .map(f)
            .sum()
    }
}

/// Flat result: one entry per block, carrying the affected line texts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delta {
    pub kind: DeltaKind,
    /// Index of the first affected line in the previous text.
    pub source_position: usize,
    /// Lines from the previous text (empty for inserts).
    pub source_lines: Vec<String>,
    /// Index of the first affected line in the current text.
    pub target_position: usize,
    /// Lines from the current text (empty for deletes).
    pub target_lines: Vec<String>,
}

/// Details of an input rejected by the size guard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeExceeded {
    pub side: Side,
    pub bytes: usize,
    pub limit: usize,
}

/// Result of a diff request: either the computed view or a skip signal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffOutcome<T> {
    Diffed(T),
    TooLarge(SizeExceeded),
}

impl<T> DiffOutcome<T> {
    pub fn is_too_large(&self) -> bool {
        matches!(self, Self::TooLarge(_))
    }

    /// The computed value, if the inputs were within the size limit.
    pub fn diffed(self) -> Option<T> {
        match self {
            Self::Diffed(value) => Some(value),
            Self::TooLarge(_) => None,
        }
    }

    /// Convert the skip signal into [`DiffError::InputTooLarge`].
    pub fn into_result(self) -> DiffResult<T> {
        match self {
            Self::Diffed(value) => Ok(value),
            Self::TooLarge(SizeExceeded { side, bytes, limit }) => {
                Err(DiffError::InputTooLarge { side, bytes, limit })
            }
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> DiffOutcome<U> {
        match self {
            Self::Diffed(value) => DiffOutcome::Diffed(f(value)),
            Self::TooLarge(exceeded) => DiffOutcome::TooLarge(exceeded),
        }
    }
}

/// A configured, stateless diff engine.
///
/// The engine only holds its configuration, so one instance can be shared
/// freely between threads.
#[derive(Clone, Debug, Default)]
pub struct DiffEngine {
    config: DiffConfig,
}

/// Lines and blocks shared by both result views.
struct LineDiff<'a> {
    source: Lines<'a>,
    target: Lines<'a>,
    blocks: Vec<LineBlock>,
}

impl DiffEngine {
    /// Create an engine after validating `config`.
    pub fn new(config: DiffConfig) -> DiffResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &DiffConfig {
        &self.config
    }

    /// Compute line blocks and inline spans between two snapshots.
    pub fn compute_decorations(&self, previous: &str, current: &str) -> DiffOutcome<Decorations> {
        if let Some(exceeded) = self.check_size(previous, current) {
            return DiffOutcome::TooLarge(exceeded);
        }

        let diff = line_diff(previous, current);
        let inline_spans: Vec<InlineSpan> = diff
            .blocks
            .iter()
            .flat_map(|block| {
                block_spans(
                    block,
                    &diff.source,
                    &diff.target,
                    self.config.granularity,
                    self.config.merge_whitespace_gaps,
                )
            })
            .collect();

        debug!(
            blocks = diff.blocks.len(),
            spans = inline_spans.len(),
            granularity = ?self.config.granularity,
            "decorations computed"
        );
        DiffOutcome::Diffed(Decorations {
            line_blocks: diff.blocks,
            inline_spans,
        })
    }

    /// Compute the flat delta list between two snapshots.
    pub fn compute_deltas(&self, previous: &str, current: &str) -> DiffOutcome<Vec<Delta>> {
        if let Some(exceeded) = self.check_size(previous, current) {
            return DiffOutcome::TooLarge(exceeded);
        }

        let diff = line_diff(previous, current);
        let deltas: Vec<Delta> = diff
            .blocks
            .iter()
            .map(|block| Delta {
                kind: block.kind,
                source_position: block.source_start_line,
                source_lines: diff.source.texts_in(block.source_range()),
                target_position: block.start_line,
                target_lines: diff.target.texts_in(block.target_range()),
            })
            .collect();

        debug!(deltas = deltas.len(), "deltas computed");
        DiffOutcome::Diffed(deltas)
    }

    fn check_size(&self, previous: &str, current: &str) -> Option<SizeExceeded> {
        let limit = self.config.max_input_bytes;
        let exceeded = [(Side::Previous, previous.len()), (Side::Current, current.len())]
            .into_iter()
            .find(|&(_, bytes)| bytes > limit)
            .map(|(side, bytes)| SizeExceeded { side, bytes, limit });
        if let Some(e) = &exceeded {
            debug!(side = %e.side, bytes = e.bytes, limit, "input too large; diff skipped");
        }
        exceeded
    }
}

fn line_diff<'a>(previous: &'a str, current: &'a str) -> LineDiff<'a> {
    let source = Lines::split(previous);
    let target = Lines::split(current);
    let script = EditScript::compute(&source.texts(), &target.texts());
    let blocks = aggregate(&script);
    debug!(
        previous_lines = source.len(),
        current_lines = target.len(),
        runs = script.runs.len(),
        "line diff computed"
    );
    LineDiff {
        source,
        target,
        blocks,
    }
}

/// Compute decorations with the default configuration.
pub fn compute_decorations(previous: &str, current: &str) -> DiffOutcome<Decorations> {
    DiffEngine::default().compute_decorations(previous, current)
}

/// Compute deltas with the default configuration.
pub fn compute_deltas(previous: &str, current: &str) -> DiffOutcome<Vec<Delta>> {
    DiffEngine::default().compute_deltas(previous, current)
}
