//! Inline (sub-line) diffing inside `CHANGE` blocks.
//!
//! Source line `i` of a block is paired with target line `i` for every
//! `i < min(source_line_count, line_count)`. Each pair is tokenized and
//! diffed; target-side inserted tokens become [`InlineSpan`]s measured in
//! UTF-16 code units. Unpaired target lines get no spans and are shown as
//! whole-line insertions by the caller.

use serde::{Deserialize, Serialize};

use crate::blocks::{DeltaKind, LineBlock};
use crate::line::Lines;
use crate::offset::utf16_len;
use crate::script::{EditScript, RunTag};

/// A half-open range of UTF-16 code units within one target line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineSpan {
    /// Target line index.
    pub line: usize,
    pub start_col_utf16: usize,
    pub end_col_utf16: usize,
}

impl InlineSpan {
    /// Width in UTF-16 code units.
    pub fn len(&self) -> usize {
        self.end_col_utf16 - self.start_col_utf16
    }

    pub fn is_empty(&self) -> bool {
        self.start_col_utf16 >= self.end_col_utf16
    }
}

/// Token model for the per-line diff.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InlineGranularity {
    /// Runs of whitespace and runs of non-whitespace.
    #[default]
    Word,
    /// Identifier-like runs, whitespace runs, and single punctuation marks.
    Token,
    /// Individual characters.
    Char,
}

impl std::str::FromStr for InlineGranularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "word" => Ok(Self::Word),
            "token" => Ok(Self::Token),
            "char" => Ok(Self::Char),
            other => Err(format!("unknown inline granularity: {other}")),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Token<'a> {
    text: &'a str,
    start_utf16: usize,
    end_utf16: usize,
    whitespace: bool,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Space,
    Word,
    Other,
}

fn classify(c: char, granularity: InlineGranularity) -> CharClass {
    if c.is_whitespace() {
        return CharClass::Space;
    }
    match granularity {
        InlineGranularity::Word => CharClass::Word,
        InlineGranularity::Token | InlineGranularity::Char => {
            if c.is_alphanumeric() || c == '_' {
                CharClass::Word
            } else {
                CharClass::Other
            }
        }
    }
}

fn tokenize(line: &str, granularity: InlineGranularity) -> Vec<Token<'_>> {
    let mut tokens: Vec<Token<'_>> = Vec::new();
    let mut start_byte = 0usize;
    let mut start_utf16 = 0usize;
    let mut utf16_pos = 0usize;
    let mut current: Option<CharClass> = None;

    for (byte, c) in line.char_indices() {
        let class = classify(c, granularity);
        let splits = match current {
            None => false,
            Some(_) if granularity == InlineGranularity::Char => true,
            Some(CharClass::Other) => true,
            Some(prev) => prev != class,
        };
        if splits {
            tokens.push(Token {
                text: &line[start_byte..byte],
                start_utf16,
                end_utf16: utf16_pos,
                whitespace: current == Some(CharClass::Space),
            });
            start_byte = byte;
            start_utf16 = utf16_pos;
        }
        current = Some(class);
        utf16_pos += c.len_utf16();
    }

    if let Some(class) = current {
        tokens.push(Token {
            text: &line[start_byte..],
            start_utf16,
            end_utf16: utf16_pos,
            whitespace: class == CharClass::Space,
        });
    }
    tokens
}

/// Diff one paired line and return the changed spans on the target side.
pub fn line_spans(
    source_line: &str,
    target_line: &str,
    target_index: usize,
    granularity: InlineGranularity,
    merge_whitespace_gaps: bool,
) -> Vec<InlineSpan> {
    if source_line == target_line {
        return Vec::new();
    }

    let source_tokens = tokenize(source_line, granularity);
    let target_tokens = tokenize(target_line, granularity);
    let source_texts: Vec<&str> = source_tokens.iter().map(|t| t.text).collect();
    let target_texts: Vec<&str> = target_tokens.iter().map(|t| t.text).collect();
    let script = EditScript::compute(&source_texts, &target_texts);

    // Token ranges first, so gaps can be inspected before converting to columns.
    let mut ranges: Vec<std::ops::Range<usize>> = Vec::new();
    for run in script.runs.iter().filter(|r| r.tag == RunTag::Insert) {
        if let Some(last) = ranges.last_mut() {
            let gap = &target_tokens[last.end..run.target.start];
            if gap.is_empty() || (merge_whitespace_gaps && gap.iter().all(|t| t.whitespace)) {
                last.end = run.target.end;
                continue;
            }
        }
        ranges.push(run.target.clone());
    }

    let line_len = utf16_len(target_line);
    ranges
        .into_iter()
        .filter(|r| !r.is_empty())
        .map(|r| InlineSpan {
            line: target_index,
            start_col_utf16: target_tokens[r.start].start_utf16,
            end_col_utf16: target_tokens[r.end - 1].end_utf16.min(line_len),
        })
        .filter(|span| !span.is_empty())
        .collect()
}

/// Compute inline spans for every paired line of a `CHANGE` block.
///
/// Other block kinds produce no spans.
pub fn block_spans(
    block: &LineBlock,
    source: &Lines<'_>,
    target: &Lines<'_>,
    granularity: InlineGranularity,
    merge_whitespace_gaps: bool,
) -> Vec<InlineSpan> {
    if block.kind != DeltaKind::Change {
        return Vec::new();
    }

    let mut spans = Vec::new();
    for i in 0..block.paired_lines() {
        let (Some(src), Some(tgt)) = (
            source.get(block.source_start_line + i),
            target.get(block.start_line + i),
        ) else {
            break;
        };
        spans.extend(line_spans(
            src.text,
            tgt.text,
            tgt.index,
            granularity,
            merge_whitespace_gaps,
        ));
    }
    spans
}
