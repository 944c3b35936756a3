//! Shortest edit scripts over token sequences.
//!
//! Uses the Myers algorithm from the `similar` crate and coalesces its raw
//! ops into runs. The same routine serves the line-level differ (tokens are
//! whole lines) and the inline differ (tokens are words or characters).

use std::convert::Infallible;
use std::hash::Hash;
use std::ops::Range;

use similar::algorithms::{myers, DiffHook, IdentifyDistinct};

/// The kind of a run in an edit script.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunTag {
    Equal,
    Delete,
    Insert,
}

/// A maximal stretch of ops with the same tag.
///
/// `source` indexes the old sequence, `target` the new one. For `Delete`
/// the target range is empty and marks the position the removal happened
/// at; for `Insert` the source range is empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Run {
    pub tag: RunTag,
    pub source: Range<usize>,
    pub target: Range<usize>,
}

/// An ordered edit script covering both sequences end to end.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EditScript {
    pub runs: Vec<Run>,
}

impl EditScript {
    /// Compute the edit script turning `source` into `target`.
    ///
    /// Tokens are first mapped to integer ids so the Myers search compares
    /// integers instead of whole lines.
    pub fn compute<T: Hash + Eq>(source: &[T], target: &[T]) -> Self {
        let ids = IdentifyDistinct::<u32>::new(source, 0..source.len(), target, 0..target.len());
        let mut collector = RunCollector::default();
        let result: Result<(), Infallible> = myers::diff(
            &mut collector,
            ids.old_lookup(),
            ids.old_range(),
            ids.new_lookup(),
            ids.new_range(),
        );
        if let Err(never) = result {
            match never {}
        }
        Self {
            runs: collector.runs,
        }
    }

    /// Returns `true` if both sequences are identical.
    pub fn is_identity(&self) -> bool {
        self.runs.iter().all(|r| r.tag == RunTag::Equal)
    }

    /// Iterate over the non-equal regions of the script.
    ///
    /// Each region is the union of all consecutive delete and insert runs
    /// between two equal runs, returned as `(source, target)` ranges.
    pub fn regions(&self) -> impl Iterator<Item = (Range<usize>, Range<usize>)> + '_ {
        let mut runs = self.runs.iter().peekable();
        std::iter::from_fn(move || {
            while let Some(run) = runs.next() {
                if run.tag == RunTag::Equal {
                    continue;
                }
                let mut source = run.source.clone();
                let mut target = run.target.clone();
                while let Some(next) = runs.peek() {
                    if next.tag == RunTag::Equal {
                        break;
                    }
                    source.end = next.source.end;
                    target.end = next.target.end;
                    runs.next();
                }
                return Some((source, target));
            }
            None
        })
    }
}

/// Receives Myers callbacks and coalesces them into runs.
#[derive(Default)]
struct RunCollector {
    runs: Vec<Run>,
}

impl DiffHook for RunCollector {
    type Error = Infallible;

    fn equal(&mut self, old_index: usize, new_index: usize, len: usize) -> Result<(), Infallible> {
        push_run(
            &mut self.runs,
            RunTag::Equal,
            old_index..old_index + len,
            new_index..new_index + len,
        );
        Ok(())
    }

    fn delete(&mut self, old_index: usize, old_len: usize, new_index: usize) -> Result<(), Infallible> {
        push_run(
            &mut self.runs,
            RunTag::Delete,
            old_index..old_index + old_len,
            new_index..new_index,
        );
        Ok(())
    }

    fn insert(&mut self, old_index: usize, new_index: usize, new_len: usize) -> Result<(), Infallible> {
        push_run(
            &mut self.runs,
            RunTag::Insert,
            old_index..old_index,
            new_index..new_index + new_len,
        );
        Ok(())
    }
}

fn push_run(runs: &mut Vec<Run>, tag: RunTag, source: Range<usize>, target: Range<usize>) {
    if source.is_empty() && target.is_empty() {
        return;
    }
    if let Some(last) = runs.last_mut() {
        if last.tag == tag && last.source.end == source.start && last.target.end == target.start {
            last.source.end = source.end;
            last.target.end = target.end;
            return;
        }
    }
    runs.push(Run {
        tag,
        source,
        target,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(script: &EditScript) -> Vec<RunTag> {
        script.runs.iter().map(|r| r.tag).collect()
    }

    #[test]
    fn identical_sequences() {
        let script = EditScript::compute(&["a", "b"], &["a", "b"]);
        assert!(script.is_identity());
        assert_eq!(script.runs.len(), 1);
        assert_eq!(script.regions().count(), 0);
    }

    #[test]
    fn both_empty() {
        let script = EditScript::compute::<&str>(&[], &[]);
        assert!(script.runs.is_empty());
        assert!(script.is_identity());
    }

    #[test]
    fn single_replacement() {
        let script = EditScript::compute(&["a", "b", "c"], &["a", "X", "c"]);
        let tags = tags(&script);
        assert_eq!(tags.first(), Some(&RunTag::Equal));
        assert_eq!(tags.last(), Some(&RunTag::Equal));
        assert!(tags.contains(&RunTag::Delete));
        assert!(tags.contains(&RunTag::Insert));
        let regions: Vec<_> = script.regions().collect();
        assert_eq!(regions, vec![(1..2, 1..2)]);
    }

    #[test]
    fn pure_insert_at_end() {
        let script = EditScript::compute(&["a", "b"], &["a", "b", "c"]);
        assert_eq!(tags(&script), vec![RunTag::Equal, RunTag::Insert]);
        assert_eq!(script.runs[1].source, 2..2);
        assert_eq!(script.runs[1].target, 2..3);
    }

    #[test]
    fn pure_delete_in_middle() {
        let script = EditScript::compute(&["a", "b", "c"], &["a", "c"]);
        let regions: Vec<_> = script.regions().collect();
        assert_eq!(regions, vec![(1..2, 1..1)]);
    }

    #[test]
    fn runs_cover_both_sequences() {
        let old = ["x", "a", "b", "y", "c", "z"];
        let new = ["a", "q", "b", "c", "w", "w"];
        let script = EditScript::compute(&old, &new);

        let mut source_pos = 0;
        let mut target_pos = 0;
        for run in &script.runs {
            assert_eq!(run.source.start, source_pos);
            assert_eq!(run.target.start, target_pos);
            source_pos = run.source.end;
            target_pos = run.target.end;
        }
        assert_eq!(source_pos, old.len());
        assert_eq!(target_pos, new.len());
    }

    #[test]
    fn adjacent_runs_never_share_a_tag() {
        let old: Vec<u32> = (0..40).collect();
        let new: Vec<u32> = (0..40).filter(|n| n % 3 != 0).chain(100..105).collect();
        let script = EditScript::compute(&old, &new);
        for pair in script.runs.windows(2) {
            assert_ne!(pair[0].tag, pair[1].tag);
        }
    }

    #[test]
    fn long_shared_lines_are_matched() {
        let common = "x".repeat(4096);
        let old = vec![common.as_str(), "old", common.as_str()];
        let new = vec![common.as_str(), "new", common.as_str(), "tail"];
        let script = EditScript::compute(&old, &new);
        let regions: Vec<_> = script.regions().collect();
        assert_eq!(regions, vec![(1..2, 1..2), (3..3, 3..4)]);
    }

    #[test]
    fn deterministic_output() {
        let old = ["a", "b", "a", "b", "a"];
        let new = ["b", "a", "b", "a", "b"];
        assert_eq!(
            EditScript::compute(&old, &new),
            EditScript::compute(&old, &new)
        );
    }
}
