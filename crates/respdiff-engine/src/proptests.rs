use proptest::prelude::*;

use crate::{
    compute_decorations, compute_deltas, Decorations, DeltaKind, DiffConfig, DiffEngine,
    InlineGranularity, Lines,
};

/// Texts built from a small alphabet so that lines collide often.
fn text() -> impl Strategy<Value = String> {
    prop::collection::vec("[ab \u{e9}\u{1F600}]{0,5}", 0..10).prop_map(|lines| lines.join("\n"))
}

fn granularity() -> impl Strategy<Value = InlineGranularity> {
    prop_oneof![
        Just(InlineGranularity::Word),
        Just(InlineGranularity::Token),
        Just(InlineGranularity::Char),
    ]
}

fn decorate(previous: &str, current: &str) -> Decorations {
    compute_decorations(previous, current)
        .diffed()
        .expect("small inputs are never skipped")
}

proptest! {
    #[test]
    fn identical_inputs_have_no_decorations(t in text()) {
        prop_assert!(decorate(&t, &t).is_empty());
    }

    #[test]
    fn blocks_cover_exactly_the_changed_lines(previous in text(), current in text()) {
        let deco = decorate(&previous, &current);
        let source = Lines::split(&previous);
        let target = Lines::split(&current);

        for pair in deco.line_blocks.windows(2) {
            prop_assert!(pair[0].target_range().end <= pair[1].start_line);
            prop_assert!(pair[0].source_range().end <= pair[1].source_start_line);
        }
        for block in &deco.line_blocks {
            match block.kind {
                DeltaKind::Delete => {
                    prop_assert_eq!(block.line_count, 0);
                    prop_assert!(block.source_line_count > 0);
                }
                DeltaKind::Insert => {
                    prop_assert!(block.line_count > 0);
                    prop_assert_eq!(block.source_line_count, 0);
                }
                DeltaKind::Change => {
                    prop_assert!(block.line_count > 0);
                    prop_assert!(block.source_line_count > 0);
                }
            }
            prop_assert!(block.target_range().end <= target.len());
            prop_assert!(block.source_range().end <= source.len());
        }

        // Whatever no block claims must be the unchanged, common part.
        let untouched_target: Vec<&str> = target
            .iter()
            .filter(|l| !deco.line_blocks.iter().any(|b| b.target_range().contains(&l.index)))
            .map(|l| l.text)
            .collect();
        let untouched_source: Vec<&str> = source
            .iter()
            .filter(|l| !deco.line_blocks.iter().any(|b| b.source_range().contains(&l.index)))
            .map(|l| l.text)
            .collect();
        prop_assert_eq!(untouched_target, untouched_source);
    }

    #[test]
    fn inline_spans_stay_inside_change_blocks(
        previous in text(),
        current in text(),
        g in granularity(),
        merge in any::<bool>(),
    ) {
        let config = DiffConfig { granularity: g, merge_whitespace_gaps: merge, ..Default::default() };
        let engine = DiffEngine::new(config).unwrap();
        let deco = engine.compute_decorations(&previous, &current).diffed().unwrap();
        let target = Lines::split(&current);

        for pair in deco.inline_spans.windows(2) {
            prop_assert!(
                (pair[0].line, pair[0].end_col_utf16) <= (pair[1].line, pair[1].start_col_utf16)
            );
        }
        for span in &deco.inline_spans {
            let owner = deco.block_for_line(span.line);
            prop_assert!(owner.is_some());
            let owner = owner.unwrap();
            prop_assert_eq!(owner.kind, DeltaKind::Change);
            prop_assert!(span.line < owner.start_line + owner.paired_lines());

            let line = target.get(span.line).unwrap();
            prop_assert!(span.start_col_utf16 < span.end_col_utf16);
            prop_assert!(span.end_col_utf16 <= line.utf16_len);
            prop_assert!(crate::utf16_to_byte(line.text, span.start_col_utf16).is_some());
            prop_assert!(crate::utf16_to_byte(line.text, span.end_col_utf16).is_some());
        }
    }

    #[test]
    fn results_are_deterministic(previous in text(), current in text()) {
        prop_assert_eq!(decorate(&previous, &current), decorate(&previous, &current));
        prop_assert_eq!(compute_deltas(&previous, &current), compute_deltas(&previous, &current));
    }

    #[test]
    fn deltas_rebuild_the_current_text(previous in text(), current in text()) {
        let deltas = compute_deltas(&previous, &current).diffed().unwrap();
        let source = Lines::split(&previous).texts();

        let mut rebuilt: Vec<String> = Vec::new();
        let mut cursor = 0usize;
        for delta in &deltas {
            rebuilt.extend(source[cursor..delta.source_position].iter().map(|s| s.to_string()));
            prop_assert_eq!(rebuilt.len(), delta.target_position);
            rebuilt.extend(delta.target_lines.iter().cloned());
            cursor = delta.source_position + delta.source_lines.len();
        }
        rebuilt.extend(source[cursor..].iter().map(|s| s.to_string()));

        prop_assert_eq!(rebuilt, Lines::split(&current).texts());
    }

    #[test]
    fn both_views_share_block_boundaries(previous in text(), current in text()) {
        let deco = decorate(&previous, &current);
        let deltas = compute_deltas(&previous, &current).diffed().unwrap();
        prop_assert_eq!(deco.line_blocks.len(), deltas.len());
        for (block, delta) in deco.line_blocks.iter().zip(&deltas) {
            prop_assert_eq!(block.kind, delta.kind);
            prop_assert_eq!(block.target_range(), delta.target_position..delta.target_position + delta.target_lines.len());
            prop_assert_eq!(block.source_range(), delta.source_position..delta.source_position + delta.source_lines.len());
        }
    }

    #[test]
    fn size_gate_follows_the_limit(previous in text(), current in text()) {
        let limit = previous.len().max(current.len());
        prop_assume!(limit > 0);
        let engine = DiffEngine::new(DiffConfig::default().with_max_input_bytes(limit)).unwrap();
        prop_assert!(!engine.compute_decorations(&previous, &current).is_too_large());

        let bigger = format!("{current}!");
        prop_assert!(engine.compute_decorations(&previous, &bigger).is_too_large() == (bigger.len() > limit));
    }
}
