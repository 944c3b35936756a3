//! Terminal rendering of diff results.
//!
//! The whole current body is shown with a two-character gutter. Removed
//! previous lines are shown in red where they used to be, inserted lines in
//! green, and changed lines in yellow with their inline spans reversed.

use std::fmt::Write as _;

use colored::Colorize;
use respdiff_engine::{
    utf16_to_byte, Decorations, Delta, DeltaKind, InlineSpan, LineBlock, Lines,
    SizeExceeded,
};

pub const TOO_LARGE_MESSAGE: &str = "Response is too large to diff";

pub fn render_too_large(exceeded: &SizeExceeded) -> String {
    format!(
        "{}\n{}\n",
        TOO_LARGE_MESSAGE.yellow().bold(),
        format!(
            "  ({} body is {} bytes; limit is {})",
            exceeded.side, exceeded.bytes, exceeded.limit
        )
        .dimmed()
    )
}

/// Render the current body annotated with `deco`.
pub fn render_decorations(previous: &str, current: &str, deco: &Decorations) -> String {
    let source = Lines::split(previous);
    let target = Lines::split(current);
    let mut out = String::new();

    let mut blocks = deco.line_blocks.iter().peekable();
    let mut spans = deco.inline_spans.iter().peekable();
    // Block covering the target line being rendered, if any.
    let mut owner: Option<&LineBlock> = None;

    for i in 0..=target.len() {
        // Removed lines go above the first line of their block.
        while let Some(block) = blocks.next_if(|b| b.start_line == i) {
            for line in block.source_range().filter_map(|n| source.get(n)) {
                let _ = writeln!(out, "{}", format!("- {}", line.text).red());
            }
            if block.line_count > 0 {
                owner = Some(block);
            }
        }
        owner = owner.filter(|b| b.contains_target_line(i));

        let Some(line) = target.get(i) else {
            break;
        };
        let mut line_spans: Vec<&InlineSpan> = Vec::new();
        while let Some(span) = spans.next_if(|s| s.line == i) {
            line_spans.push(span);
        }

        match owner {
            Some(block) if block.kind == DeltaKind::Insert => {
                let _ = writeln!(out, "{}", format!("+ {}", line.text).green());
            }
            Some(block) if i < block.start_line + block.paired_lines() => {
                let _ = writeln!(out, "{}", highlight_line(line.text, &line_spans));
            }
            Some(_) => {
                let _ = writeln!(out, "{}", format!("+ {}", line.text).green());
            }
            None => {
                let _ = writeln!(out, "  {}", line.text);
            }
        }
    }

    out
}

fn highlight_line(text: &str, spans: &[&InlineSpan]) -> String {
    let mut out = format!("{}", "~ ".yellow());
    let mut cursor = 0usize;
    for span in spans {
        let (Some(start), Some(end)) = (
            utf16_to_byte(text, span.start_col_utf16),
            utf16_to_byte(text, span.end_col_utf16),
        ) else {
            continue;
        };
        if start < cursor {
            continue;
        }
        let _ = write!(
            out,
            "{}{}",
            text[cursor..start].yellow(),
            text[start..end].yellow().reversed()
        );
        cursor = end;
    }
    let _ = write!(out, "{}", text[cursor..].yellow());
    out
}

/// One-line summary of a decorations result.
pub fn render_summary(deco: &Decorations) -> String {
    if deco.is_empty() {
        return format!("{}", "No differences.".green());
    }
    format!(
        "{} inserted, {} deleted, {} changed",
        deco.inserted_lines().to_string().green(),
        deco.deleted_lines().to_string().red(),
        deco.changed_lines().to_string().yellow()
    )
}

/// Render the flat delta list, one section per delta.
pub fn render_deltas(deltas: &[Delta]) -> String {
    let mut out = String::new();
    if deltas.is_empty() {
        let _ = writeln!(out, "{}", "No differences.".green());
        return out;
    }
    for delta in deltas {
        let header = format!(
            "@@ {} previous:{} current:{} @@",
            delta.kind, delta.source_position, delta.target_position
        );
        let _ = writeln!(out, "{}", header.cyan().bold());
        for line in &delta.source_lines {
            let _ = writeln!(out, "{}", format!("- {line}").red());
        }
        for line in &delta.target_lines {
            let _ = writeln!(out, "{}", format!("+ {line}").green());
        }
    }
    out
}
