use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use respdiff_engine::{DiffConfig, DiffEngine, DiffOutcome};
use serde_json::json;
use tracing::{debug, info};

use crate::cli::*;
use crate::history::{Capture, ResponseHistory};
use crate::render;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let output = match cli.command {
        Command::Diff(args) => cmd_diff(config, args, cli.format)?,
        Command::Replay(args) => cmd_replay(config, args, cli.format)?,
    };
    print!("{output}");
    Ok(())
}

/// Load a configuration file, or the defaults when none is given.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<DiffConfig> {
    let Some(path) = path else {
        return Ok(DiffConfig::default());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config: DiffConfig =
        toml::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))?;
    info!(path = %path.display(), "loaded diff configuration");
    Ok(config)
}

fn build_engine(mut config: DiffConfig, overrides: &EngineArgs) -> anyhow::Result<DiffEngine> {
    if let Some(max) = overrides.max_bytes {
        config.max_input_bytes = max;
    }
    if let Some(granularity) = overrides.granularity {
        config.granularity = granularity;
    }
    if overrides.no_merge {
        config.merge_whitespace_gaps = false;
    }
    debug!(?config, "engine configuration");
    Ok(DiffEngine::new(config)?)
}

fn read_body(path: &Path) -> anyhow::Result<String> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn cmd_diff(config: DiffConfig, args: DiffArgs, format: OutputFormat) -> anyhow::Result<String> {
    let engine = build_engine(config, &args.engine)?;
    let previous = read_body(&args.previous)?;
    let current = read_body(&args.current)?;
    diff_report(&engine, &previous, &current, args.deltas, format)
}

/// Diff two bodies and format the result.
pub fn diff_report(
    engine: &DiffEngine,
    previous: &str,
    current: &str,
    deltas: bool,
    format: OutputFormat,
) -> anyhow::Result<String> {
    if deltas {
        return match (engine.compute_deltas(previous, current), format) {
            (DiffOutcome::Diffed(d), OutputFormat::Text) => Ok(render::render_deltas(&d)),
            (DiffOutcome::Diffed(d), OutputFormat::Json) => to_json(&json!(d)),
            (DiffOutcome::TooLarge(e), OutputFormat::Text) => Ok(render::render_too_large(&e)),
            (DiffOutcome::TooLarge(e), OutputFormat::Json) => to_json(&json!({ "skipped": e })),
        };
    }

    match (engine.compute_decorations(previous, current), format) {
        (DiffOutcome::Diffed(deco), OutputFormat::Text) => Ok(format!(
            "{}{}\n",
            render::render_decorations(previous, current, &deco),
            render::render_summary(&deco)
        )),
        (DiffOutcome::Diffed(deco), OutputFormat::Json) => to_json(&json!(deco)),
        (DiffOutcome::TooLarge(e), OutputFormat::Text) => Ok(render::render_too_large(&e)),
        (DiffOutcome::TooLarge(e), OutputFormat::Json) => to_json(&json!({ "skipped": e })),
    }
}

fn to_json(value: &serde_json::Value) -> anyhow::Result<String> {
    let mut s = serde_json::to_string_pretty(value).context("serializing result")?;
    s.push('\n');
    Ok(s)
}

fn cmd_replay(config: DiffConfig, args: ReplayArgs, format: OutputFormat) -> anyhow::Result<String> {
    let engine = build_engine(config, &args.engine)?;
    let raw = std::fs::read_to_string(&args.captures)
        .with_context(|| format!("reading {}", args.captures.display()))?;
    let seed = args.seed.as_deref().map(read_body).transpose()?;
    replay(&engine, &raw, seed, format)
}

/// Walk a JSON-lines capture log, diffing each response against the last
/// comparable one. A `seed` body, if given, is comparable with any service.
/// Bodies over the engine's size limit are reported but never become the
/// previous response.
pub fn replay(
    engine: &DiffEngine,
    captures: &str,
    seed: Option<String>,
    format: OutputFormat,
) -> anyhow::Result<String> {
    let mut history = seed.map(ResponseHistory::with_body).unwrap_or_default();
    let mut text = String::new();
    let mut entries = Vec::new();

    for (n, line) in captures.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let capture: Capture = serde_json::from_str(line)
            .with_context(|| format!("parsing capture on line {}", n + 1))?;
        if capture.body.is_empty() {
            debug!(line = n + 1, "empty body; capture ignored");
            continue;
        }

        let header = format!("== #{} {} ==", n + 1, capture.service);
        let previous = history.comparable_previous(&capture.service, &capture.body);
        match (previous, format) {
            (None, OutputFormat::Text) => {
                text.push_str(&format!("{}\n", header.cyan().bold()));
                text.push_str(&format!("{}\n", "(no comparable previous response)".dimmed()));
            }
            (None, OutputFormat::Json) => {
                entries.push(json!({ "line": n + 1, "service": capture.service, "result": null }));
            }
            (Some(previous), OutputFormat::Text) => {
                text.push_str(&format!("{}\n", header.cyan().bold()));
                text.push_str(&diff_report(engine, previous, &capture.body, false, format)?);
            }
            (Some(previous), OutputFormat::Json) => {
                let result = match engine.compute_decorations(previous, &capture.body) {
                    DiffOutcome::Diffed(deco) => json!(deco),
                    DiffOutcome::TooLarge(e) => json!({ "skipped": e }),
                };
                entries.push(json!({ "line": n + 1, "service": capture.service, "result": result }));
            }
        }

        if capture.body.len() > engine.config().max_input_bytes {
            debug!(line = n + 1, bytes = capture.body.len(), "oversized body kept out of history");
            continue;
        }
        history.record(capture.service, capture.body);
    }

    debug!(last_service = ?history.last_service(), "replay finished");
    match format {
        OutputFormat::Text => Ok(text),
        OutputFormat::Json => to_json(&json!(entries)),
    }
}
