//! Diff engine for HTTP response bodies.
//!
//! Given the previous and current body of a response, computes a
//! renderer-agnostic description of what changed: line-level blocks and,
//! inside changed regions, inline spans measured in UTF-16 code units so a
//! host editor can highlight them directly.
//!
//! The engine is pure. It holds no state between calls, performs no I/O,
//! and leaves the choice of *when* to diff to the caller.
//!
//! # Key Types
//!
//! - [`DiffEngine`] / [`DiffConfig`] -- Configured entry point with a size guard
//! - [`Decorations`] / [`LineBlock`] / [`InlineSpan`] -- Structured view
//! - [`Delta`] -- Flat view carrying the affected line texts
//! - [`DiffOutcome`] -- Computed result or the "too large" signal
//! - [`LineOffsets`] -- Absolute UTF-16 offsets for highlighting

pub mod blocks;
pub mod config;
pub mod engine;
pub mod error;
pub mod inline;
pub mod line;
pub mod offset;
pub mod script;

#[cfg(test)]
mod proptests;

pub use blocks::{DeltaKind, LineBlock};
pub use config::{DiffConfig, DEFAULT_MAX_INPUT_BYTES};
pub use engine::{
    compute_decorations, compute_deltas, Decorations, Delta, DiffEngine, DiffOutcome, SizeExceeded,
    Side,
};
pub use error::{DiffError, DiffResult};
pub use inline::{InlineGranularity, InlineSpan};
pub use line::{Line, Lines};
pub use offset::{byte_to_utf16, utf16_len, utf16_to_byte, LineOffsets};
pub use script::{EditScript, Run, RunTag};
