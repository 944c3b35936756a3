use serde::{Deserialize, Serialize};

use crate::error::{DiffError, DiffResult};
use crate::inline::InlineGranularity;

/// Default per-side size threshold, in bytes.
pub const DEFAULT_MAX_INPUT_BYTES: usize = 750_000;

/// Configuration for a [`DiffEngine`](crate::DiffEngine).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffConfig {
    /// Inputs longer than this many bytes (on either side) are not diffed.
    pub max_input_bytes: usize,
    /// Token model used when diffing paired lines inside a change region.
    pub granularity: InlineGranularity,
    /// Merge changed runs that are separated only by whitespace.
    pub merge_whitespace_gaps: bool,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
            granularity: InlineGranularity::Word,
            merge_whitespace_gaps: true,
        }
    }
}

impl DiffConfig {
    /// A configuration without a size guard.
    ///
    /// Only appropriate when the caller already bounds its inputs.
    pub fn unbounded() -> Self {
        Self {
            max_input_bytes: usize::MAX,
            ..Default::default()
        }
    }

    /// Builder-style override of the size threshold.
    pub fn with_max_input_bytes(mut self, max_input_bytes: usize) -> Self {
        self.max_input_bytes = max_input_bytes;
        self
    }

    /// Builder-style override of the inline granularity.
    pub fn with_granularity(mut self, granularity: InlineGranularity) -> Self {
        self.granularity = granularity;
        self
    }

    /// Check that the configuration can drive an engine.
    pub fn validate(&self) -> DiffResult<()> {
        if self.max_input_bytes == 0 {
            return Err(DiffError::InvalidConfig(
                "max_input_bytes must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}
