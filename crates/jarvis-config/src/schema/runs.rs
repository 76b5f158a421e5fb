//! Run execution settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How responses are obtained from a run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum ResponseMode {
    /// Live event stream, text printed as it arrives.
    #[default]
    Stream,
    /// Poll the run until it finishes, then fetch the messages.
    Poll,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunsConfig {
    pub mode: ResponseMode,
    /// Delay between run/ingestion status checks (valid range: 0-60000).
    pub poll_interval_ms: u64,
    /// Tool-output resubmissions allowed per run (valid range: 1-50).
    pub max_tool_rounds: u32,
}

impl RunsConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for RunsConfig {
    fn default() -> Self {
        Self {
            mode: ResponseMode::Stream,
            poll_interval_ms: 1000,
            max_tool_rounds: 10,
        }
    }
}
