//! Token usage tracking across threads.

use std::collections::HashMap;

use crate::gateway::RunUsage;

/// Tracks cumulative token usage per thread alias.
#[derive(Debug, Clone, Default)]
pub struct TokenTracker {
    /// Total usage across all threads.
    total: RunUsage,
    /// Usage broken down by thread alias.
    by_thread: HashMap<String, RunUsage>,
    /// Number of runs that reported usage.
    run_count: u64,
}

impl TokenTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record token usage from a finished run.
    pub fn record(&mut self, thread: &str, usage: &RunUsage) {
        self.total.prompt_tokens += usage.prompt_tokens;
        self.total.completion_tokens += usage.completion_tokens;
        self.run_count += 1;

        let entry = self.by_thread.entry(thread.to_string()).or_default();
        entry.prompt_tokens += usage.prompt_tokens;
        entry.completion_tokens += usage.completion_tokens;
    }

    pub fn total(&self) -> &RunUsage {
        &self.total
    }

    pub fn for_thread(&self, thread: &str) -> Option<&RunUsage> {
        self.by_thread.get(thread)
    }

    /// Get total tokens (prompt + completion).
    pub fn total_tokens(&self) -> u64 {
        self.total.total()
    }

    pub fn run_count(&self) -> u64 {
        self.run_count
    }

    /// Move a thread's usage to a new alias.
    pub(crate) fn rename_thread(&mut self, old: &str, new: &str) {
        if let Some(usage) = self.by_thread.remove(old) {
            self.by_thread.insert(new.to_string(), usage);
        }
    }

    pub fn reset(&mut self) {
        self.total = RunUsage::default();
        self.by_thread.clear();
        self.run_count = 0;
    }
}
