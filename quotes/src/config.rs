//! # Configuration
//!
//! Module dedicated to the extraction configuration.

/// Default maximum number of lines processed by the line marker
/// algorithm.
pub const MAX_LINES_COUNT: usize = 1000;

/// Default maximum number of checkpoints stamped into a markup tree.
pub const NODE_LIMIT: usize = 1000;

/// Maximum number of lines a splitter can spread across.
pub const SPLITTER_MAX_LINES: usize = 4;

/// The extraction configuration.
///
/// Both limits act as circuit breakers: when an input exceeds one of
/// them, the expensive checkpoint method is skipped in favour of the
/// cheaper heuristic one.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(
    feature = "derive",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case", default)
)]
pub struct QuotesConfig {
    /// The maximum number of lines analyzed.
    ///
    /// Plain text bodies are truncated to this amount of lines
    /// before being analyzed. HTML bodies whose text projection is
    /// longer are considered too long for the checkpoint method.
    pub max_lines_count: usize,

    /// The maximum number of checkpoints stamped into an HTML tree.
    pub node_limit: usize,
}

impl Default for QuotesConfig {
    fn default() -> Self {
        Self {
            max_lines_count: MAX_LINES_COUNT,
            node_limit: NODE_LIMIT,
        }
    }
}

impl QuotesConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_max_lines_count(&mut self, count: usize) {
        self.max_lines_count = count;
    }

    pub fn with_max_lines_count(mut self, count: usize) -> Self {
        self.set_max_lines_count(count);
        self
    }

    pub fn set_some_max_lines_count(&mut self, count: Option<usize>) {
        if let Some(count) = count {
            self.set_max_lines_count(count);
        }
    }

    pub fn with_some_max_lines_count(mut self, count: Option<usize>) -> Self {
        self.set_some_max_lines_count(count);
        self
    }

    pub fn set_node_limit(&mut self, limit: usize) {
        self.node_limit = limit;
    }

    pub fn with_node_limit(mut self, limit: usize) -> Self {
        self.set_node_limit(limit);
        self
    }

    pub fn set_some_node_limit(&mut self, limit: Option<usize>) {
        if let Some(limit) = limit {
            self.set_node_limit(limit);
        }
    }

    pub fn with_some_node_limit(mut self, limit: Option<usize>) -> Self {
        self.set_some_node_limit(limit);
        self
    }
}
