//! Path exclusion module
//!
//! Decides whether a changed path is excluded from analysis. Matching is
//! plain case-sensitive substring containment, not anchored and not
//! path-segment-aware: a pattern like `/tags` excludes every path that
//! mentions it anywhere.

/// Substring-based path exclusion filter
#[derive(Debug, Clone, Default)]
pub struct PathFilter {
    patterns: Vec<String>,
}

impl PathFilter {
    /// Create a filter from a set of substring patterns
    ///
    /// An empty pattern set ignores nothing.
    pub fn new(patterns: Vec<String>) -> Self {
        PathFilter { patterns }
    }

    /// Check whether a path is excluded from analysis
    pub fn is_ignored(&self, path: &str) -> bool {
        self.patterns
            .iter()
            .any(|pattern| path.contains(pattern.as_str()))
    }
}
