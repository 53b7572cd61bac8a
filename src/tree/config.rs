//! Configuration types for tree scans

/// Per-scan traversal options. Fixed for the lifetime of one scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOptions {
    /// List files as well as directories.
    pub include_files: bool,
    /// Deepest level whose directories are listed. The root is depth 0;
    /// directories at this depth appear without children.
    pub max_depth: Option<usize>,
    /// When false, neither the directory nor the file rules are consulted.
    pub apply_filters: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            include_files: true,
            max_depth: None,
            apply_filters: true,
        }
    }
}

impl ScanOptions {
    /// Check if a directory at `depth` must not be descended into.
    pub fn at_max_depth(&self, depth: usize) -> bool {
        self.max_depth.is_some_and(|max| depth >= max)
    }

    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn dirs_only(mut self) -> Self {
        self.include_files = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_limit_is_inclusive() {
        let options = ScanOptions::default().with_max_depth(Some(2));
        assert!(!options.at_max_depth(0));
        assert!(!options.at_max_depth(1));
        assert!(options.at_max_depth(2));
        assert!(options.at_max_depth(3));
        assert!(!ScanOptions::default().at_max_depth(usize::MAX));
    }
}
