//! The filter rule set and its two predicates

use std::collections::BTreeSet;
use std::path::Path;

use chrono::{DateTime, Utc};

use crate::error::FilterError;

use super::metadata::FileMetadata;
use super::patterns::PatternSet;

/// Directory names skipped by the built-in rule set.
pub const DEFAULT_EXCLUDED_DIRS: &[&str] =
    &[".git", ".vs", "bin", "obj", "Debug", "Release", "packages"];

/// Extensions included by the built-in rule set.
pub const DEFAULT_INCLUDED_EXTENSIONS: &[&str] = &[
    ".sln", ".csproj", ".vbproj", ".cs", ".html", ".cshtml", ".css", ".js",
];

/// Inclusion and exclusion rules for directories and files.
///
/// `Default` gives the built-in rule set; [`FilterConfig::empty`] gives one
/// that accepts everything. A scan takes its own clone, so mutating a config
/// never affects a scan already in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterConfig {
    pub(crate) excluded_dir_names: BTreeSet<String>,
    pub(crate) excluded_dir_patterns: PatternSet,
    /// Stored lowercased.
    pub(crate) excluded_file_names: BTreeSet<String>,
    pub(crate) excluded_file_patterns: PatternSet,
    pub(crate) included_extensions: BTreeSet<String>,
    pub(crate) included_file_patterns: PatternSet,
    pub(crate) min_size: u64,
    pub(crate) max_size: Option<u64>,
    pub(crate) min_created: Option<DateTime<Utc>>,
    pub(crate) max_created: Option<DateTime<Utc>>,
    pub(crate) min_modified: Option<DateTime<Utc>>,
    pub(crate) max_modified: Option<DateTime<Utc>>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        let mut config = Self::empty();
        config.reset_to_defaults();
        config
    }
}

impl FilterConfig {
    /// A rule set with no rules: nothing is excluded, every file is included.
    pub fn empty() -> Self {
        Self {
            excluded_dir_names: BTreeSet::new(),
            excluded_dir_patterns: PatternSet::new(),
            excluded_file_names: BTreeSet::new(),
            excluded_file_patterns: PatternSet::new(),
            included_extensions: BTreeSet::new(),
            included_file_patterns: PatternSet::new(),
            min_size: 0,
            max_size: None,
            min_created: None,
            max_created: None,
            min_modified: None,
            max_modified: None,
        }
    }

    /// Restore the built-in rule set.
    pub fn reset_to_defaults(&mut self) {
        *self = Self::empty();
        self.excluded_dir_names = DEFAULT_EXCLUDED_DIRS.iter().map(|s| s.to_string()).collect();
        self.included_extensions = DEFAULT_INCLUDED_EXTENSIONS
            .iter()
            .map(|s| s.to_string())
            .collect();
    }

    // ==================== Predicates ====================

    /// Check whether a directory with this name is hidden, along with its subtree.
    pub fn is_excluded_dir(&self, name: &str) -> bool {
        self.excluded_dir_names.contains(name) || self.excluded_dir_patterns.is_match(name)
    }

    /// Check whether a file passes every rule.
    ///
    /// Rules run in a fixed order and stop at the first rejection: excluded
    /// names and patterns, inclusion match, size, creation time, modification
    /// time.
    pub fn is_included_file(&self, path: &Path, metadata: &FileMetadata) -> bool {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();

        if self.excluded_file_names.contains(&name.to_lowercase())
            || self.excluded_file_patterns.is_match(&name)
        {
            return false;
        }

        if self.has_inclusion_rules() {
            let extension_match = extension_of(path)
                .is_some_and(|ext| self.included_extensions.contains(&ext));
            if !extension_match && !self.included_file_patterns.is_match(&name) {
                return false;
            }
        }

        if !within(metadata.size, Some(self.min_size), self.max_size) {
            return false;
        }

        if !within(metadata.created, self.min_created, self.max_created) {
            return false;
        }

        within(metadata.modified, self.min_modified, self.max_modified)
    }

    /// True when at least one extension or inclusion pattern is configured.
    pub fn has_inclusion_rules(&self) -> bool {
        !self.included_extensions.is_empty() || !self.included_file_patterns.is_empty()
    }

    /// True when a size or date rule is set, so file metadata must be read.
    pub fn needs_metadata(&self) -> bool {
        self.min_size > 0
            || self.max_size.is_some()
            || self.min_created.is_some()
            || self.max_created.is_some()
            || self.min_modified.is_some()
            || self.max_modified.is_some()
    }

    // ==================== Directory rules ====================

    pub fn add_excluded_dir(&mut self, name: &str) -> bool {
        let name = name.trim();
        !name.is_empty() && self.excluded_dir_names.insert(name.to_string())
    }

    pub fn remove_excluded_dir(&mut self, name: &str) -> bool {
        self.excluded_dir_names.remove(name)
    }

    pub fn add_excluded_dir_pattern(&mut self, pattern: &str) -> Result<bool, FilterError> {
        self.excluded_dir_patterns.insert(pattern)
    }

    pub fn remove_excluded_dir_pattern(&mut self, pattern: &str) -> bool {
        self.excluded_dir_patterns.remove(pattern)
    }

    // ==================== File rules ====================

    pub fn add_excluded_file(&mut self, name: &str) -> bool {
        let name = name.trim();
        !name.is_empty() && self.excluded_file_names.insert(name.to_lowercase())
    }

    pub fn remove_excluded_file(&mut self, name: &str) -> bool {
        self.excluded_file_names.remove(&name.to_lowercase())
    }

    pub fn add_excluded_file_pattern(&mut self, pattern: &str) -> Result<bool, FilterError> {
        self.excluded_file_patterns.insert(pattern)
    }

    pub fn remove_excluded_file_pattern(&mut self, pattern: &str) -> bool {
        self.excluded_file_patterns.remove(pattern)
    }

    /// Add an extension; a missing leading dot is added (`rs` becomes `.rs`).
    pub fn add_included_extension(&mut self, extension: &str) -> bool {
        match normalize_extension(extension) {
            Some(ext) => self.included_extensions.insert(ext),
            None => false,
        }
    }

    pub fn remove_included_extension(&mut self, extension: &str) -> bool {
        normalize_extension(extension).is_some_and(|ext| self.included_extensions.remove(&ext))
    }

    pub fn add_included_file_pattern(&mut self, pattern: &str) -> Result<bool, FilterError> {
        self.included_file_patterns.insert(pattern)
    }

    pub fn remove_included_file_pattern(&mut self, pattern: &str) -> bool {
        self.included_file_patterns.remove(pattern)
    }

    // ==================== Bounds ====================

    /// Set inclusive size bounds in bytes; `None` leaves the upper bound open.
    pub fn set_size_filters(&mut self, min: u64, max: Option<u64>) -> Result<(), FilterError> {
        if max.is_some_and(|m| min > m) {
            return Err(FilterError::InvalidRange { what: "size" });
        }
        self.min_size = min;
        self.max_size = max;
        Ok(())
    }

    pub fn set_created_filters(
        &mut self,
        min: Option<DateTime<Utc>>,
        max: Option<DateTime<Utc>>,
    ) -> Result<(), FilterError> {
        check_range(min, max, "creation date")?;
        self.min_created = min;
        self.max_created = max;
        Ok(())
    }

    pub fn set_modified_filters(
        &mut self,
        min: Option<DateTime<Utc>>,
        max: Option<DateTime<Utc>>,
    ) -> Result<(), FilterError> {
        check_range(min, max, "modification date")?;
        self.min_modified = min;
        self.max_modified = max;
        Ok(())
    }

    // ==================== Accessors ====================

    pub fn excluded_dirs(&self) -> &BTreeSet<String> {
        &self.excluded_dir_names
    }

    pub fn excluded_dir_patterns(&self) -> &PatternSet {
        &self.excluded_dir_patterns
    }

    pub fn excluded_files(&self) -> &BTreeSet<String> {
        &self.excluded_file_names
    }

    pub fn excluded_file_patterns(&self) -> &PatternSet {
        &self.excluded_file_patterns
    }

    pub fn included_extensions(&self) -> &BTreeSet<String> {
        &self.included_extensions
    }

    pub fn included_file_patterns(&self) -> &PatternSet {
        &self.included_file_patterns
    }

    pub fn size_bounds(&self) -> (u64, Option<u64>) {
        (self.min_size, self.max_size)
    }

    pub fn created_bounds(&self) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
        (self.min_created, self.max_created)
    }

    pub fn modified_bounds(&self) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
        (self.min_modified, self.max_modified)
    }
}

/// Extension of a path with its leading dot, e.g. `.rs`.
pub fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
}

fn normalize_extension(extension: &str) -> Option<String> {
    let ext = extension.trim().trim_start_matches('.');
    if ext.is_empty() {
        None
    } else {
        Some(format!(".{}", ext))
    }
}

/// Inclusive bound check; an unknown value passes.
fn within<T: PartialOrd>(value: Option<T>, min: Option<T>, max: Option<T>) -> bool {
    let Some(value) = value else {
        return true;
    };
    min.is_none_or(|m| value >= m) && max.is_none_or(|m| value <= m)
}

fn check_range<T: PartialOrd>(
    min: Option<T>,
    max: Option<T>,
    what: &'static str,
) -> Result<(), FilterError> {
    match (min, max) {
        (Some(lo), Some(hi)) if lo > hi => Err(FilterError::InvalidRange { what }),
        _ => Ok(()),
    }
}
