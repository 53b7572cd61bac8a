//! Regular-expression rule sets

use std::collections::BTreeSet;

use regex::Regex;

use crate::error::FilterError;

/// A set of regular expressions keyed by their source text.
///
/// Matching uses search semantics: a pattern matches if it is found anywhere
/// in the name. Sources that fail to compile can only enter the set through
/// [`PatternSet::insert_lenient`]; they are kept for persistence but never match.
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    sources: BTreeSet<String>,
    compiled: Vec<Regex>,
}

impl PatternSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile and add a pattern. Returns `Ok(false)` if it was already present.
    pub fn insert(&mut self, pattern: &str) -> Result<bool, FilterError> {
        let regex = Regex::new(pattern).map_err(|source| FilterError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        if !self.sources.insert(pattern.to_string()) {
            return Ok(false);
        }
        self.compiled.push(regex);
        Ok(true)
    }

    /// Add a pattern read from a stored document without rejecting it.
    pub(crate) fn insert_lenient(&mut self, pattern: String) {
        if self.sources.contains(&pattern) {
            return;
        }
        match Regex::new(&pattern) {
            Ok(regex) => self.compiled.push(regex),
            Err(e) => tracing::warn!("ignoring invalid stored pattern '{}': {}", pattern, e),
        }
        self.sources.insert(pattern);
    }

    pub fn remove(&mut self, pattern: &str) -> bool {
        if !self.sources.remove(pattern) {
            return false;
        }
        self.compiled = self
            .sources
            .iter()
            .filter_map(|p| Regex::new(p).ok())
            .collect();
        true
    }

    pub fn is_match(&self, name: &str) -> bool {
        self.compiled.iter().any(|r| r.is_match(name))
    }

    pub fn contains(&self, pattern: &str) -> bool {
        self.sources.contains(pattern)
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Pattern sources in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.sources.iter().map(String::as_str)
    }
}

impl PartialEq for PatternSet {
    fn eq(&self, other: &Self) -> bool {
        self.sources == other.sources
    }
}

impl Eq for PatternSet {}
