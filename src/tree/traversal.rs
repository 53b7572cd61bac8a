//! Common traversal logic shared by TreeWalker, BackgroundScanner and the preview.
//!
//! A directory is read once, its entries classified and filtered, then sorted
//! directories first and by case-insensitive name. Every caller walks the
//! same visible structure.

use std::cmp::Ordering;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::filter::{FileMetadata, FilterConfig};

use super::cancel::CancellationToken;
use super::config::ScanOptions;

/// A visible child of a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
}

/// Filter snapshot plus options for one scan.
#[derive(Debug, Clone)]
pub struct Traversal {
    filter: FilterConfig,
    options: ScanOptions,
}

impl Traversal {
    pub fn new(filter: FilterConfig, options: ScanOptions) -> Self {
        Self { filter, options }
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    pub fn filter(&self) -> &FilterConfig {
        &self.filter
    }

    pub fn at_max_depth(&self, depth: usize) -> bool {
        self.options.at_max_depth(depth)
    }

    /// Check if a directory with this name is listed and descended into
    pub fn is_visible_dir(&self, name: &str) -> bool {
        !self.options.apply_filters || !self.filter.is_excluded_dir(name)
    }

    /// Check if a file is listed. The file is only stat'd when a size or
    /// date rule is set.
    pub fn is_visible_file(&self, path: &Path) -> bool {
        if !self.options.include_files {
            return false;
        }
        if !self.options.apply_filters {
            return true;
        }
        let metadata = if self.filter.needs_metadata() {
            FileMetadata::read(path)
        } else {
            FileMetadata::default()
        };
        self.filter.is_included_file(path, &metadata)
    }

    /// Read the visible children of `dir`, sorted.
    pub fn read_entries(&self, dir: &Path) -> io::Result<Vec<Entry>> {
        self.read_entries_inner(dir, None)
            .map(|entries| entries.unwrap_or_default())
    }

    /// Like [`read_entries`](Self::read_entries) but stops between entries once
    /// `cancel` is set, returning `Ok(None)`.
    pub fn read_entries_with(
        &self,
        dir: &Path,
        cancel: &CancellationToken,
    ) -> io::Result<Option<Vec<Entry>>> {
        self.read_entries_inner(dir, Some(cancel))
    }

    fn read_entries_inner(
        &self,
        dir: &Path,
        cancel: Option<&CancellationToken>,
    ) -> io::Result<Option<Vec<Entry>>> {
        let mut entries = Vec::new();

        for entry in fs::read_dir(dir)? {
            if cancel.is_some_and(CancellationToken::is_cancelled) {
                return Ok(None);
            }

            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    tracing::debug!("skipping unreadable entry in {}: {}", dir.display(), e);
                    continue;
                }
            };

            // file_type() does not follow symlinks, so a link to a directory
            // is listed as a file and never descended into.
            let is_dir = match entry.file_type() {
                Ok(ft) => ft.is_dir(),
                Err(e) => {
                    tracing::debug!("skipping {}: {}", entry.path().display(), e);
                    continue;
                }
            };

            let name = entry.file_name().to_string_lossy().into_owned();
            let path = entry.path();

            let visible = if is_dir {
                self.is_visible_dir(&name)
            } else {
                self.is_visible_file(&path)
            };

            if visible {
                entries.push(Entry { name, path, is_dir });
            }
        }

        entries.sort_by(compare_entries);
        Ok(Some(entries))
    }
}

/// Directories first, then case-insensitive name, then exact name.
fn compare_entries(a: &Entry, b: &Entry) -> Ordering {
    b.is_dir
        .cmp(&a.is_dir)
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        .then_with(|| a.name.cmp(&b.name))
}

/// Display name of a scan root, falling back to the canonical path's last
/// component and finally to the path as given (`/`, `.`).
pub fn root_name(path: &Path) -> String {
    if let Some(name) = path.file_name() {
        return name.to_string_lossy().into_owned();
    }
    fs::canonicalize(path)
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| path.display().to_string())
}
