//! File metadata used by size and timestamp rules

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};

/// The subset of file metadata the filter looks at.
///
/// Each field is `None` when it could not be read; the rule that depends on it
/// then does not apply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileMetadata {
    pub size: Option<u64>,
    pub created: Option<DateTime<Utc>>,
    pub modified: Option<DateTime<Utc>>,
}

impl FileMetadata {
    /// Stat a path, following symlinks. Failures leave every field empty.
    pub fn read(path: &Path) -> Self {
        match fs::metadata(path) {
            Ok(meta) => Self::from(&meta),
            Err(_) => Self::default(),
        }
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_created(mut self, created: DateTime<Utc>) -> Self {
        self.created = Some(created);
        self
    }

    pub fn with_modified(mut self, modified: DateTime<Utc>) -> Self {
        self.modified = Some(modified);
        self
    }
}

impl From<&fs::Metadata> for FileMetadata {
    fn from(meta: &fs::Metadata) -> Self {
        Self {
            size: Some(meta.len()),
            created: meta.created().ok().map(DateTime::<Utc>::from),
            modified: meta.modified().ok().map(DateTime::<Utc>::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_missing_path_is_empty() {
        let meta = FileMetadata::read(Path::new("/definitely/not/here.txt"));
        assert_eq!(meta, FileMetadata::default());
    }

    #[test]
    fn test_read_real_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("five.txt");
        fs::write(&path, "12345").unwrap();

        let meta = FileMetadata::read(&path);
        assert_eq!(meta.size, Some(5));
        assert!(meta.modified.is_some());
    }
}
