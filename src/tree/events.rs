//! Events emitted by a background scan

use std::fmt;
use std::path::{Path, PathBuf};

/// Phase of a background scan, with a short label for status displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanPhase {
    Counting,
    Scanning,
    Cancelled,
    Completed,
    Failed(String),
}

impl fmt::Display for ScanPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanPhase::Counting => f.write_str("counting"),
            ScanPhase::Scanning => f.write_str("scanning"),
            ScanPhase::Cancelled => f.write_str("cancelled"),
            ScanPhase::Completed => f.write_str("completed"),
            ScanPhase::Failed(message) => f.write_str(message),
        }
    }
}

/// Percentage progress; never decreases within one scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanProgress {
    pub percent: u8,
    pub phase: ScanPhase,
}

/// One visible child of a scanned directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanEntry {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
    Progress(ScanProgress),
    Status(ScanPhase),
    /// The immediate visible children of `path`. Sent before any event for
    /// a directory below it.
    DirectoryScanned {
        path: PathBuf,
        children: Vec<ScanEntry>,
    },
    /// `path` could not be read; the rest of the scan continues.
    DirectoryError {
        path: PathBuf,
        message: String,
    },
    Completed,
    Cancelled,
    Failed(String),
}

impl ScanEvent {
    /// Terminal events are always the last event of a scan.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ScanEvent::Completed | ScanEvent::Cancelled | ScanEvent::Failed(_)
        )
    }

    /// The directory this event describes, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            ScanEvent::DirectoryScanned { path, .. } | ScanEvent::DirectoryError { path, .. } => {
                Some(path)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_labels() {
        assert_eq!(ScanPhase::Counting.to_string(), "counting");
        assert_eq!(ScanPhase::Completed.to_string(), "completed");
        assert_eq!(ScanPhase::Failed("boom".into()).to_string(), "boom");
    }

    #[test]
    fn test_terminal_events() {
        assert!(ScanEvent::Completed.is_terminal());
        assert!(ScanEvent::Cancelled.is_terminal());
        assert!(ScanEvent::Failed("x".into()).is_terminal());
        assert!(!ScanEvent::Status(ScanPhase::Scanning).is_terminal());
    }
}
