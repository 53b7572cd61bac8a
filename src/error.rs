//! Error types shared across the crate

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised when mutating a filter configuration.
///
/// Evaluation never fails: these only surface at the point a rule is added.
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid {what} range: lower bound is greater than upper bound")]
    InvalidRange { what: &'static str },
}

/// Errors raised while building, rendering or writing an export.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error for path {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cannot access '{0}': no such directory")]
    RootNotFound(PathBuf),

    #[error("'{0}' is excluded by the current filters")]
    Excluded(PathBuf),
}

/// Errors raised while reading or writing a settings document.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("I/O error for path {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed settings document {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("preset '{0}' not found")]
    UnknownPreset(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_pattern_message_names_pattern() {
        let source = regex::Regex::new("(").unwrap_err();
        let err = FilterError::InvalidPattern {
            pattern: "(".to_string(),
            source,
        };
        assert!(err.to_string().starts_with("invalid pattern '('"));
    }

    #[test]
    fn test_root_not_found_message() {
        let err = ExportError::RootNotFound(PathBuf::from("/nope"));
        assert_eq!(err.to_string(), "cannot access '/nope': no such directory");
    }
}
