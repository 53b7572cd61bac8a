//! treescribe - filter a directory tree and export it as text, HTML, JSON or XML

pub mod error;
pub mod filter;
pub mod logging;
pub mod output;
pub mod settings;
pub mod tree;

#[cfg(feature = "test-utils")]
pub mod test_utils;

pub use error::{ExportError, FilterError, SettingsError};
pub use filter::{FileMetadata, FilterConfig};
pub use output::{ExportFormat, ExportOptions, ExportReport, Exporter, TextSkin};
pub use settings::{PresetStore, Settings};
pub use tree::{
    BackgroundScanner, CancellationToken, ScanEvent, ScanOptions, ScanOutcome, TreeNode,
    TreeWalker,
};
