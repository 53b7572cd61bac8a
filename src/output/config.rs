//! Output configuration types

use std::fmt;

use crate::tree::ScanOptions;

/// Document format of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Text,
    Html,
    Json,
    Xml,
}

impl ExportFormat {
    /// File extension written for this format, with its dot.
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Text => ".txt",
            ExportFormat::Html => ".html",
            ExportFormat::Json => ".json",
            ExportFormat::Xml => ".xml",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ExportFormat::Text => "TXT",
            ExportFormat::Html => "HTML",
            ExportFormat::Json => "JSON",
            ExportFormat::Xml => "XML",
        };
        f.write_str(label)
    }
}

/// Indentation style of text output. Also decorates HTML entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextSkin {
    /// Four spaces per level.
    #[default]
    Plain,
    Dashed,
    Bullets,
    Icons,
    Arrows,
    /// Box-drawing guides like `tree(1)`.
    Tree,
}

/// Configuration for one export or preview.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportOptions {
    pub format: ExportFormat,
    pub skin: TextSkin,
    pub scan: ScanOptions,
}

impl ExportOptions {
    pub fn new(format: ExportFormat, skin: TextSkin) -> Self {
        Self {
            format,
            skin,
            scan: ScanOptions::default(),
        }
    }

    pub fn with_scan(mut self, scan: ScanOptions) -> Self {
        self.scan = scan;
        self
    }
}
