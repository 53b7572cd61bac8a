//! Batch export: scan, render and write in one call

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::ExportError;
use crate::filter::FilterConfig;
use crate::tree::{ScanOptions, Traversal, TreeNode, TreeWalker, root_name};

use super::config::{ExportFormat, ExportOptions};
use super::html::HtmlFormatter;
use super::json::to_json;
use super::preview::preview_lines;
use super::text::{TextFormatter, TextLine};
use super::xml::to_xml;

/// Result of [`Exporter::export`], ready to show to a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub success: bool,
    pub message: String,
    /// Where the document was (or would have been) written, after
    /// extension correction.
    pub path: PathBuf,
}

/// Replace the extension of `path` unless it already matches `format`
/// (case-insensitively).
pub fn with_format_extension(path: &Path, format: ExportFormat) -> PathBuf {
    let wanted = &format.extension()[1..];
    let matches = path
        .extension()
        .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case(wanted));
    if matches {
        path.to_path_buf()
    } else {
        path.with_extension(wanted)
    }
}

/// Exports directory trees using one filter configuration.
#[derive(Debug, Clone, Default)]
pub struct Exporter {
    filter: FilterConfig,
}

impl Exporter {
    pub fn new(filter: FilterConfig) -> Self {
        Self { filter }
    }

    pub fn filter(&self) -> &FilterConfig {
        &self.filter
    }

    /// Check that `root` is a directory the scan would list.
    fn check_root(&self, root: &Path, scan: &ScanOptions) -> Result<String, ExportError> {
        if !root.is_dir() {
            return Err(ExportError::RootNotFound(root.to_path_buf()));
        }
        let name = root_name(root);
        if scan.apply_filters && self.filter.is_excluded_dir(&name) {
            return Err(ExportError::Excluded(root.to_path_buf()));
        }
        Ok(name)
    }

    pub fn build_tree(&self, root: &Path, scan: &ScanOptions) -> Result<TreeNode, ExportError> {
        self.check_root(root, scan)?;
        TreeWalker::new(self.filter.clone(), *scan)
            .build_tree(root)
            .ok_or_else(|| ExportError::Excluded(root.to_path_buf()))
    }

    /// Render an already built tree.
    pub fn render(tree: &TreeNode, options: &ExportOptions) -> Result<String, ExportError> {
        let document = match options.format {
            ExportFormat::Text => TextFormatter::new(options.skin).format(tree),
            ExportFormat::Html => HtmlFormatter::new(options.skin).format(tree),
            ExportFormat::Json => to_json(tree)?,
            ExportFormat::Xml => to_xml(tree),
        };
        Ok(document)
    }

    pub fn render_path(&self, root: &Path, options: &ExportOptions) -> Result<String, ExportError> {
        let tree = self.build_tree(root, &options.scan)?;
        Self::render(&tree, options)
    }

    /// Scan `root` and write the rendered document. Returns the path written,
    /// whose extension is corrected to match the format.
    pub fn export_to(
        &self,
        root: &Path,
        output: &Path,
        options: &ExportOptions,
    ) -> Result<PathBuf, ExportError> {
        let path = with_format_extension(output, options.format);
        let document = self.render_path(root, options)?;

        let io_err = |source: std::io::Error| ExportError::Io {
            path: path.clone(),
            source,
        };
        let file = File::create(&path).map_err(io_err)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(document.as_bytes()).map_err(io_err)?;
        writer.flush().map_err(io_err)?;

        tracing::info!(
            "exported {} as {} to {}",
            root.display(),
            options.format,
            path.display()
        );
        Ok(path)
    }

    /// Like [`export_to`](Self::export_to), but reports the outcome instead of
    /// returning an error.
    pub fn export(&self, root: &Path, output: &Path, options: &ExportOptions) -> ExportReport {
        match self.export_to(root, output, options) {
            Ok(path) => ExportReport {
                success: true,
                message: format!(
                    "The structure was exported as {} to '{}'.",
                    options.format,
                    path.display()
                ),
                path,
            },
            Err(e) => {
                tracing::warn!("export failed: {}", e);
                ExportReport {
                    success: false,
                    message: format!("Error during {} export: {}", options.format, e),
                    path: with_format_extension(output, options.format),
                }
            }
        }
    }

    /// First `max_items` lines of the text export of `root`, read lazily.
    pub fn generate_preview(
        &self,
        root: &Path,
        max_items: usize,
        options: &ExportOptions,
    ) -> Result<Vec<TextLine>, ExportError> {
        let name = self.check_root(root, &options.scan)?;
        let traversal = Traversal::new(self.filter.clone(), options.scan);
        Ok(preview_lines(&traversal, root, &name, options.skin, max_items))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::TextSkin;
    use std::fs;
    use tempfile::TempDir;

    fn project() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("proj");
        fs::create_dir_all(root.join(".git")).unwrap();
        fs::create_dir_all(root.join("src")).unwrap();
        fs::write(root.join("src/a.py"), "print()").unwrap();
        fs::write(root.join("src/b.txt"), "text").unwrap();
        (dir, root)
    }

    #[test]
    fn test_default_text_export() {
        let (_dir, root) = project();
        let text = Exporter::default()
            .render_path(&root, &ExportOptions::default())
            .unwrap();
        assert_eq!(text, "proj/\n    src/\n");
    }

    #[test]
    fn test_extension_correction() {
        assert_eq!(
            with_format_extension(Path::new("out/tree.txt"), ExportFormat::Json),
            PathBuf::from("out/tree.json")
        );
        assert_eq!(
            with_format_extension(Path::new("tree.HTML"), ExportFormat::Html),
            PathBuf::from("tree.HTML")
        );
        assert_eq!(
            with_format_extension(Path::new("tree"), ExportFormat::Xml),
            PathBuf::from("tree.xml")
        );
    }

    #[test]
    fn test_export_writes_corrected_path() {
        let (dir, root) = project();
        let options = ExportOptions::new(ExportFormat::Json, TextSkin::Plain);
        let report = Exporter::new(FilterConfig::empty()).export(
            &root,
            &dir.path().join("tree.txt"),
            &options,
        );
        assert!(report.success, "{}", report.message);
        assert_eq!(report.path, dir.path().join("tree.json"));

        let written = fs::read_to_string(&report.path).unwrap();
        let tree = crate::output::parse_json(&written).unwrap();
        assert_eq!(tree.name(), "proj");
    }

    #[test]
    fn test_export_failures_are_reported() {
        let (dir, root) = project();
        let exporter = Exporter::default();

        let report = exporter.export(
            &dir.path().join("missing"),
            &dir.path().join("out.txt"),
            &ExportOptions::default(),
        );
        assert!(!report.success);
        assert!(report.message.contains("no such directory"));

        let report = exporter.export(
            &root,
            &dir.path().join("no/such/dir/out.txt"),
            &ExportOptions::default(),
        );
        assert!(!report.success);
    }

    #[test]
    fn test_excluded_root() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("obj");
        fs::create_dir(&root).unwrap();
        let exporter = Exporter::default();

        assert!(matches!(
            exporter.build_tree(&root, &ScanOptions::default()),
            Err(ExportError::Excluded(_))
        ));
        assert!(matches!(
            exporter.generate_preview(&root, 10, &ExportOptions::default()),
            Err(ExportError::Excluded(_))
        ));

        let unfiltered = ScanOptions {
            apply_filters: false,
            ..ScanOptions::default()
        };
        assert!(exporter.build_tree(&root, &unfiltered).is_ok());
    }

    #[test]
    fn test_preview_cap() {
        let (_dir, root) = project();
        let exporter = Exporter::new(FilterConfig::empty());
        let lines = exporter
            .generate_preview(&root, 2, &ExportOptions::default())
            .unwrap();
        let text: Vec<String> = lines.iter().map(ToString::to_string).collect();
        assert_eq!(text, vec!["proj/", "    .git/"]);
    }
}
