//! Tree rendering and export
//!
//! Every format renders one `TreeNode` built by the shared traversal:
//! - `text` - indented text in one of six skins
//! - `html` - standalone HTML document
//! - `json` - nested objects, four-space indentation
//! - `xml` - nested elements, two-space indentation
//!
//! `export` ties scanning, rendering and writing together; `preview` produces
//! the first lines of a text export without building the whole tree.

mod config;
mod export;
mod html;
mod json;
mod preview;
mod text;
mod utils;
mod xml;

pub use config::{ExportFormat, ExportOptions, TextSkin};
pub use export::{ExportReport, Exporter, with_format_extension};
pub use html::HtmlFormatter;
pub use json::{parse_json, to_json, to_pretty_json, write_pretty_json};
pub use text::{LineKind, TextFormatter, TextLine, print_lines};
pub use utils::{continuation_prefix, escape_html, escape_xml};
pub use xml::to_xml;

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::filter::FilterConfig;
    use crate::tree::{ScanOptions, TreeNode};

    fn visible_names(node: &TreeNode, out: &mut BTreeSet<String>) {
        out.insert(node.name().to_string());
        for child in node.children() {
            visible_names(child, out);
        }
    }

    #[test]
    fn test_every_format_shows_the_same_nodes() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("app");
        fs::create_dir_all(root.join("Controllers")).unwrap();
        fs::create_dir_all(root.join("bin/Debug")).unwrap();
        fs::write(root.join("Controllers/Home.cs"), "class Home {}").unwrap();
        fs::write(root.join("site.css"), "body {}").unwrap();
        fs::write(root.join("notes.md"), "# notes").unwrap();

        let exporter = Exporter::new(FilterConfig::default());
        let tree = exporter.build_tree(&root, &ScanOptions::default()).unwrap();
        let mut expected = BTreeSet::new();
        visible_names(&tree, &mut expected);
        assert_eq!(
            expected,
            ["app", "Controllers", "Home.cs", "site.css"]
                .iter()
                .map(|s| s.to_string())
                .collect()
        );

        for format in [
            ExportFormat::Text,
            ExportFormat::Html,
            ExportFormat::Json,
            ExportFormat::Xml,
        ] {
            let options = ExportOptions::new(format, TextSkin::Tree);
            let doc = exporter.render_path(&root, &options).unwrap();
            for name in &expected {
                assert!(doc.contains(name.as_str()), "{format} lacks {name}");
            }
            assert!(!doc.contains("notes.md"), "{format} shows notes.md");
            assert!(!doc.contains("Debug"), "{format} shows bin/Debug");
        }
    }
}
