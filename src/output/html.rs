//! HTML document output

use std::fmt::Write as _;

use crate::tree::TreeNode;

use super::config::TextSkin;
use super::text::{LineKind, TextFormatter, TextLine, label};
use super::utils::{INDENT, escape_html};

const STYLE: &str = "\
        body { font-family: Arial, sans-serif; margin: 20px; }
        .directory { color: #0066cc; font-weight: bold; }
        .file { color: #333; }
        .denied { color: #cc0000; font-style: italic; }
        ul { list-style-type: none; }
        li { margin: 5px 0; }
        .tree-line { font-family: monospace; white-space: pre; }
";

/// Formatter for standalone HTML documents.
///
/// The tree skin renders one `tree-line` block per text line; every other
/// skin renders nested lists with the skin's marker in front of each name.
pub struct HtmlFormatter {
    skin: TextSkin,
}

impl HtmlFormatter {
    pub fn new(skin: TextSkin) -> Self {
        Self { skin }
    }

    pub fn format(&self, root: &TreeNode) -> String {
        let title = escape_html(root.name());
        let mut out = String::new();

        out.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
        out.push_str("    <meta charset=\"UTF-8\">\n");
        let _ = writeln!(out, "    <title>Directory structure: {}</title>", title);
        out.push_str("    <style>\n");
        out.push_str(STYLE);
        out.push_str("    </style>\n</head>\n<body>\n");
        let _ = writeln!(out, "    <h1>Directory structure: {}</h1>", title);

        if self.skin == TextSkin::Tree {
            out.push_str("    <div id=\"root\">\n");
            for line in TextFormatter::new(self.skin).lines(root) {
                let _ = writeln!(
                    out,
                    "        <div class=\"tree-line\">{}</div>",
                    escape_html(&line.to_string())
                );
            }
            out.push_str("    </div>\n");
        } else {
            out.push_str("    <ul id=\"root\">\n");
            self.push_item(root, 0, 2, &mut out);
            out.push_str("    </ul>\n");
        }

        out.push_str("</body>\n</html>\n");
        out
    }

    fn push_item(&self, node: &TreeNode, depth: usize, level: usize, out: &mut String) {
        let pad = INDENT.repeat(level);
        let kind = LineKind::of(node);
        let text = if depth == 0 {
            TextLine::root(self.skin, node.name()).to_string()
        } else {
            format!("{}{}", self.skin.marker(kind), label(kind, node.name()))
        };
        let class = match kind {
            LineKind::Directory => "directory",
            LineKind::File => "file",
            LineKind::AccessDenied => "denied",
        };
        let span = format!("<span class=\"{}\">{}</span>", class, escape_html(&text));

        let children = node.children();
        if children.is_empty() {
            let _ = writeln!(out, "{}<li>{}</li>", pad, span);
            return;
        }

        let _ = writeln!(out, "{}<li>{}", pad, span);
        let _ = writeln!(out, "{}{}<ul>", pad, INDENT);
        for child in children {
            self.push_item(child, depth + 1, level + 2, out);
        }
        let _ = writeln!(out, "{}{}</ul>", pad, INDENT);
        let _ = writeln!(out, "{}</li>", pad);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn sample() -> TreeNode {
        TreeNode::Directory {
            name: "site".to_string(),
            path: PathBuf::new(),
            children: vec![
                TreeNode::Directory {
                    name: "css".to_string(),
                    path: PathBuf::new(),
                    children: vec![],
                },
                TreeNode::File {
                    name: "<index>.html".to_string(),
                    path: PathBuf::new(),
                    extension: ".html".to_string(),
                },
            ],
        }
    }

    #[test]
    fn test_nested_lists() {
        let html = HtmlFormatter::new(TextSkin::Plain).format(&sample());
        assert!(html.starts_with("<!DOCTYPE html>\n"));
        assert!(html.contains("<meta charset=\"UTF-8\">"));
        assert!(html.contains("<title>Directory structure: site</title>"));
        assert!(html.contains("<h1>Directory structure: site</h1>"));
        assert!(html.contains("        <li><span class=\"directory\">site/</span>\n            <ul>\n"));
        assert!(html.contains("<li><span class=\"directory\">css/</span></li>"));
        assert!(html.contains("<li><span class=\"file\">&lt;index&gt;.html</span></li>"));
        assert!(!html.contains("<index>"));
    }

    #[test]
    fn test_markers_in_spans() {
        let html = HtmlFormatter::new(TextSkin::Arrows).format(&sample());
        assert!(html.contains("<span class=\"directory\">▸ css/</span>"));
        assert!(html.contains("<span class=\"file\">→ &lt;index&gt;.html</span>"));
    }

    #[test]
    fn test_tree_skin_lines() {
        let html = HtmlFormatter::new(TextSkin::Tree).format(&sample());
        assert!(html.contains("<div class=\"tree-line\">site/</div>"));
        assert!(html.contains("<div class=\"tree-line\">├── css/</div>"));
        assert!(html.contains("<div class=\"tree-line\">└── &lt;index&gt;.html</div>"));
        assert!(!html.contains("<ul"));
    }
}
