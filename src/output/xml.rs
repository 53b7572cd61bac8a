//! XML output formatting

use std::fmt::Write as _;

use crate::tree::TreeNode;

use super::utils::escape_xml;

/// Render a tree as XML: two-space indentation, no declaration, empty
/// directories self-closed.
pub fn to_xml(root: &TreeNode) -> String {
    let mut out = String::new();
    push_element(root, 0, &mut out);
    out
}

fn push_element(node: &TreeNode, level: usize, out: &mut String) {
    let pad = "  ".repeat(level);
    match node {
        TreeNode::Directory { name, children, .. } if children.is_empty() => {
            let _ = writeln!(out, "{}<directory name=\"{}\"/>", pad, escape_xml(name));
        }
        TreeNode::Directory { name, children, .. } => {
            let _ = writeln!(out, "{}<directory name=\"{}\">", pad, escape_xml(name));
            for child in children {
                push_element(child, level + 1, out);
            }
            let _ = writeln!(out, "{}</directory>", pad);
        }
        TreeNode::File {
            name, extension, ..
        } => {
            let _ = writeln!(
                out,
                "{}<file name=\"{}\" extension=\"{}\"/>",
                pad,
                escape_xml(name),
                escape_xml(extension)
            );
        }
        TreeNode::AccessDenied { .. } => {
            let _ = writeln!(out, "{}<access-denied/>", pad);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_layout() {
        let tree = TreeNode::Directory {
            name: "R&D".to_string(),
            path: PathBuf::new(),
            children: vec![
                TreeNode::Directory {
                    name: "empty".to_string(),
                    path: PathBuf::new(),
                    children: vec![],
                },
                TreeNode::File {
                    name: "\"q\".js".to_string(),
                    path: PathBuf::new(),
                    extension: ".js".to_string(),
                },
            ],
        };
        let expected = "\
<directory name=\"R&amp;D\">
  <directory name=\"empty\"/>
  <file name=\"&quot;q&quot;.js\" extension=\".js\"/>
</directory>
";
        assert_eq!(to_xml(&tree), expected);
    }

    #[test]
    fn test_access_denied_element() {
        let tree = TreeNode::Directory {
            name: "locked".to_string(),
            path: PathBuf::new(),
            children: vec![TreeNode::AccessDenied {
                path: PathBuf::new(),
            }],
        };
        assert_eq!(
            to_xml(&tree),
            "<directory name=\"locked\">\n  <access-denied/>\n</directory>\n"
        );
    }
}
