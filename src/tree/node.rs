//! The filtered tree produced by a synchronous scan

use std::path::{Path, PathBuf};

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

/// Display name of the synthetic node standing in for an unreadable directory.
pub const ACCESS_DENIED_LABEL: &str = "[access denied]";

/// A node of the filtered tree.
///
/// Children are ordered directories first, then by case-insensitive name.
/// Serializes to `{"name", "type": "directory", "children"}` and
/// `{"name", "type": "file", "extension"}`; absolute paths are not serialized.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TreeNode {
    Directory {
        name: String,
        #[serde(skip)]
        path: PathBuf,
        #[serde(default)]
        children: Vec<TreeNode>,
    },
    File {
        name: String,
        #[serde(skip)]
        path: PathBuf,
        #[serde(default)]
        extension: String,
    },
    /// Replaces the children of a directory that could not be read.
    #[serde(rename = "access-denied")]
    AccessDenied {
        #[serde(skip)]
        path: PathBuf,
    },
}

impl TreeNode {
    pub fn name(&self) -> &str {
        match self {
            TreeNode::Directory { name, .. } | TreeNode::File { name, .. } => name,
            TreeNode::AccessDenied { .. } => ACCESS_DENIED_LABEL,
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            TreeNode::Directory { path, .. }
            | TreeNode::File { path, .. }
            | TreeNode::AccessDenied { path } => path,
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, TreeNode::Directory { .. })
    }

    pub fn children(&self) -> &[TreeNode] {
        match self {
            TreeNode::Directory { children, .. } => children,
            _ => &[],
        }
    }

    /// Count directories and files below this node (the node itself excluded).
    pub fn counts(&self) -> (usize, usize) {
        self.children()
            .iter()
            .fold((0, 0), |(dirs, files), child| match child {
                TreeNode::Directory { .. } => {
                    let (d, f) = child.counts();
                    (dirs + 1 + d, files + f)
                }
                TreeNode::File { .. } => (dirs, files + 1),
                TreeNode::AccessDenied { .. } => (dirs, files),
            })
    }

    /// Pre-order list of `(depth, node)` pairs, starting with this node at depth 0.
    pub fn flatten(&self) -> Vec<(usize, &TreeNode)> {
        let mut out = Vec::new();
        self.flatten_into(0, &mut out);
        out
    }

    fn flatten_into<'a>(&'a self, depth: usize, out: &mut Vec<(usize, &'a TreeNode)>) {
        out.push((depth, self));
        for child in self.children() {
            child.flatten_into(depth + 1, out);
        }
    }
}

impl Serialize for TreeNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TreeNode::Directory { name, children, .. } => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("name", name)?;
                map.serialize_entry("type", "directory")?;
                map.serialize_entry("children", children)?;
                map.end()
            }
            TreeNode::File {
                name, extension, ..
            } => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("name", name)?;
                map.serialize_entry("type", "file")?;
                map.serialize_entry("extension", extension)?;
                map.end()
            }
            TreeNode::AccessDenied { .. } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("name", ACCESS_DENIED_LABEL)?;
                map.serialize_entry("type", "access-denied")?;
                map.end()
            }
        }
    }
}
