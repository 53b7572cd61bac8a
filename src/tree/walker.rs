//! TreeWalker - builds the full filtered tree in memory

use std::path::Path;

use crate::filter::{FilterConfig, extension_of};

use super::config::ScanOptions;
use super::node::TreeNode;
use super::traversal::{Traversal, root_name};

/// Synchronous walker used by every export format.
pub struct TreeWalker {
    traversal: Traversal,
}

impl TreeWalker {
    pub fn new(filter: FilterConfig, options: ScanOptions) -> Self {
        Self {
            traversal: Traversal::new(filter, options),
        }
    }

    pub fn options(&self) -> &ScanOptions {
        self.traversal.options()
    }

    /// Build the tree below `root`.
    ///
    /// Returns `None` when the root is not a readable directory or when its
    /// own name is excluded.
    pub fn build_tree(&self, root: &Path) -> Option<TreeNode> {
        if !root.is_dir() {
            tracing::debug!("{} is not a directory", root.display());
            return None;
        }

        let name = root_name(root);
        if !self.traversal.is_visible_dir(&name) {
            tracing::debug!("root {} is excluded", root.display());
            return None;
        }

        Some(self.walk_dir(root, name, 0))
    }

    fn walk_dir(&self, path: &Path, name: String, depth: usize) -> TreeNode {
        // If at max depth, return the directory but don't descend
        if self.traversal.at_max_depth(depth) {
            return TreeNode::Directory {
                name,
                path: path.to_path_buf(),
                children: Vec::new(),
            };
        }

        let children = match self.traversal.read_entries(path) {
            Ok(entries) => entries
                .into_iter()
                .map(|entry| {
                    if entry.is_dir {
                        self.walk_dir(&entry.path, entry.name, depth + 1)
                    } else {
                        TreeNode::File {
                            extension: extension_of(&entry.path).unwrap_or_default(),
                            name: entry.name,
                            path: entry.path,
                        }
                    }
                })
                .collect(),
            Err(e) => {
                tracing::warn!("cannot read {}: {}", path.display(), e);
                vec![TreeNode::AccessDenied {
                    path: path.to_path_buf(),
                }]
            }
        };

        TreeNode::Directory {
            name,
            path: path.to_path_buf(),
            children,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn child_names(node: &TreeNode) -> Vec<&str> {
        node.children().iter().map(TreeNode::name).collect()
    }

    #[test]
    fn test_default_filters_hide_git_and_other_files() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("proj");
        fs::create_dir_all(root.join(".git")).unwrap();
        fs::create_dir_all(root.join("src")).unwrap();
        fs::write(root.join("src/a.py"), "").unwrap();
        fs::write(root.join("src/b.txt"), "").unwrap();

        let tree = TreeWalker::new(FilterConfig::default(), ScanOptions::default())
            .build_tree(&root)
            .unwrap();
        assert_eq!(tree.name(), "proj");
        assert_eq!(child_names(&tree), vec!["src"]);
        assert!(tree.children()[0].children().is_empty());
    }

    #[test]
    fn test_max_depth_keeps_directories_without_children() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("a/b/c")).unwrap();
        fs::write(dir.path().join("a/top.txt"), "").unwrap();

        let walker = TreeWalker::new(
            FilterConfig::empty(),
            ScanOptions::default().with_max_depth(Some(1)),
        );
        let tree = walker.build_tree(dir.path()).unwrap();
        let a = &tree.children()[0];
        assert_eq!(a.name(), "a");
        assert!(a.children().is_empty());

        let walker = TreeWalker::new(
            FilterConfig::empty(),
            ScanOptions::default().with_max_depth(Some(0)),
        );
        assert!(walker.build_tree(dir.path()).unwrap().children().is_empty());
    }

    #[test]
    fn test_excluded_or_missing_root_is_none() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("bin");
        fs::create_dir(&root).unwrap();

        let walker = TreeWalker::new(FilterConfig::default(), ScanOptions::default());
        assert!(walker.build_tree(&root).is_none());
        assert!(walker.build_tree(&dir.path().join("missing")).is_none());

        let file = dir.path().join("file.cs");
        fs::write(&file, "").unwrap();
        assert!(walker.build_tree(&file).is_none());
    }

    #[test]
    fn test_unreadable_directory_becomes_marker() {
        let dir = TempDir::new().unwrap();
        let not_a_dir = dir.path().join("plain.cs");
        fs::write(&not_a_dir, "").unwrap();

        // read_dir fails on a regular file for every user, root included
        let walker = TreeWalker::new(FilterConfig::empty(), ScanOptions::default());
        let node = walker.walk_dir(&not_a_dir, "plain.cs".to_string(), 1);
        assert!(node.is_dir());
        assert_eq!(
            node.children(),
            &[TreeNode::AccessDenied {
                path: not_a_dir.clone()
            }]
        );
    }

    #[test]
    fn test_file_extension_recorded() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("Program.cs"), "").unwrap();
        fs::write(dir.path().join("Makefile"), "").unwrap();

        let tree = TreeWalker::new(FilterConfig::empty(), ScanOptions::default())
            .build_tree(dir.path())
            .unwrap();
        match &tree.children()[0] {
            TreeNode::File { extension, .. } => assert_eq!(extension, ""),
            other => panic!("expected file, got {:?}", other),
        }
        match &tree.children()[1] {
            TreeNode::File { extension, .. } => assert_eq!(extension, ".cs"),
            other => panic!("expected file, got {:?}", other),
        }
    }
}
