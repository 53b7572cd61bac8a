//! Capped text preview streamed from the filesystem
//!
//! Produces the first lines a text export would contain without building the
//! whole tree. No directory is read once the cap is reached.

use std::path::Path;

use crate::tree::Traversal;

use super::config::TextSkin;
use super::text::{LineKind, TextLine};
use super::utils::continuation_prefix;

struct Preview<'a> {
    traversal: &'a Traversal,
    skin: TextSkin,
    max_items: usize,
    lines: Vec<TextLine>,
}

impl Preview<'_> {
    fn is_full(&self) -> bool {
        self.lines.len() >= self.max_items
    }

    fn walk(&mut self, dir: &Path, depth: usize, guide: &str) {
        if self.is_full() || self.traversal.at_max_depth(depth) {
            return;
        }

        let entries = match self.traversal.read_entries(dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("cannot read {}: {}", dir.display(), e);
                self.lines.push(TextLine::entry(
                    self.skin,
                    depth + 1,
                    LineKind::AccessDenied,
                    "",
                    guide,
                    true,
                ));
                return;
            }
        };

        let count = entries.len();
        for (i, entry) in entries.into_iter().enumerate() {
            if self.is_full() {
                return;
            }
            let is_last = i + 1 == count;
            let kind = if entry.is_dir {
                LineKind::Directory
            } else {
                LineKind::File
            };
            self.lines.push(TextLine::entry(
                self.skin,
                depth + 1,
                kind,
                &entry.name,
                guide,
                is_last,
            ));
            if entry.is_dir {
                let child_guide = continuation_prefix(guide, is_last);
                self.walk(&entry.path, depth + 1, &child_guide);
            }
        }
    }
}

/// First `max_items` lines of the text rendering of `root`, whose display
/// name is `name`. The caller checks that the root is a visible directory.
pub fn preview_lines(
    traversal: &Traversal,
    root: &Path,
    name: &str,
    skin: TextSkin,
    max_items: usize,
) -> Vec<TextLine> {
    if max_items == 0 {
        return Vec::new();
    }

    let mut preview = Preview {
        traversal,
        skin,
        max_items,
        lines: vec![TextLine::root(skin, name)],
    };
    preview.walk(root, 0, "");
    preview.lines
}
