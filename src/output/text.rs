//! Indented text output
//!
//! `TextFormatter` turns a `TreeNode` into one `TextLine` per node. The preview
//! builds the same lines straight from the filesystem, so both share
//! [`TextLine::root`] and [`TextLine::entry`].

use std::fmt;
use std::io::{self, Write};

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::tree::{ACCESS_DENIED_LABEL, TreeNode};

use super::config::TextSkin;
use super::utils::{INDENT, connector, continuation_prefix};

/// What a line stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Directory,
    File,
    AccessDenied,
}

impl LineKind {
    pub fn of(node: &TreeNode) -> Self {
        match node {
            TreeNode::Directory { .. } => LineKind::Directory,
            TreeNode::File { .. } => LineKind::File,
            TreeNode::AccessDenied { .. } => LineKind::AccessDenied,
        }
    }
}

impl TextSkin {
    /// Marker placed before a name by the list-like skins.
    pub fn marker(self, kind: LineKind) -> &'static str {
        let is_dir = kind == LineKind::Directory;
        match self {
            TextSkin::Plain | TextSkin::Tree => "",
            TextSkin::Dashed => "- ",
            TextSkin::Bullets => "• ",
            TextSkin::Icons if is_dir => "📁 ",
            TextSkin::Icons => "📄 ",
            TextSkin::Arrows if is_dir => "▸ ",
            TextSkin::Arrows => "→ ",
        }
    }
}

/// One rendered line: decoration plus label, without the newline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLine {
    pub depth: usize,
    pub kind: LineKind,
    pub prefix: String,
    pub label: String,
}

impl TextLine {
    /// The line for the scan root.
    pub fn root(skin: TextSkin, name: &str) -> Self {
        let prefix = match skin {
            TextSkin::Icons => skin.marker(LineKind::Directory).to_string(),
            _ => String::new(),
        };
        Self {
            depth: 0,
            kind: LineKind::Directory,
            prefix,
            label: label(LineKind::Directory, name),
        }
    }

    /// The line for an entry at `depth >= 1`. `guide` is only used by the
    /// tree skin and holds the vertical guides of the ancestors.
    pub fn entry(
        skin: TextSkin,
        depth: usize,
        kind: LineKind,
        name: &str,
        guide: &str,
        is_last: bool,
    ) -> Self {
        let prefix = match skin {
            TextSkin::Plain => INDENT.repeat(depth),
            TextSkin::Tree => format!("{}{}", guide, connector(is_last)),
            _ => format!(
                "{}{}",
                INDENT.repeat(depth.saturating_sub(1)),
                skin.marker(kind)
            ),
        };
        Self {
            depth,
            kind,
            prefix,
            label: label(kind, name),
        }
    }
}

impl fmt::Display for TextLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.prefix, self.label)
    }
}

pub(crate) fn label(kind: LineKind, name: &str) -> String {
    match kind {
        LineKind::Directory => format!("{}/", name),
        LineKind::File => name.to_string(),
        LineKind::AccessDenied => ACCESS_DENIED_LABEL.to_string(),
    }
}

/// Formatter for text exports.
pub struct TextFormatter {
    skin: TextSkin,
}

impl TextFormatter {
    pub fn new(skin: TextSkin) -> Self {
        Self { skin }
    }

    pub fn lines(&self, root: &TreeNode) -> Vec<TextLine> {
        let mut lines = vec![TextLine::root(self.skin, root.name())];
        self.push_children(root, 1, "", &mut lines);
        lines
    }

    fn push_children(
        &self,
        node: &TreeNode,
        depth: usize,
        guide: &str,
        lines: &mut Vec<TextLine>,
    ) {
        let children = node.children();
        for (i, child) in children.iter().enumerate() {
            let is_last = i + 1 == children.len();
            lines.push(TextLine::entry(
                self.skin,
                depth,
                LineKind::of(child),
                child.name(),
                guide,
                is_last,
            ));
            if child.is_dir() {
                let child_guide = continuation_prefix(guide, is_last);
                self.push_children(child, depth + 1, &child_guide, lines);
            }
        }
    }

    /// Render the whole tree, one `\n`-terminated line per node.
    pub fn format(&self, root: &TreeNode) -> String {
        let mut output = String::new();
        for line in self.lines(root) {
            output.push_str(&line.prefix);
            output.push_str(&line.label);
            output.push('\n');
        }
        output
    }

    pub fn write<W: Write>(&self, root: &TreeNode, out: &mut W) -> io::Result<()> {
        for line in self.lines(root) {
            writeln!(out, "{}", line)?;
        }
        Ok(())
    }
}

/// Print lines to stdout, colouring directory and access-denied labels.
pub fn print_lines(lines: &[TextLine], use_color: bool) -> io::Result<()> {
    let choice = if use_color {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    let mut stdout = StandardStream::stdout(choice);

    for line in lines {
        write!(stdout, "{}", line.prefix)?;
        match line.kind {
            LineKind::Directory => {
                stdout.set_color(ColorSpec::new().set_fg(Some(Color::Blue)).set_bold(true))?;
            }
            LineKind::AccessDenied => {
                stdout.set_color(ColorSpec::new().set_fg(Some(Color::Red)))?;
            }
            LineKind::File => {}
        }
        write!(stdout, "{}", line.label)?;
        stdout.reset()?;
        writeln!(stdout)?;
    }
    Ok(())
}
