//! JSON output formatting

use std::io::Write;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::tree::TreeNode;

const INDENT: &[u8] = b"    ";

/// Serialize with four-space indentation, the layout of every JSON file
/// this crate writes.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    write_pretty_json(value, &mut buf)?;
    // serde_json only emits valid UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

pub fn write_pretty_json<T, W>(value: &T, writer: W) -> Result<(), serde_json::Error>
where
    T: Serialize + ?Sized,
    W: Write,
{
    let mut ser = Serializer::with_formatter(writer, PrettyFormatter::with_indent(INDENT));
    value.serialize(&mut ser)
}

/// Render a tree as a JSON document.
pub fn to_json(root: &TreeNode) -> Result<String, serde_json::Error> {
    let mut json = to_pretty_json(root)?;
    json.push('\n');
    Ok(json)
}

/// Read back a tree written by [`to_json`]. Paths are not stored, so they
/// come back empty.
pub fn parse_json(text: &str) -> Result<TreeNode, serde_json::Error> {
    serde_json::from_str(text)
}
