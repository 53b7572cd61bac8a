//! Shared utility functions for output formatting

/// One level of indentation for every skin.
pub const INDENT: &str = "    ";

/// Connector drawn before an entry by the tree skin.
pub fn connector(is_last: bool) -> &'static str {
    if is_last { "└── " } else { "├── " }
}

/// Extend a tree-skin guide for the children of an entry.
pub fn continuation_prefix(prefix: &str, is_last: bool) -> String {
    if is_last {
        format!("{}{}", prefix, INDENT)
    } else {
        format!("{}│   ", prefix)
    }
}

/// Escape text for HTML element content and attribute values.
pub fn escape_html(text: &str) -> String {
    escape_markup(text, "&#x27;")
}

/// Escape text for an XML attribute value.
pub fn escape_xml(text: &str) -> String {
    escape_markup(text, "&apos;")
}

/// Escape markup characters and whitespace controls as character references.
/// Characters XML 1.0 cannot carry at all become U+FFFD.
fn escape_markup(text: &str, apostrophe: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str(apostrophe),
            '\t' => out.push_str("&#9;"),
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            '\u{0}'..='\u{1f}' | '\u{fffe}' | '\u{ffff}' => out.push(char::REPLACEMENT_CHARACTER),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_continuation_prefix_last_item() {
        assert_eq!(continuation_prefix("│   ", true), "│       ");
    }

    #[test]
    fn test_continuation_prefix_not_last_item() {
        assert_eq!(continuation_prefix("", false), "│   ");
    }

    #[test]
    fn test_escaping() {
        assert_eq!(escape_html("<a & 'b'>"), "&lt;a &amp; &#x27;b&#x27;&gt;");
        assert_eq!(escape_xml("say \"hi\" & 'bye'"), "say &quot;hi&quot; &amp; &apos;bye&apos;");
        assert_eq!(escape_html("plain.txt"), "plain.txt");
    }

    #[test]
    fn test_control_characters() {
        assert_eq!(escape_xml("a\tb\nc\rd"), "a&#9;b&#10;c&#13;d");
        assert_eq!(escape_xml("bell\x07.cs"), "bell\u{fffd}.cs");
        assert_eq!(escape_html("line\nbreak\x1b"), "line&#10;break\u{fffd}");
        assert!(!escape_xml("\0\x01\x1f").chars().any(|c| c.is_control()));
    }
}
