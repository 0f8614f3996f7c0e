//! Block-style YAML frontmatter emission.
//!
//! Output is written by hand rather than through `serde_yaml` so that field
//! order, quoting and indentation are stable across runs:
//!
//! ```text
//! ---
//! title: "Getting Started"
//! hidden: false
//! content:
//!   excerpt: "Install the tool."
//! ---
//!
//! ```

use rdme_types::{FieldValue, FrontmatterFields};

const DELIMITER: &str = "---";
const INDENT: &str = "  ";

/// Serialize fields to a delimited frontmatter block
///
/// Top-level `Null` fields are skipped. The block ends with the closing
/// delimiter followed by one blank line, ready to be prepended to a body.
///
/// # Example
///
/// ```
/// use rdme_core::yaml::emit_frontmatter;
/// use rdme_types::FrontmatterFields;
///
/// assert_eq!(emit_frontmatter(&FrontmatterFields::new()), "---\n---\n\n");
/// ```
pub fn emit_frontmatter(fields: &FrontmatterFields) -> String {
    let mut lines = vec![DELIMITER.to_string()];
    emit_mapping(fields, 0, &mut lines);
    lines.push(DELIMITER.to_string());

    let mut out = lines.join("\n");
    out.push_str("\n\n");
    out
}

/// Format a scalar for inline use; `None` for collections that need a block
pub fn format_scalar(value: &FieldValue) -> Option<String> {
    match value {
        FieldValue::Null => Some("null".to_string()),
        FieldValue::Bool(b) => Some(if *b { "true" } else { "false" }.to_string()),
        FieldValue::Integer(i) => Some(i.to_string()),
        FieldValue::Float(f) => Some(format_float(*f)),
        FieldValue::String(s) => Some(quote(s)),
        FieldValue::Sequence(items) if items.is_empty() => Some("[]".to_string()),
        FieldValue::Mapping(map) if map.values().all(FieldValue::is_null) => {
            Some("{}".to_string())
        }
        FieldValue::Sequence(_) | FieldValue::Mapping(_) => None,
    }
}

fn emit_mapping(map: &FrontmatterFields, depth: usize, lines: &mut Vec<String>) {
    let indent = INDENT.repeat(depth);
    for (key, value) in map {
        if value.is_null() {
            continue;
        }
        let key = format_key(key);
        match format_scalar(value) {
            Some(inline) => lines.push(format!("{indent}{key}: {inline}")),
            None => {
                lines.push(format!("{indent}{key}:"));
                emit_block(value, depth + 1, lines);
            }
        }
    }
}

fn emit_sequence(items: &[FieldValue], depth: usize, lines: &mut Vec<String>) {
    let indent = INDENT.repeat(depth);
    for item in items {
        match format_scalar(item) {
            Some(inline) => lines.push(format!("{indent}- {inline}")),
            None => {
                lines.push(format!("{indent}-"));
                emit_block(item, depth + 1, lines);
            }
        }
    }
}

fn emit_block(value: &FieldValue, depth: usize, lines: &mut Vec<String>) {
    match value {
        FieldValue::Mapping(map) => emit_mapping(map, depth, lines),
        FieldValue::Sequence(items) => emit_sequence(items, depth, lines),
        // format_scalar handles every other variant inline
        _ => {}
    }
}

/// Keys are written plain when YAML reads them back as the same string,
/// and double-quoted otherwise
fn format_key(key: &str) -> String {
    let plain = key
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
        && !matches!(
            key.to_ascii_lowercase().as_str(),
            "true" | "false" | "null" | "yes" | "no" | "on" | "off"
        );

    if plain {
        key.to_string()
    } else {
        quote(key)
    }
}

fn format_float(f: f64) -> String {
    if f.is_nan() {
        ".nan".to_string()
    } else if f.is_infinite() {
        if f > 0.0 { ".inf" } else { "-.inf" }.to_string()
    } else {
        // Debug keeps a fractional part on whole numbers (1.0, not 1)
        format!("{f:?}")
    }
}

fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}
