//! Per-document frontmatter overrides from renderer metadata.
//!
//! Two sourcing conventions are supported:
//!
//! 1. Namespaced field-list keys, e.g. `rdme-hidden: true` or
//!    `rdme-category: guides`. The namespace is stripped and the remainder is
//!    used as the field name, whatever it is.
//! 2. Frontmatter-style keys listed in the passthrough set, e.g. `title` or
//!    `hidden`, copied under their own name.
//!
//! When both conventions name the same field the namespaced key wins.

use rdme_types::{FieldValue, FrontmatterFields, MetaValue, MetadataBag};
use std::collections::BTreeSet;

/// Document fields accepted by the hosting platform's page API
pub const DEFAULT_PASSTHROUGH_FIELDS: &[&str] = &[
    "title",
    "category",
    "slug",
    "content",
    "type",
    "state",
    "position",
    "order",
    "hidden",
    "parent",
    "next",
    "link",
    "metadata",
    "privacy",
    "appearance",
    "allow_crawlers",
];

/// The built-in passthrough set as owned strings
pub fn default_passthrough_fields() -> BTreeSet<String> {
    DEFAULT_PASSTHROUGH_FIELDS
        .iter()
        .map(|field| field.to_string())
        .collect()
}

/// Build the override layer for one document
///
/// `prefix` is the full key prefix including the trailing hyphen (`"rdme-"`).
/// `passthrough` of `None` means [`DEFAULT_PASSTHROUGH_FIELDS`].
pub fn extract_metadata(
    bag: &MetadataBag,
    prefix: &str,
    passthrough: Option<&BTreeSet<String>>,
) -> FrontmatterFields {
    let is_passthrough = |key: &str| match passthrough {
        Some(fields) => fields.contains(key),
        None => DEFAULT_PASSTHROUGH_FIELDS.contains(&key),
    };

    let mut fields = FrontmatterFields::new();

    // Plain keys first so a namespaced key for the same field always lands last.
    for (key, value) in bag {
        if !key.starts_with(prefix) && is_passthrough(key) {
            fields.insert(key.clone(), coerce(value));
        }
    }

    for (key, value) in bag {
        let Some(field) = key.strip_prefix(prefix) else {
            continue;
        };
        if field.is_empty() {
            tracing::debug!("Ignoring bare namespace key '{}'", key);
            continue;
        }
        fields.insert(field.to_string(), coerce(value));
    }

    fields
}

fn coerce(value: &MetaValue) -> FieldValue {
    match value {
        MetaValue::Text(raw) => parse_scalar(raw),
        MetaValue::Typed(typed) => typed.clone(),
    }
}

/// Parse a metadata string into a typed value
///
/// `true`/`false` (any case) become booleans, all-digit strings integers, then
/// floats are tried. Strings opening with `{` or `[` are parsed as JSON and
/// kept verbatim if that fails. Everything else stays a string.
///
/// # Example
///
/// ```
/// use rdme_core::metadata::parse_scalar;
/// use rdme_types::FieldValue;
///
/// assert_eq!(parse_scalar("TRUE"), FieldValue::Bool(true));
/// assert_eq!(parse_scalar("42"), FieldValue::Integer(42));
/// assert_eq!(parse_scalar("guides"), FieldValue::String("guides".into()));
/// ```
pub fn parse_scalar(raw: &str) -> FieldValue {
    if raw.eq_ignore_ascii_case("true") {
        return FieldValue::Bool(true);
    }
    if raw.eq_ignore_ascii_case("false") {
        return FieldValue::Bool(false);
    }
    if !raw.is_empty() && raw.chars().all(|c| c.is_ascii_digit()) {
        if let Ok(int) = raw.parse::<i64>() {
            return FieldValue::Integer(int);
        }
    }
    if let Ok(float) = raw.trim().parse::<f64>() {
        return FieldValue::Float(float);
    }
    if raw.starts_with('{') || raw.starts_with('[') {
        match serde_json::from_str::<FieldValue>(raw) {
            Ok(parsed) => return parsed,
            Err(err) => tracing::debug!("Keeping '{}' as text: {}", raw, err),
        }
    }
    FieldValue::String(raw.to_string())
}
