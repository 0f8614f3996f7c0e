//! Frontmatter synthesis from generated values, defaults and document overrides.
//!
//! Precedence, lowest to highest:
//!
//! 1. auto-generated `title`, `slug` and `content.excerpt`
//! 2. `default_frontmatter` from the configuration
//! 3. per-document metadata
//!
//! Each layer is deep-merged onto the previous one, so a document can set
//! `content.excerpt` without discarding `content.*` fields supplied by the
//! defaults.

use crate::config::Configuration;
use crate::excerpt::{extract_excerpt, is_fence};
use crate::slug::generate_slug;
use rdme_types::{Document, FieldValue, FrontmatterFields};

/// Merge `layer` into `base`
///
/// Where both sides hold a mapping for the same key the mappings are merged
/// recursively; any other value from `layer` replaces what `base` had. Replaced
/// keys keep their original position.
pub fn deep_merge(base: &mut FrontmatterFields, layer: &FrontmatterFields) {
    for (key, value) in layer {
        if let (Some(FieldValue::Mapping(existing)), FieldValue::Mapping(incoming)) =
            (base.get_mut(key), value)
        {
            deep_merge(existing, incoming);
            continue;
        }
        base.insert(key.clone(), value.clone());
    }
}

/// Build the complete field mapping for one document
///
/// `body` is the markdown the excerpt and title are taken from (normally the
/// link-rewritten body); `overrides` is the document's extracted metadata.
pub fn build_frontmatter(
    doc: &Document,
    body: &str,
    config: &Configuration,
    overrides: &FrontmatterFields,
) -> FrontmatterFields {
    let mut fields = FrontmatterFields::new();
    let auto = config.auto_fields;

    if auto.title {
        fields.insert("title".to_string(), extract_title(doc, body).into());
    }

    if auto.slug {
        let slug = generate_slug(doc.id.as_str());
        if slug.is_empty() {
            tracing::debug!("No slug can be generated for '{}'", doc.id);
        } else {
            fields.insert("slug".to_string(), slug.into());
        }
    }

    if auto.excerpt {
        match extract_excerpt(body, config.excerpt_max_length) {
            Some(excerpt) => {
                // The page API expects the excerpt inside the content object
                let mut content = FrontmatterFields::new();
                content.insert("excerpt".to_string(), excerpt.into());
                fields.insert("content".to_string(), content.into());
            }
            None => tracing::debug!("No excerpt found for '{}'", doc.id),
        }
    }

    deep_merge(&mut fields, &config.default_frontmatter);
    deep_merge(&mut fields, overrides);

    fields
}

/// Page title for a document
///
/// Uses the title reported by the renderer, then the first heading of the
/// body, then a humanized form of the identifier (`api/index` -> `Api Index`).
pub fn extract_title(doc: &Document, body: &str) -> String {
    if let Some(title) = doc.title.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        return title.to_string();
    }

    first_heading(body).unwrap_or_else(|| humanize(doc.id.as_str()))
}

/// Text of the first ATX heading outside fenced code
fn first_heading(body: &str) -> Option<String> {
    let mut in_code_block = false;
    for line in body.lines() {
        if is_fence(line) {
            in_code_block = !in_code_block;
            continue;
        }
        if in_code_block {
            continue;
        }
        if let Some(text) = heading_text(line.trim()) {
            return Some(text);
        }
    }
    None
}

fn heading_text(line: &str) -> Option<String> {
    let level = line.chars().take_while(|c| *c == '#').count();
    if level == 0 || level > 6 {
        return None;
    }
    let rest = &line[level..];
    if !rest.is_empty() && !rest.starts_with([' ', '\t']) {
        return None;
    }

    // Optional closing sequence: "## Title ##"
    let rest = rest.trim();
    let without_closing = rest.trim_end_matches('#');
    let text = if without_closing.is_empty() || without_closing.ends_with([' ', '\t']) {
        without_closing.trim()
    } else {
        rest
    };

    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Turn an identifier into words with each word capitalized
pub fn humanize(doc_id: &str) -> String {
    let spaced: String = doc_id
        .chars()
        .map(|c| match c {
            '/' | '\\' | '-' | '_' => ' ',
            _ => c,
        })
        .collect();

    let mut out = String::with_capacity(spaced.len());
    let mut prev_alphabetic = false;
    for c in spaced.chars() {
        if c.is_alphabetic() {
            if prev_alphabetic {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alphabetic = true;
        } else {
            out.push(c);
            prev_alphabetic = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(entries: Vec<(&str, FieldValue)>) -> FrontmatterFields {
        entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    #[test]
    fn test_humanize() {
        assert_eq!(humanize("my-document"), "My Document");
        assert_eq!(humanize("api/index"), "Api Index");
        assert_eq!(humanize("getting_STARTED"), "Getting Started");
        assert_eq!(humanize("v2api"), "V2Api");
    }

    #[test]
    fn test_title_prefers_renderer_title() {
        let doc = Document::new("my-doc", "").with_title("Tree Title");
        assert_eq!(extract_title(&doc, "# Body Title"), "Tree Title");
    }

    #[test]
    fn test_title_from_first_heading() {
        let doc = Document::new("my-doc", "").with_title("   ");
        let body = "```\n# not a heading\n```\nIntro\n\n## Real Title ##\n# Later";
        assert_eq!(extract_title(&doc, body), "Real Title");
    }

    #[test]
    fn test_title_falls_back_to_doc_id() {
        let doc = Document::new("my-doc", "");
        assert_eq!(extract_title(&doc, "No headings\n#hashtag"), "My Doc");
    }

    #[test]
    fn test_heading_text() {
        assert_eq!(heading_text("# Title").as_deref(), Some("Title"));
        assert_eq!(heading_text("### C# Tips").as_deref(), Some("C# Tips"));
        assert_eq!(heading_text("## Issue #42").as_deref(), Some("Issue #42"));
        assert_eq!(heading_text("# Done #").as_deref(), Some("Done"));
        assert_eq!(heading_text("#"), None);
        assert_eq!(heading_text("####### seven"), None);
        assert_eq!(heading_text("#tag"), None);
    }

    #[test]
    fn test_deep_merge_replaces_scalars() {
        let mut base = fields(vec![("title", "Auto".into()), ("slug", "auto".into())]);
        deep_merge(&mut base, &fields(vec![("title", "Override".into())]));
        assert_eq!(
            base,
            fields(vec![("title", "Override".into()), ("slug", "auto".into())])
        );
    }

    #[test]
    fn test_deep_merge_recurses_into_mappings() {
        let mut base = fields(vec![(
            "content",
            fields(vec![("excerpt", "auto".into()), ("body", "b".into())]).into(),
        )]);
        let layer = fields(vec![(
            "content",
            fields(vec![("excerpt", "manual".into()), ("next", 1i64.into())]).into(),
        )]);

        deep_merge(&mut base, &layer);

        assert_eq!(
            base["content"],
            FieldValue::Mapping(fields(vec![
                ("excerpt", "manual".into()),
                ("body", "b".into()),
                ("next", 1i64.into()),
            ]))
        );
    }

    #[test]
    fn test_deep_merge_mapping_over_scalar_replaces() {
        let mut base = fields(vec![("category", "guides".into())]);
        let layer = fields(vec![(
            "category",
            fields(vec![("uri", "guides".into())]).into(),
        )]);
        deep_merge(&mut base, &layer);
        assert_eq!(base, layer);

        // and the other way round
        let mut base = layer.clone();
        deep_merge(&mut base, &fields(vec![("category", FieldValue::Null)]));
        assert_eq!(base["category"], FieldValue::Null);
    }

    #[test]
    fn test_auto_fields() {
        let doc = Document::new("my-doc", "");
        let body = "# My Title\n\nSome content here.";
        let result = build_frontmatter(&doc, body, &Configuration::default(), &FrontmatterFields::new());

        assert_eq!(result["title"], FieldValue::String("My Title".into()));
        assert_eq!(result["slug"], FieldValue::String("my-doc".into()));
        assert_eq!(
            result["content"].get("excerpt"),
            Some(&FieldValue::String("Some content here.".into()))
        );
        let keys: Vec<&str> = result.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["title", "slug", "content"]);
    }

    #[test]
    fn test_no_excerpt_no_content() {
        let doc = Document::new("empty", "");
        let result = build_frontmatter(&doc, "# Only", &Configuration::default(), &FrontmatterFields::new());
        assert!(!result.contains_key("content"));
    }

    #[test]
    fn test_auto_fields_can_be_disabled() {
        let mut config = Configuration::default();
        config.auto_fields.title = false;
        config.auto_fields.excerpt = false;

        let doc = Document::new("page", "");
        let result = build_frontmatter(&doc, "Text", &config, &FrontmatterFields::new());
        assert_eq!(result, fields(vec![("slug", "page".into())]));
    }

    #[test]
    fn test_precedence() {
        let mut config = Configuration::default();
        config.default_frontmatter = fields(vec![("title", "D".into()), ("hidden", false.into())]);
        let overrides = fields(vec![("title", "X".into())]);

        let doc = Document::new("my-doc", "");
        let result = build_frontmatter(&doc, "", &config, &overrides);

        assert_eq!(result["title"], FieldValue::String("X".into()));
        assert_eq!(result["hidden"], FieldValue::Bool(false));
    }

    #[test]
    fn test_document_overrides_only_excerpt() {
        let mut config = Configuration::default();
        config.default_frontmatter = fields(vec![(
            "content",
            fields(vec![("body_format", "markdown".into())]).into(),
        )]);
        let overrides = fields(vec![(
            "content",
            fields(vec![("excerpt", "Hand written".into())]).into(),
        )]);

        let doc = Document::new("guide", "");
        let result = build_frontmatter(&doc, "Generated excerpt.", &config, &overrides);

        assert_eq!(
            result["content"],
            FieldValue::Mapping(fields(vec![
                ("excerpt", "Hand written".into()),
                ("body_format", "markdown".into()),
            ]))
        );
    }

    #[test]
    fn test_null_override_suppresses_field() {
        let doc = Document::new("guide", "");
        let overrides = fields(vec![("slug", FieldValue::Null)]);
        let result = build_frontmatter(&doc, "", &Configuration::default(), &overrides);
        assert_eq!(result["slug"], FieldValue::Null);
    }

    #[test]
    fn test_separator_only_id_has_no_auto_slug() {
        let doc = Document::new("/", "");
        let result = build_frontmatter(&doc, "", &Configuration::default(), &FrontmatterFields::new());
        assert!(!result.contains_key("slug"));
    }
}
