//! Slug generation from document identifiers.

use regex::Regex;
use std::sync::OnceLock;

static HYPHEN_RUN: OnceLock<Regex> = OnceLock::new();

fn hyphen_run() -> &'static Regex {
    HYPHEN_RUN.get_or_init(|| Regex::new(r"-+").unwrap())
}

/// Convert a document identifier to a publish slug
///
/// Rules:
/// - Path separators (`/`, `\`) and underscores become hyphens
/// - Lowercase (characters without a lowercase mapping, such as `ϒ`, are
///   kept as they are)
/// - Collapse multiple hyphens
/// - Trim leading/trailing hyphens
///
/// An identifier made only of separators yields an empty string; callers that
/// need a usable slug must check for that (see [`crate::slug_map::build_slug_map`]).
///
/// # Examples
///
/// ```
/// use rdme_core::generate_slug;
///
/// assert_eq!(generate_slug("api/index"), "api-index");
/// assert_eq!(generate_slug("My_Document"), "my-document");
/// assert_eq!(generate_slug("/guides//intro/"), "guides-intro");
/// ```
pub fn generate_slug(doc_id: &str) -> String {
    let with_hyphens: String = doc_id
        .chars()
        .map(|c| match c {
            '/' | '\\' | '_' => '-',
            _ => c,
        })
        .collect();

    let lowercased = with_hyphens.to_lowercase();
    let collapsed = hyphen_run().replace_all(&lowercased, "-");

    collapsed.trim_matches('-').to_string()
}

/// Check that a string already has slug shape
///
/// "Lowercase" means lowercasing leaves the slug unchanged, which also admits
/// uppercase characters that have no lowercase form.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && !slug.contains("--")
        && !slug.contains(['/', '\\'])
        && slug.to_lowercase() == slug
}
