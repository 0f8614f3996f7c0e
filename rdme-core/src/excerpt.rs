//! First-paragraph excerpts for page summaries.

use regex::Regex;
use std::sync::OnceLock;

/// Default excerpt length in characters, before the ellipsis
pub const DEFAULT_EXCERPT_LENGTH: usize = 200;

const ELLIPSIS: &str = "...";

static LINK_ONLY_LINE: OnceLock<Regex> = OnceLock::new();

fn link_only_line() -> &'static Regex {
    LINK_ONLY_LINE.get_or_init(|| Regex::new(r"^\s*\[.*\]\(.*\)\s*$").unwrap())
}

/// Whether a line opens or closes a fenced code block
pub(crate) fn is_fence(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.starts_with("```") || trimmed.starts_with("~~~")
}

/// Extract the first prose paragraph of a markdown body
///
/// Fenced code, headings, blank lines and lines consisting of a single link
/// (badges) are skipped until the paragraph starts; afterwards a heading or
/// blank line ends it. Returns `None` when the body has no prose.
///
/// # Example
///
/// ```
/// use rdme_core::excerpt::extract_excerpt;
///
/// let body = "# T\n\nHello world.\n\nSecond.";
/// assert_eq!(extract_excerpt(body, 200).as_deref(), Some("Hello world."));
/// ```
pub fn extract_excerpt(body: &str, max_len: usize) -> Option<String> {
    let mut in_code_block = false;
    let mut fragments: Vec<&str> = Vec::new();

    for line in body.lines() {
        if is_fence(line) {
            in_code_block = !in_code_block;
            continue;
        }
        if in_code_block {
            continue;
        }

        let trimmed = line.trim();

        if trimmed.starts_with('#') || trimmed.is_empty() {
            if !fragments.is_empty() {
                break;
            }
            continue;
        }

        if link_only_line().is_match(line) {
            continue;
        }

        fragments.push(trimmed);
    }

    if fragments.is_empty() {
        return None;
    }

    Some(truncate_at_word(&fragments.join(" "), max_len))
}

/// Cut `text` to at most `max_len` characters at a space boundary and append an ellipsis
fn truncate_at_word(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }

    // Byte offset of the character just past the limit; a space there is
    // still a boundary "at" max_len.
    let limit = text
        .char_indices()
        .nth(max_len)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len());
    let window_end = text[limit..]
        .chars()
        .next()
        .map(|c| limit + c.len_utf8())
        .unwrap_or(limit);

    let cut = match text[..window_end].rfind(' ') {
        Some(space) => &text[..space],
        None => &text[..limit],
    };

    format!("{cut}{ELLIPSIS}")
}
