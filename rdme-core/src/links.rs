//! Inline link rewriting for `[text](target)` syntax.
//!
//! Internal links in rendered markdown point at source files (`guide.md`),
//! while the hosting platform addresses pages by slug. Two modes:
//!
//! - strip: drop the file extension, `[Link](file.md#section)` becomes
//!   `[Link](file#section)`
//! - slug-resolving: resolve the target against the current document's
//!   directory and replace it with the target document's slug, falling back to
//!   the stripped form when the target is not part of the build

use crate::slug_map::SlugMap;
use rdme_types::DocId;
use regex::{Captures, Regex};
use std::sync::OnceLock;

/// Extension of source documents referenced by internal links
pub const DEFAULT_LINK_EXTENSION: &str = ".md";

static INLINE_LINK: OnceLock<Regex> = OnceLock::new();
static URI_SCHEME: OnceLock<Regex> = OnceLock::new();

fn inline_link() -> &'static Regex {
    INLINE_LINK.get_or_init(|| Regex::new(r"\[([^\]]*)\]\(([^)]+)\)").unwrap())
}

fn uri_scheme() -> &'static Regex {
    URI_SCHEME.get_or_init(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.-]*:").unwrap())
}

/// Rewriter for the inline links of one build
pub struct LinkRewriter<'a> {
    extension: &'a str,
    slug_map: Option<&'a SlugMap>,
}

impl<'a> LinkRewriter<'a> {
    /// Strip-mode rewriter for the given extension (e.g. `".md"`)
    pub fn new(extension: &'a str) -> Self {
        Self {
            extension,
            slug_map: None,
        }
    }

    /// Switch to slug-resolving mode
    pub fn with_slug_map(mut self, slug_map: &'a SlugMap) -> Self {
        self.slug_map = Some(slug_map);
        self
    }

    /// Rewrite every inline link in `content`
    ///
    /// `current` is the identifier of the document being rewritten; relative
    /// targets are resolved against its directory.
    pub fn rewrite(&self, content: &str, current: &DocId) -> String {
        inline_link()
            .replace_all(content, |caps: &Captures<'_>| {
                let text = &caps[1];
                let target = &caps[2];
                match self.rewrite_target(target, current) {
                    Some(new_target) => format!("[{text}]({new_target})"),
                    None => caps[0].to_string(),
                }
            })
            .into_owned()
    }

    /// New target for a link, or `None` to leave the link untouched
    fn rewrite_target(&self, target: &str, current: &DocId) -> Option<String> {
        if uri_scheme().is_match(target) {
            return None;
        }

        match self.slug_map {
            None => {
                let (path, anchor) = split_anchor(target);
                let path = path.strip_suffix(self.extension).unwrap_or(path);
                Some(format!("{path}{anchor}"))
            }
            Some(slug_map) => self.resolve_target(target, current, slug_map),
        }
    }

    fn resolve_target(&self, target: &str, current: &DocId, slug_map: &SlugMap) -> Option<String> {
        if !has_tracked_extension(target, self.extension) {
            return None;
        }

        let (path, anchor) = split_anchor(target);
        let path = path.strip_suffix(self.extension).unwrap_or(path);
        let path = path.strip_prefix("./").unwrap_or(path);

        let resolved = resolve_relative(current.parent(), path);

        match slug_map.get(&resolved) {
            Some(slug) => Some(format!("{slug}{anchor}")),
            None => {
                tracing::debug!(
                    "Link target '{}' in {} is not in the slug map; stripping extension only",
                    target,
                    current
                );
                Some(format!("{path}{anchor}"))
            }
        }
    }
}

/// Strip-mode rewrite with the default extension
pub fn strip_link_extensions(content: &str) -> String {
    LinkRewriter::new(DEFAULT_LINK_EXTENSION).rewrite(content, &DocId::default())
}

/// Slug-resolving rewrite with the default extension
pub fn rewrite_links_with_slugs(content: &str, current: &DocId, slug_map: &SlugMap) -> String {
    LinkRewriter::new(DEFAULT_LINK_EXTENSION)
        .with_slug_map(slug_map)
        .rewrite(content, current)
}

/// Split a target into path and anchor; the anchor keeps its `#`
fn split_anchor(target: &str) -> (&str, &str) {
    match target.find('#') {
        Some(idx) => (&target[..idx], &target[idx..]),
        None => (target, ""),
    }
}

/// Whether the extension appears anywhere in the target directly before `#` or the end
fn has_tracked_extension(target: &str, extension: &str) -> bool {
    target.match_indices(extension).any(|(idx, _)| {
        let rest = &target[idx + extension.len()..];
        rest.is_empty() || rest.starts_with('#')
    })
}

/// Join `relative` onto `dir` and normalize `.` and `..` segments
///
/// Backslashes are treated as separators and the result always uses `/`.
/// `..` segments that climb above a relative root are kept.
pub fn resolve_relative(dir: &str, relative: &str) -> String {
    let relative = relative.replace('\\', "/");
    let joined = if relative.starts_with('/') || dir.is_empty() {
        relative
    } else {
        format!("{}/{}", dir.replace('\\', "/"), relative)
    };

    let absolute = joined.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();
    for segment in joined.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.last().is_some_and(|last| *last != "..") {
                    segments.pop();
                } else if !absolute {
                    segments.push("..");
                }
            }
            other => segments.push(other),
        }
    }

    let path = segments.join("/");
    if absolute {
        format!("/{path}")
    } else if path.is_empty() {
        ".".to_string()
    } else {
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdme_types::Document;

    fn slug_map(entries: &[(&str, &str)]) -> SlugMap {
        let docs: Vec<Document> = entries
            .iter()
            .map(|(id, slug)| Document::new(*id, "").with_meta("slug", *slug))
            .collect();
        SlugMap::from_documents(&docs, "rdme-").unwrap()
    }

    #[test]
    fn test_strip_mode() {
        assert_eq!(
            strip_link_extensions("[Link](file.md#section)"),
            "[Link](file#section)"
        );
        assert_eq!(
            strip_link_extensions("[Link](./path/to/file.md)"),
            "[Link](./path/to/file)"
        );
        assert_eq!(strip_link_extensions("[Img](logo.png)"), "[Img](logo.png)");
    }

    #[test]
    fn test_strip_mode_leaves_absolute_uris() {
        for link in [
            "[Link](https://x.com/file.md)",
            "[Mail](mailto:test@example.md)",
            "[Ftp](ftp+ssl://host/a.md#b)",
        ] {
            assert_eq!(strip_link_extensions(link), link);
        }
    }

    #[test]
    fn test_strip_mode_rewrites_every_link() {
        let content = "See [a](a.md) and [b](../b.md#top), not [c](c.markdown).\n![img](pic.md)";
        assert_eq!(
            strip_link_extensions(content),
            "See [a](a) and [b](../b#top), not [c](c.markdown).\n![img](pic)"
        );
    }

    #[test]
    fn test_strip_mode_only_trailing_extension() {
        assert_eq!(strip_link_extensions("[x](notes.md.bak)"), "[x](notes.md.bak)");
        assert_eq!(strip_link_extensions("[x](a.mdx)"), "[x](a.mdx)");
    }

    #[test]
    fn test_resolves_parent_directory() {
        let map = slug_map(&[("auth", "cli-auth")]);
        assert_eq!(
            rewrite_links_with_slugs("[Link](../auth.md)", &DocId::new("api/index"), &map),
            "[Link](cli-auth)"
        );
    }

    #[test]
    fn test_resolves_sibling_with_anchor() {
        let map = slug_map(&[("api/ref", "api-reference")]);
        assert_eq!(
            rewrite_links_with_slugs("[Ref](./ref.md#section)", &DocId::new("api/index"), &map),
            "[Ref](api-reference#section)"
        );
        assert_eq!(
            rewrite_links_with_slugs("[Ref](api/ref.md)", &DocId::new("index"), &map),
            "[Ref](api-reference)"
        );
    }

    #[test]
    fn test_unresolved_target_falls_back_to_stripped_path() {
        let map = slug_map(&[("auth", "cli-auth")]);
        assert_eq!(
            rewrite_links_with_slugs("[Gone](./missing.md#x)", &DocId::new("api/index"), &map),
            "[Gone](missing#x)"
        );
        assert_eq!(
            rewrite_links_with_slugs("[Gone](../../up.md)", &DocId::new("api/index"), &map),
            "[Gone](../../up)"
        );
    }

    #[test]
    fn test_slug_mode_leaves_untracked_targets() {
        let map = slug_map(&[("logo", "logo")]);
        let current = DocId::new("index");
        for link in [
            "[Logo](logo.png)",
            "[Anchor](#local)",
            "[Ext](https://x.com/logo.md)",
            "[Dir](guides/)",
        ] {
            assert_eq!(rewrite_links_with_slugs(link, &current, &map), link);
        }
    }

    #[test]
    fn test_custom_extension() {
        let map = slug_map(&[("guide", "the-guide")]);
        let rewriter = LinkRewriter::new(".rst").with_slug_map(&map);
        assert_eq!(
            rewriter.rewrite("[G](guide.rst) [M](guide.md)", &DocId::new("index")),
            "[G](the-guide) [M](guide.md)"
        );
    }

    #[test]
    fn test_has_tracked_extension() {
        assert!(has_tracked_extension("a.md", ".md"));
        assert!(has_tracked_extension("a.md#b", ".md"));
        assert!(has_tracked_extension("a#b.md", ".md"));
        assert!(!has_tracked_extension("a.mdx", ".md"));
        assert!(!has_tracked_extension("a.md.txt", ".md"));
    }

    #[test]
    fn test_resolve_relative() {
        assert_eq!(resolve_relative("api", "../auth"), "auth");
        assert_eq!(resolve_relative("api/v2", "./ref"), "api/v2/ref");
        assert_eq!(resolve_relative("", "guides//intro"), "guides/intro");
        assert_eq!(resolve_relative("api", "../../x"), "../x");
        assert_eq!(resolve_relative("api", "/abs/page"), "/abs/page");
        assert_eq!(resolve_relative("/", "../x"), "/x");
        assert_eq!(resolve_relative(r"api\v2", r"..\auth"), "api/auth");
        assert_eq!(resolve_relative("api", ".."), ".");
    }
}
