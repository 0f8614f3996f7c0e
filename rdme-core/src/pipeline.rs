//! Document transformation pipeline
//!
//! Flow: rendered body → link rewrite → frontmatter build → YAML emit → artifact
//!
//! The slug map is built once for the whole document set, before any document
//! is transformed. After that every transform only reads shared state, so a
//! single [`Pipeline`] can serve concurrent per-document transforms.

use crate::config::Configuration;
use crate::frontmatter::build_frontmatter;
use crate::links::LinkRewriter;
use crate::metadata::extract_metadata;
use crate::slug_map::{ensure_unique_ids, normalize_slug_field, SlugMap, SlugMapError};
use crate::yaml::emit_frontmatter;
use rdme_types::{DocId, Document};

/// Transform one rendered document into its publishable text
///
/// With `config.strip_links` set, links are resolved through `slug_map` when
/// one is given and only have their extension stripped otherwise. With
/// `config.emit_frontmatter` set, the frontmatter block built from the
/// rewritten body is prepended.
pub fn transform(doc: &Document, config: &Configuration, slug_map: Option<&SlugMap>) -> String {
    let body = if config.strip_links {
        let rewriter = LinkRewriter::new(&config.link_extension);
        let rewriter = match slug_map {
            Some(map) => rewriter.with_slug_map(map),
            None => rewriter,
        };
        rewriter.rewrite(&doc.body, &doc.id)
    } else {
        doc.body.clone()
    };

    if !config.emit_frontmatter {
        return body;
    }

    let mut overrides =
        extract_metadata(&doc.metadata, &config.key_prefix(), config.passthrough());
    // The published slug must be the one links resolve to
    normalize_slug_field(&mut overrides);
    let fields = build_frontmatter(doc, &body, config, &overrides);

    let mut output = emit_frontmatter(&fields);
    output.push_str(&body);
    output
}

/// The main document processing pipeline
///
/// Owns the build configuration and, for platforms that resolve links to
/// slugs, the slug map of the document set.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: Configuration,
    slug_map: Option<SlugMap>,
}

impl Pipeline {
    /// Create a pipeline without a slug map (strip-mode links)
    pub fn new(config: Configuration) -> Self {
        Self {
            config,
            slug_map: None,
        }
    }

    /// Use an already built slug map
    pub fn with_slug_map(mut self, slug_map: SlugMap) -> Self {
        self.slug_map = Some(slug_map);
        self
    }

    /// Create a pipeline for a document set, building its slug map when the
    /// configuration calls for one
    ///
    /// Fails when a document identifier is listed twice or a document's slug
    /// comes out empty.
    pub fn prepare(config: Configuration, documents: &[Document]) -> Result<Self, SlugMapError> {
        let slug_map = if config.resolves_slugs() {
            let map = SlugMap::from_documents(documents, &config.key_prefix())?;
            tracing::info!("Resolved slugs for {} documents", map.len());
            Some(map)
        } else {
            ensure_unique_ids(documents)?;
            None
        };

        Ok(Self { config, slug_map })
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn slug_map(&self) -> Option<&SlugMap> {
        self.slug_map.as_ref()
    }

    /// Transform a single document
    pub fn transform(&self, doc: &Document) -> String {
        tracing::debug!("Transforming {}", doc.id);
        transform(doc, &self.config, self.slug_map.as_ref())
    }

    /// Transform every document, in input order
    pub fn transform_all(&self, documents: &[Document]) -> Vec<(DocId, String)> {
        let outputs: Vec<(DocId, String)> = documents
            .iter()
            .map(|doc| (doc.id.clone(), self.transform(doc)))
            .collect();
        tracing::info!("Transformed {} documents", outputs.len());
        outputs
    }
}
