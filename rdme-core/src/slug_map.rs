//! Project-wide mapping from document identifier to publish slug.

use crate::slug::generate_slug;
use rdme_types::{DocId, Document, FieldValue, FrontmatterFields, MetaValue, MetadataBag};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SlugMapError {
    #[error("Document '{doc_id}' resolves to an empty slug")]
    EmptySlug { doc_id: DocId },

    #[error("Document '{doc_id}' appears more than once in the build")]
    DuplicateDocument { doc_id: DocId },
}

/// Final slug of every document in a build
///
/// Built once before any document is transformed and read-only afterwards, so
/// a shared reference can be handed to any number of concurrent transforms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SlugMap {
    entries: BTreeMap<DocId, String>,
}

impl SlugMap {
    pub fn get(&self, doc_id: &str) -> Option<&str> {
        self.entries.get(doc_id).map(String::as_str)
    }

    pub fn contains(&self, doc_id: &str) -> bool {
        self.entries.contains_key(doc_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in document identifier order
    pub fn iter(&self) -> impl Iterator<Item = (&DocId, &str)> {
        self.entries.iter().map(|(id, slug)| (id, slug.as_str()))
    }

    /// Build the map from a document set
    pub fn from_documents(documents: &[Document], prefix: &str) -> Result<Self, SlugMapError> {
        build_slug_map(documents.iter().map(|doc| (&doc.id, &doc.metadata)), prefix)
    }
}

/// Build the slug map for a whole build
///
/// Each document's slug is its explicit override, checked as the namespaced
/// `<prefix>slug` key and then as a plain `slug` key, or else the slug
/// generated from its identifier. A document whose slug comes out empty is
/// rejected rather than published under an empty URL, and so is a document
/// identifier listed twice.
pub fn build_slug_map<'a, I>(documents: I, prefix: &str) -> Result<SlugMap, SlugMapError>
where
    I: IntoIterator<Item = (&'a DocId, &'a MetadataBag)>,
{
    let namespaced_key = format!("{prefix}slug");
    let mut entries = BTreeMap::new();
    let mut owners: HashMap<String, DocId> = HashMap::new();

    for (doc_id, metadata) in documents {
        if entries.contains_key(doc_id) {
            return Err(SlugMapError::DuplicateDocument {
                doc_id: doc_id.clone(),
            });
        }

        let explicit = metadata
            .get(&namespaced_key)
            .or_else(|| metadata.get("slug"))
            .and_then(explicit_slug);

        let slug = match explicit {
            Some(slug) => {
                tracing::debug!("Using explicit slug '{}' for {}", slug, doc_id);
                slug
            }
            None => generate_slug(doc_id.as_str()),
        };

        if slug.is_empty() {
            return Err(SlugMapError::EmptySlug {
                doc_id: doc_id.clone(),
            });
        }

        if let Some(owner) = owners.get(&slug) {
            if owner != doc_id {
                tracing::warn!("Slug '{}' is shared by {} and {}", slug, owner, doc_id);
            }
        } else {
            owners.insert(slug.clone(), doc_id.clone());
        }

        entries.insert(doc_id.clone(), slug);
    }

    tracing::debug!("Built slug map with {} entries", entries.len());

    Ok(SlugMap { entries })
}

/// Reject a document set that lists the same identifier twice
pub fn ensure_unique_ids(documents: &[Document]) -> Result<(), SlugMapError> {
    let mut seen = HashSet::new();
    for doc in documents {
        if !seen.insert(&doc.id) {
            return Err(SlugMapError::DuplicateDocument {
                doc_id: doc.id.clone(),
            });
        }
    }
    Ok(())
}

/// Rewrite an explicit `slug` field the way the slug map reads it
///
/// Scalars become their trimmed text; a blank or non-scalar override is
/// dropped so the generated slug is published. `Null` is left alone since it
/// suppresses the field.
pub(crate) fn normalize_slug_field(fields: &mut FrontmatterFields) {
    let slug = match fields.get("slug") {
        None | Some(FieldValue::Null) => return,
        Some(value) => value.to_plain_text().map(|text| text.trim().to_string()),
    };

    match slug {
        Some(slug) if !slug.is_empty() => {
            fields.insert("slug".to_string(), FieldValue::String(slug));
        }
        _ => {
            fields.shift_remove("slug");
        }
    }
}

fn explicit_slug(value: &MetaValue) -> Option<String> {
    let text = match value {
        MetaValue::Text(text) => text.clone(),
        MetaValue::Typed(typed) => typed.to_plain_text()?,
    };
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
