//! Document manifest loading.
//!
//! A manifest lists the rendered documents of one build:
//!
//! ```yaml
//! - id: index
//!   path: rendered/index.md
//! - id: api/auth
//!   body: "# Authentication\n..."
//!   title: Authentication
//!   metadata:
//!     rdme-hidden: "true"
//! ```

use anyhow::{bail, Context, Result};
use rdme_types::{DocId, Document, MetadataBag};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ManifestEntry {
    id: DocId,
    #[serde(default)]
    body: Option<String>,
    /// Rendered body file, relative to the manifest
    #[serde(default)]
    path: Option<PathBuf>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    metadata: MetadataBag,
}

/// Read every document listed in a manifest file
pub fn load_documents(manifest_path: &Path) -> Result<Vec<Document>> {
    let contents = fs::read_to_string(manifest_path)
        .with_context(|| format!("Failed to read manifest {:?}", manifest_path))?;

    let entries: Vec<ManifestEntry> = if is_json(manifest_path) {
        serde_json::from_str(&contents).context("Failed to parse JSON manifest")?
    } else {
        serde_yaml::from_str(&contents).context("Failed to parse YAML manifest")?
    };

    let base_dir = manifest_path.parent().unwrap_or_else(|| Path::new(""));
    let documents = entries
        .into_iter()
        .map(|entry| entry.into_document(base_dir))
        .collect::<Result<Vec<_>>>()?;

    tracing::info!("Loaded {} documents from {:?}", documents.len(), manifest_path);
    Ok(documents)
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

impl ManifestEntry {
    fn into_document(self, base_dir: &Path) -> Result<Document> {
        let body = match (self.body, self.path) {
            (Some(body), None) => body,
            (None, Some(path)) => {
                let full_path = base_dir.join(&path);
                fs::read_to_string(&full_path).with_context(|| {
                    format!("Failed to read body of '{}' from {:?}", self.id, full_path)
                })?
            }
            (Some(_), Some(_)) => bail!("Document '{}' sets both body and path", self.id),
            (None, None) => bail!("Document '{}' has neither body nor path", self.id),
        };

        Ok(Document {
            id: self.id,
            body,
            metadata: self.metadata,
            title: self.title,
        })
    }
}
