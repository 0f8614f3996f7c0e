//! Slug listing command.

use super::{load_config, manifest::load_documents};
use anyhow::{Context, Result};
use rdme_core::SlugMap;
use std::path::Path;

/// Print the slug map of a manifest, one `id -> slug` line per document or as JSON
pub fn print_slugs(config_path: &Path, manifest_path: &Path, json: bool) -> Result<()> {
    let config = load_config(config_path)?;
    let documents = load_documents(manifest_path)?;

    let slug_map = SlugMap::from_documents(&documents, &config.key_prefix())
        .context("Failed to build slug map")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&slug_map)?);
        return Ok(());
    }

    for (doc_id, slug) in slug_map.iter() {
        println!("{doc_id} -> {slug}");
    }
    Ok(())
}
