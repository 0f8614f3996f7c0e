//! Build command implementation.

use super::{load_config, manifest::load_documents};
use anyhow::{Context, Result};
use rdme_core::output::{output_path, OUTPUT_SUFFIX};
use rdme_core::Pipeline;
use std::fs;
use std::path::Path;

/// Transform every document of the manifest and write the artifacts under `out_dir`
pub fn build_docs(config_path: &Path, manifest_path: &Path, out_dir: &Path) -> Result<()> {
    let config = load_config(config_path)?;
    let documents = load_documents(manifest_path)?;

    tracing::info!(
        "Building {} documents for platform {:?}",
        documents.len(),
        config.platform
    );

    // Every target is checked before anything is written
    let targets = documents
        .iter()
        .map(|doc| output_path(&doc.id, OUTPUT_SUFFIX).map(|path| out_dir.join(path)))
        .collect::<Result<Vec<_>, _>>()
        .context("Invalid document id")?;

    let pipeline = Pipeline::prepare(config, &documents).context("Failed to build slug map")?;

    fs::create_dir_all(out_dir).context("Failed to create output directory")?;

    for ((doc_id, output), target) in pipeline.transform_all(&documents).into_iter().zip(targets) {
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {:?}", parent))?;
        }
        fs::write(&target, output).with_context(|| format!("Failed to write {:?}", target))?;
        tracing::debug!("Wrote {} to {:?}", doc_id, target);
    }

    tracing::info!("✓ Built {} documents", documents.len());
    tracing::info!("✓ Output written to {:?}", out_dir);

    Ok(())
}
