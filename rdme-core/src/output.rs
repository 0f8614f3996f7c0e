//! Output file naming for transformed documents.

use rdme_types::DocId;
use thiserror::Error;

/// File suffix of published artifacts
pub const OUTPUT_SUFFIX: &str = ".md";

/// Basename a document named `index` is written under, so that it sorts first
/// when the platform's sync tool walks the output alphabetically
pub const INDEX_BASENAME: &str = "00_index";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum OutputPathError {
    #[error("Document '{doc_id}' does not name a file inside the output directory")]
    OutsideOutputDir { doc_id: DocId },
}

/// Relative output path for a document's artifact, always `/`-separated
///
/// The identifier must stay below the output directory: absolute identifiers,
/// drive prefixes, `.`/`..` segments and an empty basename are rejected.
///
/// # Example
///
/// ```
/// use rdme_core::output::output_path;
/// use rdme_types::DocId;
///
/// assert_eq!(output_path(&DocId::new("api/index"), ".md").unwrap(), "api/00_index.md");
/// assert_eq!(output_path(&DocId::new("guide"), ".md").unwrap(), "guide.md");
/// assert!(output_path(&DocId::new("../guide"), ".md").is_err());
/// ```
pub fn output_path(doc_id: &DocId, suffix: &str) -> Result<String, OutputPathError> {
    if !stays_inside(doc_id.as_str()) {
        return Err(OutputPathError::OutsideOutputDir {
            doc_id: doc_id.clone(),
        });
    }

    let dir = doc_id.parent().replace('\\', "/");
    let basename = match doc_id.basename() {
        "index" => INDEX_BASENAME,
        other => other,
    };

    if dir.is_empty() {
        Ok(format!("{basename}{suffix}"))
    } else {
        Ok(format!("{dir}/{basename}{suffix}"))
    }
}

fn stays_inside(id: &str) -> bool {
    // split always yields at least one segment
    let segments: Vec<&str> = id.split(['/', '\\']).collect();
    let first = segments[0];
    let last = segments[segments.len() - 1];

    // "/x" and "\x" start with an empty segment; "C:x" is drive-relative
    let rooted = first.is_empty() || first.contains(':');
    let climbs = segments.iter().any(|s| *s == "." || *s == "..");

    !(rooted || climbs || last.is_empty())
}
