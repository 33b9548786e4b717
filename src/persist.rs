//! Durable storage of structured documents.
//!
//! The structured document is the only artifact a run leaves behind; the
//! vector index is rebuilt from it on demand.

use crate::error::Result;
use crate::structuring::StructuredDocument;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use tracing::info;

/// File name for a document saved at `now`.
pub fn document_file_name(now: &DateTime<Local>) -> String {
    format!("structured_doc_{}.json", now.format("%Y%m%d_%H%M%S"))
}

/// Write `doc` into `docs_dir`, creating the directory if needed.
pub fn save_structured(
    doc: &StructuredDocument,
    docs_dir: &Path,
    now: DateTime<Local>,
) -> Result<PathBuf> {
    std::fs::create_dir_all(docs_dir)?;
    let path = docs_dir.join(document_file_name(&now));
    std::fs::write(&path, doc.text())?;
    info!("Saved structured document to {}", path.display());
    Ok(path)
}

/// Read a saved document back, validating it against the schema.
pub fn load_structured(path: &Path) -> Result<StructuredDocument> {
    let raw = std::fs::read_to_string(path)?;
    StructuredDocument::parse(&raw)
}
