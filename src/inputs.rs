//! Recording discovery in the inputs folder.

use crate::error::{KursError, Result};
use crate::transcription::WhisperTranscriber;
use std::path::{Path, PathBuf};
use tracing::debug;

/// List recordings in `dir` the transcriber accepts, sorted by file name.
pub fn list_media(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(KursError::InvalidInput(format!(
            "inputs folder not found: {}",
            dir.display()
        )));
    }

    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && WhisperTranscriber::is_supported(path))
        .collect();
    files.sort();

    debug!("Found {} recordings in {}", files.len(), dir.display());
    Ok(files)
}

/// Resolve a 1-based menu choice against `files`.
pub fn select<'a>(files: &'a [PathBuf], choice: &str) -> Result<&'a Path> {
    let choice = choice.trim();
    let number: usize = choice
        .parse()
        .map_err(|_| KursError::InvalidInput(format!("'{}' is not a file number", choice)))?;

    number
        .checked_sub(1)
        .and_then(|i| files.get(i))
        .map(PathBuf::as_path)
        .ok_or_else(|| {
            KursError::InvalidInput(format!(
                "choose a number between 1 and {}, got {}",
                files.len(),
                number
            ))
        })
}
