//! Pre-flight checks before expensive operations.
//!
//! Validates that credentials and output locations are available before
//! starting a run that would otherwise fail midway.

use crate::config::Settings;
use crate::error::{KursError, Result};

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Structuring writes a document, so it needs the API key and a docs folder.
    Process,
    /// Questions over a saved document only need the API key.
    Chat,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    check_api_key()?;
    match operation {
        Operation::Process => check_docs_dir(settings),
        Operation::Chat => Ok(()),
    }
}

/// Check if OpenAI API key is configured.
fn check_api_key() -> Result<()> {
    match std::env::var("OPENAI_API_KEY") {
        Ok(key) if !key.trim().is_empty() => Ok(()),
        Ok(_) => Err(KursError::Config(
            "OPENAI_API_KEY is empty. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
        Err(_) => Err(KursError::Config(
            "OPENAI_API_KEY not set. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
    }
}

/// Make sure documents can be written before paying for a transcription.
fn check_docs_dir(settings: &Settings) -> Result<()> {
    let dir = settings.docs_dir();
    std::fs::create_dir_all(&dir).map_err(|e| {
        KursError::Config(format!("cannot create docs folder {}: {}", dir.display(), e))
    })
}
