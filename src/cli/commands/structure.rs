//! Structure an existing transcript without a question session.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use crate::transcription::Transcript;
use anyhow::{Context, Result};

/// Run the structure command.
pub async fn run_structure(transcript_path: &str, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Process, &settings) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let path = Settings::expand_path(transcript_path);
    let transcript = Transcript::from_file(&path)
        .with_context(|| format!("Failed to read transcript {}", path.display()))?;

    let orchestrator = Orchestrator::new(settings)?;

    let spinner = Output::spinner("Generating structured training document...");
    let document = orchestrator.structure(&transcript).await;
    spinner.finish_and_clear();
    let document = document.inspect_err(|e| Output::error(&format!("{}", e)))?;

    Output::document_preview(document.document());

    let saved = orchestrator.save(&document)?;
    Output::success(&format!("Structured document saved to: {}", saved.display()));

    Ok(())
}
