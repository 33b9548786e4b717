//! Full pipeline command: recording to question session.

use super::chat::start_session;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::inputs;
use crate::orchestrator::Orchestrator;
use anyhow::{bail, Result};
use console::style;
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

/// Run the full pipeline for one recording.
pub async fn run_process(file: Option<String>, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Process, &settings) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let mut stdin = BufReader::new(tokio::io::stdin());

    let audio_path = match file {
        Some(path) => Settings::expand_path(&path),
        None => choose_recording(&settings.inputs_dir(), &mut stdin).await?,
    };
    Output::info(&format!("Processing: {}", audio_path.display()));

    let orchestrator = Orchestrator::new(settings)?;

    let spinner = Output::spinner("Transcribing...");
    let transcript = orchestrator.transcribe(&audio_path).await;
    spinner.finish_and_clear();
    let transcript = transcript.inspect_err(|e| Output::error(&format!("{}", e)))?;
    Output::success(&format!("Transcribed {} characters", transcript.len()));

    let spinner = Output::spinner("Generating structured training document...");
    let document = orchestrator.structure(&transcript).await;
    spinner.finish_and_clear();
    let document = document.inspect_err(|e| Output::error(&format!("{}", e)))?;
    Output::document_preview(document.document());

    let path = orchestrator.save(&document)?;
    Output::success(&format!("Structured document saved to: {}", path.display()));

    let spinner = Output::spinner("Creating embeddings and index...");
    let index = orchestrator.index_document(&document).await;
    spinner.finish_and_clear();
    let index = index.inspect_err(|e| Output::error(&format!("{}", e)))?;
    Output::success(&format!("Indexed {} chunks", index.len()));

    start_session(&orchestrator, index, stdin).await
}

/// List the inputs folder and read a 1-based choice.
async fn choose_recording<R>(dir: &std::path::Path, input: &mut R) -> Result<PathBuf>
where
    R: AsyncBufRead + Unpin,
{
    let files = inputs::list_media(dir)?;
    if files.is_empty() {
        bail!("No recordings found in {}", dir.display());
    }

    Output::header(&format!("Recordings in {}", dir.display()));
    for (i, file) in files.iter().enumerate() {
        let name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        println!("  {}. {}", i + 1, name);
    }

    print!("\n{} ", style("Select a file number:").bold());
    std::io::stdout().flush()?;

    let mut choice = String::new();
    input.read_line(&mut choice).await?;

    Ok(inputs::select(&files, &choice)?.to_path_buf())
}
