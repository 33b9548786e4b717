//! Question session over a saved structured document.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::index::VectorIndex;
use crate::orchestrator::Orchestrator;
use crate::session::Session;
use anyhow::Result;
use console::style;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, BufReader};

/// Run the chat command.
pub async fn run_chat(doc_path: &str, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Chat, &settings) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let path = Settings::expand_path(doc_path);
    let orchestrator = Orchestrator::new(settings)?;

    let spinner = Output::spinner("Indexing document...");
    let prepared = orchestrator.open_document(&path).await;
    spinner.finish_and_clear();
    let prepared = prepared.inspect_err(|e| Output::error(&format!("{}", e)))?;

    Output::success(&format!(
        "Loaded '{}' ({} chunks)",
        prepared.document.document().title,
        prepared.index.len()
    ));

    start_session(&orchestrator, prepared.index, BufReader::new(tokio::io::stdin())).await
}

/// Answer questions from `input` until the operator exits.
pub(crate) async fn start_session<R>(
    orchestrator: &Orchestrator,
    index: Arc<VectorIndex>,
    input: R,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let engine = orchestrator.rag_engine(index)?;
    let mut session = Session::new(Arc::new(engine));

    println!("\n{}", style("Ask about the document").bold().cyan());
    println!(
        "{}\n",
        style("Type your questions, or 'exit' to quit. Ctrl-C stops a slow answer.").dim()
    );

    let summary = session.run(input, &mut std::io::stdout()).await?;

    if summary.failed > 0 {
        Output::warning(&format!(
            "{} of {} questions failed",
            summary.failed, summary.questions
        ));
    }
    Ok(())
}
