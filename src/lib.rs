//! Kurs - training documents from recorded walkthroughs
//!
//! Turns a subject-matter expert's recorded walkthrough into a structured
//! training document and answers questions about it.
//!
//! "Kurs" is the Norwegian word for "course."
//!
//! # Overview
//!
//! A run moves through fixed stages, each finishing before the next starts:
//!
//! 1. Transcribe a recording (`transcription`)
//! 2. Reshape the transcript into a validated training document (`structuring`)
//! 3. Save the document as timestamped JSON (`persist`)
//! 4. Split it into overlapping chunks (`chunking`), embed them (`embedding`),
//!    and build an in-memory similarity index (`index`)
//! 5. Answer questions grounded on retrieved chunks (`rag`) in an interactive
//!    loop (`session`)
//!
//! Errors in stages 1 to 4 abort the run. A failed question is reported and
//! the session keeps going.
//!
//! # Architecture
//!
//! - `config` - Settings and prompt templates
//! - `openai` - Shared HTTP client construction
//! - `retry` - Optional backoff for transient failures
//! - `llm` - Generative model boundary
//! - `orchestrator` - Pipeline coordination
//! - `inputs` - Recording discovery in the inputs folder
//!
//! # Example
//!
//! ```rust,no_run
//! use kurs::config::Settings;
//! use kurs::orchestrator::Orchestrator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let orchestrator = Orchestrator::new(settings)?;
//!
//!     let prepared = orchestrator
//!         .process_recording(std::path::Path::new("inputs/walkthrough.mp3"))
//!         .await?;
//!     println!("Saved {}", prepared.path.display());
//!
//!     let engine = orchestrator.rag_engine(prepared.index)?;
//!     let response = engine.answer("What is the first step?").await?;
//!     println!("{}", response.format_for_display());
//!
//!     Ok(())
//! }
//! ```

pub mod chunking;
pub mod cli;
pub mod config;
pub mod embedding;
pub mod error;
pub mod index;
pub mod inputs;
pub mod llm;
pub mod openai;
pub mod orchestrator;
pub mod persist;
pub mod rag;
pub mod retry;
pub mod session;
pub mod structuring;
pub mod transcription;

#[cfg(test)]
mod test_support;

pub use error::{KursError, QueryError, QueryStage, Result};
