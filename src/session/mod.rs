//! Interactive question loop over an indexed document.
//!
//! The loop moves `Idle -> AwaitingQuestion -> Answering -> AwaitingQuestion`
//! until an exit token, end of input, or cancellation moves it to
//! `Terminated`. A failed question is reported and the loop keeps going.

use crate::error::{QueryError, Result};
use crate::rag::{RagEngine, RagResponse};
use async_trait::async_trait;
use console::style;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Inputs that end the session, compared case-insensitively.
const EXIT_TOKENS: [&str; 2] = ["exit", "quit"];

/// Anything that can answer a single question.
#[async_trait]
pub trait Answerer: Send + Sync {
    async fn answer(&self, question: &str) -> std::result::Result<RagResponse, QueryError>;
}

#[async_trait]
impl Answerer for RagEngine {
    async fn answer(&self, question: &str) -> std::result::Result<RagResponse, QueryError> {
        RagEngine::answer(self, question).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    AwaitingQuestion,
    Answering,
    Terminated,
}

/// Counters reported when a session ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub questions: usize,
    pub answered: usize,
    pub failed: usize,
    /// Answers abandoned by Ctrl-C or cancellation.
    pub abandoned: usize,
}

enum Outcome {
    Done(std::result::Result<RagResponse, QueryError>),
    Interrupted,
    Cancelled,
}

/// Whether `input` is a recognized exit token.
pub fn is_exit_token(input: &str) -> bool {
    let input = input.trim();
    EXIT_TOKENS.iter().any(|t| input.eq_ignore_ascii_case(t))
}

pub struct Session {
    id: Uuid,
    answerer: Arc<dyn Answerer>,
    state: SessionState,
    cancel: CancellationToken,
}

impl Session {
    pub fn new(answerer: Arc<dyn Answerer>) -> Self {
        Self {
            id: Uuid::new_v4(),
            answerer,
            state: SessionState::Idle,
            cancel: CancellationToken::new(),
        }
    }

    /// Use an externally owned cancellation token.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Token that terminates the session when cancelled.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Read questions from `input` and write answers to `out` until terminated.
    ///
    /// Ctrl-C while answering abandons that answer only; at the prompt it
    /// ends the session.
    #[instrument(skip_all, fields(session = %self.id))]
    pub async fn run<R, W>(&mut self, input: R, out: &mut W) -> Result<SessionSummary>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let mut lines = input.lines();
        let mut summary = SessionSummary::default();
        self.state = SessionState::AwaitingQuestion;
        info!("Session started");

        while self.state != SessionState::Terminated {
            write!(out, "{} ", style("Question:").green().bold())?;
            out.flush()?;

            let line = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => None,
                Ok(()) = tokio::signal::ctrl_c() => None,
                line = lines.next_line() => line?,
            };

            let Some(line) = line else {
                writeln!(out)?;
                self.state = SessionState::Terminated;
                break;
            };

            let question = line.trim();
            if question.is_empty() {
                continue;
            }
            if is_exit_token(question) {
                writeln!(out, "Goodbye!")?;
                self.state = SessionState::Terminated;
                break;
            }

            self.state = SessionState::Answering;
            summary.questions += 1;

            let outcome = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => Outcome::Cancelled,
                Ok(()) = tokio::signal::ctrl_c() => Outcome::Interrupted,
                result = self.answerer.answer(question) => Outcome::Done(result),
            };

            self.state = SessionState::AwaitingQuestion;
            match outcome {
                Outcome::Done(Ok(response)) => {
                    summary.answered += 1;
                    writeln!(out, "\n{}\n", response.format_for_display())?;
                }
                Outcome::Done(Err(e)) => {
                    summary.failed += 1;
                    warn!(stage = %e.stage, "Question failed: {}", e);
                    writeln!(out, "{} {}\n", style("Error:").red().bold(), e)?;
                }
                Outcome::Interrupted => {
                    summary.abandoned += 1;
                    writeln!(out, "\n(answer abandoned)\n")?;
                }
                Outcome::Cancelled => {
                    summary.abandoned += 1;
                    writeln!(out)?;
                    self.state = SessionState::Terminated;
                }
            }
        }

        info!(
            questions = summary.questions,
            failed = summary.failed,
            "Session ended"
        );
        Ok(summary)
    }
}
