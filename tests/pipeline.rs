//! End-to-end flow with in-process fakes for every external service.

use async_trait::async_trait;
use kurs::config::{Prompts, Settings};
use kurs::embedding::{Embedder, EmbeddingSpace};
use kurs::llm::{Generation, GenerationRequest, Generator};
use kurs::orchestrator::Orchestrator;
use kurs::session::{Session, SessionState};
use kurs::transcription::{Transcriber, Transcript};
use kurs::{KursError, QueryStage, Result};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::io::BufReader;

const TRANSCRIPT: &str = "Welcome to the onboarding session. Today we cover password resets.";

const DOCUMENT: &str = r#"Here is the document:
```json
{
  "Title": "Onboarding: Password Resets",
  "Objective": "Reset a user's password safely",
  "TargetAudience": "New support staff",
  "KeyConcepts": ["Identity verification"],
  "ToolsMentioned": ["Admin console"],
  "StepByStepInstructions": [
    {"StepNumber": 1, "Instruction": "Verify the caller's identity", "Purpose": "Stop account takeover", "Example": "Ask for the employee ID"},
    {"StepNumber": 2, "Instruction": "Reset the password in the admin console", "Purpose": "Restore access", "Example": "Use a temporary password"}
  ],
  "ImportantNotes": "Log every reset."
}
```"#;

struct FixedTranscriber;

#[async_trait]
impl Transcriber for FixedTranscriber {
    async fn transcribe(&self, _audio_path: &Path) -> Result<Transcript> {
        Transcript::new(TRANSCRIPT)
    }
}

/// Returns the document for structuring prompts and a fixed answer otherwise.
/// Questions mentioning "outage" fail.
struct FakeModel {
    answers: AtomicUsize,
}

#[async_trait]
impl Generator for FakeModel {
    async fn generate(&self, request: &GenerationRequest) -> Result<Generation> {
        if request.prompt.starts_with("Transcript:") {
            assert_eq!(request.temperature, 0.0);
            return Ok(Generation {
                text: DOCUMENT.to_string(),
                truncated: false,
            });
        }
        if request.prompt.contains("outage") {
            return Err(KursError::OpenAI("service unavailable".to_string()));
        }
        self.answers.fetch_add(1, Ordering::SeqCst);
        Ok(Generation {
            text: "Start by verifying the caller's identity.".to_string(),
            truncated: false,
        })
    }

    fn model(&self) -> &str {
        "fake"
    }
}

/// Letter-frequency embedder; deterministic and dimension-stable.
struct LetterEmbedder;

#[async_trait]
impl Embedder for LetterEmbedder {
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts
            .iter()
            .map(|text| {
                let mut v = vec![0.0; 26];
                for c in text.to_ascii_lowercase().chars().filter(char::is_ascii_lowercase) {
                    v[(c as u8 - b'a') as usize] += 1.0;
                }
                v
            })
            .collect())
    }

    fn space(&self) -> EmbeddingSpace {
        EmbeddingSpace {
            model: "letters".to_string(),
            dimensions: 26,
        }
    }
}

fn orchestrator(docs_dir: &Path, model: Arc<FakeModel>) -> Orchestrator {
    let mut settings = Settings::default();
    settings.general.docs_dir = docs_dir.to_string_lossy().into_owned();
    settings.chunking.chunk_size = 120;
    settings.chunking.chunk_overlap = 20;

    Orchestrator::with_components(
        settings,
        Prompts::default(),
        Arc::new(FixedTranscriber),
        model.clone(),
        model,
        Arc::new(LetterEmbedder),
    )
    .unwrap()
}

#[tokio::test]
async fn test_recording_to_session() {
    let dir = tempfile::tempdir().unwrap();
    let docs = dir.path().join("docs");
    let model = Arc::new(FakeModel {
        answers: AtomicUsize::new(0),
    });
    let orchestrator = orchestrator(&docs, model.clone());

    let prepared = orchestrator
        .process_recording(Path::new("inputs/onboarding.mp3"))
        .await
        .unwrap();

    let doc = prepared.document.document();
    assert_eq!(doc.title, "Onboarding: Password Resets");
    assert!(!doc.step_by_step_instructions.is_empty());

    let file_name = prepared.path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(file_name.starts_with("structured_doc_"));
    assert!(file_name.ends_with(".json"));
    let saved = std::fs::read_to_string(&prepared.path).unwrap();
    assert_eq!(saved, prepared.document.text());

    let engine = orchestrator.rag_engine(prepared.index.clone()).unwrap();
    let mut session = Session::new(Arc::new(engine));
    let input = "What comes first?\n\nIs there an outage?\nHow do I reset it?\nexit\nnever asked\n";
    let mut out = Vec::new();
    let summary = session
        .run(BufReader::new(input.as_bytes()), &mut out)
        .await
        .unwrap();

    assert_eq!(session.state(), SessionState::Terminated);
    assert_eq!(summary.questions, 3);
    assert_eq!(summary.answered, 2);
    assert_eq!(summary.failed, 1);
    assert_eq!(model.answers.load(Ordering::SeqCst), 2);

    let out = String::from_utf8(out).unwrap();
    assert!(out.contains("Start by verifying the caller's identity."));
    assert!(out.contains("service unavailable"));
}

#[tokio::test]
async fn test_failed_question_reports_generation_stage() {
    let dir = tempfile::tempdir().unwrap();
    let orchestrator = orchestrator(
        dir.path(),
        Arc::new(FakeModel {
            answers: AtomicUsize::new(0),
        }),
    );
    let transcript = Transcript::new(TRANSCRIPT).unwrap();
    let prepared = orchestrator.process_transcript(&transcript).await.unwrap();

    let engine = orchestrator.rag_engine(prepared.index).unwrap();
    let err = engine.answer("Was there an outage?").await.unwrap_err();
    assert_eq!(err.stage, QueryStage::Generation);

    let retrieval = engine.answer_with_k("Was the reset logged?", 0).await.unwrap_err();
    assert_eq!(retrieval.stage, QueryStage::Retrieval);
}

#[tokio::test]
async fn test_saved_document_can_be_reopened() {
    let dir = tempfile::tempdir().unwrap();
    let model = Arc::new(FakeModel {
        answers: AtomicUsize::new(0),
    });
    let orchestrator = orchestrator(dir.path(), model);
    let transcript = Transcript::new(TRANSCRIPT).unwrap();
    let first = orchestrator.process_transcript(&transcript).await.unwrap();

    let reopened = orchestrator.open_document(&first.path).await.unwrap();
    assert_eq!(reopened.document.document(), first.document.document());
    assert_eq!(reopened.index.len(), first.index.len());
}
