//! Structuring of raw transcripts into schema-conformant training documents.

mod engine;
mod schema;

pub use engine::StructuringEngine;
pub use schema::{Step, StructuredDocument, TrainingDocument};
