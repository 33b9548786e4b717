//! Configuration module for Kurs.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{Prompts, RagPrompts, StructuringPrompts};
pub use settings::{
    ChunkingSettings, EmbeddingSettings, GeneralSettings, NetworkSettings, PromptSettings,
    RagSettings, Settings, StructuringSettings, TranscriptionSettings,
};
