//! RAG (Retrieval-Augmented Generation) over a structured document.
//!
//! Embeds a question, retrieves the closest chunks from the
//! [`VectorIndex`](crate::index::VectorIndex) and asks a generative model to
//! answer from that context only.

pub mod context;
mod engine;

pub use context::{build_context, GroundingContext};
pub use engine::{RagEngine, RagResponse};
