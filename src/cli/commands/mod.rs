//! CLI command implementations.

mod chat;
mod config;
mod run;
mod structure;

pub use chat::run_chat;
pub use config::run_config;
pub use run::run_process;
pub use structure::run_structure;
