//! CLI output formatting utilities.

use crate::structuring::TrainingDocument;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Output helper for CLI formatting.
pub struct Output;

impl Output {
    /// Print an info message.
    pub fn info(msg: &str) {
        println!("{} {}", style(">>").cyan().bold(), msg);
    }

    /// Print a success message.
    pub fn success(msg: &str) {
        println!("{} {}", style(">>").green().bold(), msg);
    }

    /// Print a warning message.
    pub fn warning(msg: &str) {
        eprintln!("{} {}", style(">>").yellow().bold(), msg);
    }

    /// Print an error message.
    pub fn error(msg: &str) {
        eprintln!("{} {}", style(">>").red().bold(), msg);
    }

    /// Print a header.
    pub fn header(msg: &str) {
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print a key-value pair.
    pub fn kv(key: &str, value: &str) {
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a list item.
    pub fn list_item(msg: &str) {
        println!("  {} {}", style("*").cyan(), msg);
    }

    /// Print a short overview of a structured document.
    pub fn document_preview(doc: &TrainingDocument) {
        Output::header(&doc.title);
        if !doc.objective.is_empty() {
            Output::kv("Objective", &doc.objective);
        }
        if !doc.target_audience.is_empty() {
            Output::kv("Audience", &doc.target_audience);
        }
        if !doc.tools_mentioned.is_empty() {
            Output::kv("Tools", &doc.tools_mentioned.join(", "));
        }
        Output::kv("Steps", &doc.step_by_step_instructions.len().to_string());
        for step in &doc.step_by_step_instructions {
            Output::list_item(&format!(
                "{}. {}",
                step.step_number,
                content_preview(&step.instruction, 80)
            ));
        }
        println!();
    }

    /// Create a spinner.
    pub fn spinner(msg: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}")
        {
            pb.set_style(spinner_style);
        }
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }
}

/// Collapse newlines and truncate with ellipsis, on a character boundary.
fn content_preview(content: &str, max_chars: usize) -> String {
    let content = content.replace('\n', " ");
    if content.chars().count() <= max_chars {
        content
    } else {
        let cut: String = content.chars().take(max_chars).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_preview_short_text_unchanged() {
        assert_eq!(content_preview("Open the\nconsole", 80), "Open the console");
    }

    #[test]
    fn test_content_preview_respects_char_boundaries() {
        let text = "Åpne konsollen og søk etter brukeren";
        let preview = content_preview(text, 5);
        assert_eq!(preview, "Åpne ...");
    }
}
