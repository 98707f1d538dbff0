//! CLI output formatting utilities.

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

    /// Print a knowledge base line.
    pub fn kb_info(name: &str, id: &str, file_count: usize) {
        println!(
            "\n{} {} ({}, {} file{})",
            style(">>").green(),
            style(name).bold(),
            style(id).dim(),
            file_count,
            if file_count == 1 { "" } else { "s" }
        );
    }

    /// Print a file line under a knowledge base.
    pub fn file_item(name: &str, id: &str) {
        println!("    {} {} {}", style("-").cyan(), name, style(id).dim());
    }

    /// Print a voice line.
    pub fn voice_info(name: &str, id: &str, category: Option<&str>) {
        match category {
            Some(c) => println!(
                "  {} {} {} [{}]",
                style("*").cyan(),
                style(name).bold(),
                style(id).dim(),
                c
            ),
            None => println!("  {} {} {}", style("*").cyan(), style(name).bold(), style(id).dim()),
        }
    }

    /// Print an answer with a short preview line.
    pub fn answer_preview(file_name: &str, answer: &str) {
        println!(
            "\n{} {}\n   {}",
            style(">>").green(),
            style(file_name).bold(),
            content_preview(answer, 200)
        );
    }

    /// Create a progress bar.
    pub fn progress_bar(len: u64, msg: &str) -> ProgressBar {
        let pb = ProgressBar::new(len);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("#>-"),
        );
        pb.set_message(msg.to_string());
        pb
    }

    /// Create a spinner.
    pub fn spinner(msg: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap(),
        );
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }
}

/// Truncate content with ellipsis, on a character boundary.
fn content_preview(content: &str, max_chars: usize) -> String {
    let content = content.replace('\n', " ");
    if content.chars().count() <= max_chars {
        content
    } else {
        let cut: String = content.chars().take(max_chars).collect();
        format!("{}...", cut)
    }
}
