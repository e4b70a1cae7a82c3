//! Output formatting and styling module.
//!
//! Provides a centralized interface for all CLI output, including colored
//! status lines, a progress bar for the move loop, and the summary table.
//! The console [`EventSink`] implementation that renders engine events
//! also lives here, keeping presentation concerns out of the engine.

use crate::engine::{EventSink, Severity, SortEvent};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeMap;

/// Manages all CLI output with consistent styling and formatting.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints a regular message without styling.
    pub fn plain(message: &str) {
        println!("{}", message);
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Creates and returns a progress bar for file operations.
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .expect("Invalid progress bar template")
                .progress_chars("█▓░"),
        );
        pb
    }

    /// Prints a summary table of per-category file counts.
    ///
    /// # Arguments
    ///
    /// * `category_counts` - Map of category names to file counts
    /// * `total_files` - Total number of files moved
    pub fn summary_table(category_counts: &BTreeMap<String, usize>, total_files: usize) {
        Self::header("SUMMARY");

        // Calculate column widths
        let max_category_len = category_counts
            .keys()
            .map(|name| name.len())
            .max()
            .unwrap_or(0)
            .max(8); // At least "Category" width

        println!(
            "{:<width$} | {}",
            "Category".bold(),
            "Files".bold(),
            width = max_category_len
        );
        println!("{}", "-".repeat(max_category_len + 10));

        for (category, count) in category_counts {
            let file_word = if *count == 1 { "file" } else { "files" };
            println!(
                "{:<width$} | {} {}",
                category,
                count.to_string().green(),
                file_word,
                width = max_category_len
            );
        }

        println!("{}", "-".repeat(max_category_len + 10));
        println!(
            "{:<width$} | {} {}",
            "Total".bold(),
            total_files.to_string().green().bold(),
            if total_files == 1 { "file" } else { "files" },
            width = max_category_len
        );
    }

    /// Prints a dry-run notice message.
    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }
}

/// Event sink that renders engine events on the console.
///
/// With a progress bar attached, event lines are printed above the bar so
/// the bar stays at the bottom of the terminal.
pub struct ConsoleSink {
    progress: Option<ProgressBar>,
}

impl ConsoleSink {
    /// Creates a sink that prints plain lines.
    pub fn new() -> Self {
        Self { progress: None }
    }

    /// Creates a sink that also drives a progress bar over `total` items.
    pub fn with_progress(total: u64) -> Self {
        Self {
            progress: Some(OutputFormatter::create_progress_bar(total)),
        }
    }

    /// Finishes and clears the progress bar, if any.
    pub fn finish(&mut self) {
        if let Some(pb) = self.progress.take() {
            pb.finish_and_clear();
        }
    }

    fn render(event: &SortEvent) -> String {
        let stamp = event.timestamp.format("%H:%M:%S");
        match event.severity {
            Severity::Info => format!("{} {} {}", stamp, "✓".green(), event.message),
            Severity::Warning => format!("{} {} {}", stamp, "⚠".yellow(), event.message),
            Severity::Error => format!("{} {} {}", stamp, "✗".red(), event.message),
        }
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for ConsoleSink {
    fn emit(&mut self, event: &SortEvent) {
        let line = Self::render(event);
        match &self.progress {
            Some(pb) => {
                pb.println(line);
                pb.inc(1);
            }
            None => println!("{}", line),
        }
    }
}
