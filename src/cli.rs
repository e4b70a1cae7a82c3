//! Command-line interface module for sortdir.
//!
//! This module handles all CLI-related functionality including:
//! - Argument parsing and validation
//! - Rule-table loading
//! - Sort orchestration and Ctrl-C wiring
//! - Dry-run preview
//! - Summary rendering

use crate::config::load_rules;
use crate::engine::{Decision, SortEngine};
use crate::output::{ConsoleSink, OutputFormatter};
use crate::rules::RuleTable;
use clap::{Parser, ValueHint};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(
    version,
    about = "Sort the files of a directory into category subdirectories by extension"
)]
pub struct Args {
    /// Directory whose direct children should be sorted. Subdirectories
    /// are never entered.
    #[arg(value_name = "DIRECTORY", value_hint = ValueHint::DirPath)]
    pub directory: PathBuf,

    /// Path to a TOML rule-table file replacing the built-in categories.
    #[arg(long, short = 'c', value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Show what would be moved without touching the filesystem.
    #[arg(long)]
    pub dry_run: bool,

    /// Print the active rule table and exit.
    #[arg(long)]
    pub list_rules: bool,
}

/// Runs the CLI application with the given arguments.
///
/// This is the main entry point for CLI operations. The returned error
/// string is already formatted for the user; `main` prints it and exits
/// non-zero.
pub fn run(args: &Args) -> Result<(), String> {
    let rules =
        load_rules(args.config.as_deref()).map_err(|e| format!("Configuration error: {}", e))?;

    if args.list_rules {
        print_rules(&rules);
        return Ok(());
    }

    if args.dry_run {
        dry_run(&args.directory, &rules)
    } else {
        sort_directory(&args.directory, rules)
    }
}

/// Sorts a directory and renders events, summary table, and counts.
fn sort_directory(directory: &Path, rules: RuleTable) -> Result<(), String> {
    OutputFormatter::info(&format!("Sorting contents of: {}", directory.display()));

    let cancel = Arc::new(AtomicBool::new(false));
    let handler_flag = Arc::clone(&cancel);
    if ctrlc::set_handler(move || handler_flag.store(true, Ordering::Relaxed)).is_err() {
        OutputFormatter::warning("Could not install Ctrl-C handler; cancellation disabled.");
    }

    // Pre-count children so the progress bar has a length. The engine
    // re-enumerates; a mismatch under concurrent external writes only
    // affects the bar, not the result.
    let total = fs::read_dir(directory).map(|it| it.count()).unwrap_or(0);
    let mut sink = ConsoleSink::with_progress(total as u64);

    let engine = SortEngine::new(rules).with_cancel_flag(cancel);
    let outcome = engine
        .sort(directory, &mut sink)
        .map_err(|e| format!("Error: {}", e))?;
    sink.finish();

    let mut category_counts: BTreeMap<String, usize> = BTreeMap::new();
    for decision in &outcome.decisions {
        if let Decision::Moved { category, .. } = decision {
            *category_counts.entry(category.clone()).or_insert(0) += 1;
        }
    }

    if !category_counts.is_empty() {
        OutputFormatter::summary_table(&category_counts, outcome.moved);
    }

    OutputFormatter::plain(&format!(
        "\n{} file(s) moved, {} item(s) skipped.",
        outcome.moved, outcome.skipped
    ));

    if outcome.cancelled {
        OutputFormatter::warning("Sort cancelled; results above are partial.");
    }
    if outcome.had_failures() {
        OutputFormatter::warning("Some items could not be moved. Review the messages above.");
    } else if outcome.moved == 0 && outcome.skipped == 0 {
        OutputFormatter::plain("Nothing to sort.");
    }

    Ok(())
}

/// Previews the classification without moving anything.
///
/// Enumerates and classifies exactly like a real run would, but performs
/// no filesystem mutation at all — no category directories are created.
fn dry_run(directory: &Path, rules: &RuleTable) -> Result<(), String> {
    if !directory.is_dir() {
        return Err(format!(
            "Error: Directory {} not found or is not a directory",
            directory.display()
        ));
    }

    OutputFormatter::info(&format!(
        "DRY RUN: Analyzing contents of: {}",
        directory.display()
    ));

    let entries = fs::read_dir(directory)
        .map_err(|e| format!("Error reading directory {}: {}", directory.display(), e))?;

    let mut category_counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut planned = 0usize;
    let mut skipped = 0usize;

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(_) => {
                OutputFormatter::plain(" - <unreadable entry> (skipped)");
                skipped += 1;
                continue;
            }
        };
        let name = entry.file_name().to_string_lossy().to_string();
        let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);

        if !is_file {
            OutputFormatter::plain(&format!(" - {} (skipped)", name));
            skipped += 1;
            continue;
        }

        match entry.path().extension() {
            Some(ext) if !ext.is_empty() => {
                let category = rules.classify(&format!(".{}", ext.to_string_lossy()));
                OutputFormatter::plain(&format!(" - {} → {}/", name, category));
                *category_counts.entry(category.to_string()).or_insert(0) += 1;
                planned += 1;
            }
            _ => {
                OutputFormatter::plain(&format!(" - {} (no extension, stays)", name));
                skipped += 1;
            }
        }
    }

    if planned == 0 && skipped == 0 {
        OutputFormatter::plain("No files found to sort.");
        return Ok(());
    }

    OutputFormatter::summary_table(&category_counts, planned);
    OutputFormatter::plain(&format!(
        "\n{} file(s) would be moved, {} item(s) would be skipped.",
        planned, skipped
    ));
    OutputFormatter::dry_run_notice("No files were modified.");

    Ok(())
}

/// Prints the active rule table, one category per line.
fn print_rules(rules: &RuleTable) {
    OutputFormatter::header("RULES");
    for category in rules.categories() {
        OutputFormatter::plain(&format!(
            "{}: {}",
            category.name(),
            category.extensions().join(" ")
        ));
    }
}
