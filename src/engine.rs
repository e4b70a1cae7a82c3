//! Directory sorting engine.
//!
//! This module walks the direct children of a target directory, classifies
//! each file by extension through an injected [`RuleTable`], and delegates
//! the actual relocation to [`SafeMover`]. Per-item outcomes are reported
//! both in the returned [`SortOutcome`] and as structured events on an
//! injected [`EventSink`], so callers can render them however they like.
//!
//! The engine never recurses into subdirectories and never aborts a run
//! because one file failed to move.

use crate::mover::SafeMover;
use crate::rules::RuleTable;
use chrono::{DateTime, Local};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Severity of a sort event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// The per-item verdict reached for one directory entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// The file was moved into its category directory. `final_path`
    /// includes any ` (N)` disambiguation suffix.
    Moved {
        name: String,
        category: String,
        final_path: PathBuf,
    },
    /// The entry is a directory; subdirectories are never entered.
    SkippedDirectory { name: String },
    /// The file has no extension and stays exactly where it is.
    SkippedNoExtension { name: String },
    /// The entry is neither a regular file nor a directory.
    SkippedUnknownType { name: String },
    /// The move was attempted but failed; `reason` carries the cause.
    MoveFailed {
        name: String,
        category: String,
        reason: String,
    },
}

impl Decision {
    /// Severity used when this decision is emitted as an event.
    pub fn severity(&self) -> Severity {
        match self {
            Self::Moved { .. } => Severity::Info,
            Self::SkippedDirectory { .. }
            | Self::SkippedNoExtension { .. }
            | Self::SkippedUnknownType { .. } => Severity::Warning,
            Self::MoveFailed { .. } => Severity::Error,
        }
    }

    /// Human-readable one-line description of this decision.
    pub fn describe(&self) -> String {
        match self {
            Self::Moved {
                name,
                category,
                final_path,
            } => format!(
                "Moved '{}' to {}/ ({})",
                name,
                category,
                final_path.display()
            ),
            Self::SkippedDirectory { name } => format!("Skipped directory '{}'", name),
            Self::SkippedNoExtension { name } => {
                format!("Skipped '{}': no file extension", name)
            }
            Self::SkippedUnknownType { name } => {
                format!("Skipped '{}': unknown item type", name)
            }
            Self::MoveFailed {
                name,
                category,
                reason,
            } => format!("Failed to move '{}' to {}/: {}", name, category, reason),
        }
    }
}

/// One structured record emitted to the event sink per decision.
#[derive(Debug, Clone)]
pub struct SortEvent {
    /// When the decision was made.
    pub timestamp: DateTime<Local>,
    pub severity: Severity,
    /// Rendered message identifying the item and its fate.
    pub message: String,
    pub decision: Decision,
}

/// Receiver for per-item events during a sort run.
///
/// Implementations decide how events are rendered (console, log file,
/// test buffer). The engine calls `emit` once per directory entry, in
/// encountered order.
pub trait EventSink {
    fn emit(&mut self, event: &SortEvent);
}

/// An event sink that discards everything.
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: &SortEvent) {}
}

/// Aggregate result of one sort run.
#[derive(Debug)]
pub struct SortOutcome {
    /// Number of files relocated into a category directory.
    pub moved: usize,
    /// Number of entries left in place (directories, extension-less
    /// files, unknown item types, and failed moves).
    pub skipped: usize,
    /// Per-item decisions in encountered order.
    pub decisions: Vec<Decision>,
    /// True when the run stopped early because the cancel flag was set.
    /// Files already moved stay moved.
    pub cancelled: bool,
}

impl SortOutcome {
    fn new() -> Self {
        Self {
            moved: 0,
            skipped: 0,
            decisions: Vec::new(),
            cancelled: false,
        }
    }

    /// Returns true if any per-item move failed during the run.
    pub fn had_failures(&self) -> bool {
        self.decisions
            .iter()
            .any(|d| matches!(d, Decision::MoveFailed { .. }))
    }
}

/// Errors that are fatal to a whole sort run.
#[derive(Debug)]
pub enum SortError {
    /// The target path does not exist or is not a directory. Nothing was
    /// mutated.
    DirectoryNotFound { path: PathBuf },
    /// The target directory could not be enumerated.
    ReadDirFailed { path: PathBuf, source: io::Error },
}

impl std::fmt::Display for SortError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DirectoryNotFound { path } => {
                write!(
                    f,
                    "Directory {} not found or is not a directory",
                    path.display()
                )
            }
            Self::ReadDirFailed { path, source } => {
                write!(f, "Failed to read directory {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for SortError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::DirectoryNotFound { .. } => None,
            Self::ReadDirFailed { source, .. } => Some(source),
        }
    }
}

/// Sorts the direct children of a directory into category subdirectories.
///
/// The rule table is supplied at construction and is immutable for the
/// engine's lifetime, so tests can run the engine over custom tables.
///
/// # Examples
///
/// ```no_run
/// use sortdir::engine::{NullSink, SortEngine};
/// use sortdir::rules::RuleTable;
/// use std::path::Path;
///
/// let engine = SortEngine::new(RuleTable::default());
/// let outcome = engine
///     .sort(Path::new("/home/user/Downloads"), &mut NullSink)
///     .expect("directory exists");
/// println!("{} moved, {} skipped", outcome.moved, outcome.skipped);
/// ```
pub struct SortEngine {
    rules: RuleTable,
    cancel: Option<Arc<AtomicBool>>,
}

impl SortEngine {
    /// Creates an engine over the given rule table.
    pub fn new(rules: RuleTable) -> Self {
        Self {
            rules,
            cancel: None,
        }
    }

    /// Attaches a cooperative cancel flag.
    ///
    /// The flag is checked between entries; setting it stops the run
    /// before the next entry is examined, never mid-move.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Returns the rule table this engine classifies with.
    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    /// Sorts the direct children of `directory`.
    ///
    /// Fails fast with [`SortError::DirectoryNotFound`] when `directory`
    /// does not exist or is not a directory; in that case nothing is
    /// mutated. Per-item failures never abort the run: they are recorded
    /// as skips and the engine continues with the next entry.
    ///
    /// One event is emitted per enumerated entry, in encountered order
    /// (the filesystem's order, which is not stable across platforms).
    /// On return, `moved + skipped` equals the number of entries
    /// enumerated before completion or cancellation.
    pub fn sort(
        &self,
        directory: &Path,
        sink: &mut dyn EventSink,
    ) -> Result<SortOutcome, SortError> {
        if !directory.is_dir() {
            return Err(SortError::DirectoryNotFound {
                path: directory.to_path_buf(),
            });
        }

        let entries = fs::read_dir(directory).map_err(|e| SortError::ReadDirFailed {
            path: directory.to_path_buf(),
            source: e,
        })?;

        // Snapshot the listing before moving anything: decide() creates
        // category directories inside `directory`, and a live read_dir
        // stream could observe them as extra children mid-run.
        let snapshot: Vec<io::Result<fs::DirEntry>> = entries.collect();

        let mut outcome = SortOutcome::new();

        for entry in snapshot {
            if self.is_cancelled() {
                outcome.cancelled = true;
                break;
            }

            // An entry that fails to yield still counts toward the
            // aggregate; it is neither a file nor a directory we can name.
            let decision = match entry {
                Ok(entry) => self.decide(directory, &entry),
                Err(_) => Decision::SkippedUnknownType {
                    name: String::from("<unreadable entry>"),
                },
            };
            match &decision {
                Decision::Moved { .. } => outcome.moved += 1,
                _ => outcome.skipped += 1,
            }

            sink.emit(&SortEvent {
                timestamp: Local::now(),
                severity: decision.severity(),
                message: decision.describe(),
                decision: decision.clone(),
            });
            outcome.decisions.push(decision);
        }

        Ok(outcome)
    }

    /// Classifies one directory entry and performs the move if called for.
    fn decide(&self, directory: &Path, entry: &fs::DirEntry) -> Decision {
        let name = entry.file_name().to_string_lossy().to_string();

        let file_type = match entry.file_type() {
            Ok(t) => t,
            Err(_) => return Decision::SkippedUnknownType { name },
        };

        if file_type.is_dir() {
            return Decision::SkippedDirectory { name };
        }
        if !file_type.is_file() {
            return Decision::SkippedUnknownType { name };
        }

        // Extension-less files stay in place; they are deliberately not
        // routed to Uncategorized.
        let extension = match entry.path().extension() {
            Some(ext) if !ext.is_empty() => format!(".{}", ext.to_string_lossy()),
            _ => return Decision::SkippedNoExtension { name },
        };

        let category = self.rules.classify(&extension).to_string();
        let desired_dest = directory.join(&category).join(entry.file_name());

        match SafeMover::move_safely(&entry.path(), &desired_dest) {
            Ok(final_path) => Decision::Moved {
                name,
                category,
                final_path,
            },
            Err(e) => Decision::MoveFailed {
                name,
                category,
                reason: e.to_string(),
            },
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}
