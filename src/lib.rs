//! sortdir - sort a directory's files into category subdirectories
//!
//! This library classifies the direct children of a directory by file
//! extension and relocates each file into a category subdirectory, without
//! ever overwriting an existing file and without recursing into
//! subdirectories. Rule tables are plain data and can be replaced via TOML
//! configuration files.

pub mod cli;
pub mod config;
pub mod engine;
pub mod mover;
pub mod output;
pub mod rules;

pub use config::{ConfigError, RulesConfig, load_rules};
pub use engine::{
    Decision, EventSink, NullSink, Severity, SortEngine, SortError, SortEvent, SortOutcome,
};
pub use mover::{MoveError, MoveResult, SafeMover};
pub use rules::{Category, RuleTable, UNCATEGORIZED};
