//! Rule-table configuration loading.
//!
//! This module lets the built-in classification table be replaced by a
//! TOML file. Category order in the file is preserved, so tie-breaks
//! between overlapping extension sets follow file order.
//!
//! # Configuration File Format
//!
//! ```toml
//! [[categories]]
//! name = "Images"
//! extensions = [".jpg", ".png"]
//!
//! [[categories]]
//! name = "Paperwork"
//! extensions = [".pdf", ".txt"]
//! ```

use crate::rules::{Category, RuleTable};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    ConfigNotFound(PathBuf),
    /// Invalid TOML syntax or structure.
    ConfigInvalid(String),
    /// IO error while reading configuration.
    IoError(String),
    /// The file parsed but declares no categories.
    EmptyTable,
    /// A category has an empty name.
    EmptyCategoryName,
    /// An extension is missing its leading dot or is just a dot.
    InvalidExtension {
        /// Name of the category declaring the extension.
        category: String,
        /// The offending extension string.
        extension: String,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ConfigNotFound(path) => {
                write!(f, "Configuration file not found: {}", path.display())
            }
            ConfigError::ConfigInvalid(msg) => write!(f, "Invalid configuration: {}", msg),
            ConfigError::IoError(msg) => write!(f, "IO error reading configuration: {}", msg),
            ConfigError::EmptyTable => {
                write!(f, "Configuration declares no categories")
            }
            ConfigError::EmptyCategoryName => {
                write!(f, "Configuration contains a category with an empty name")
            }
            ConfigError::InvalidExtension {
                category,
                extension,
            } => {
                write!(
                    f,
                    "Invalid extension '{}' in category '{}': expected a leading dot (e.g. \".pdf\")",
                    extension, category
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// One `[[categories]]` entry in the configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryEntry {
    /// Category name, used as the destination subdirectory name.
    pub name: String,
    /// Dotted extensions, matched case-insensitively.
    pub extensions: Vec<String>,
}

/// Root of the TOML configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RulesConfig {
    #[serde(default)]
    pub categories: Vec<CategoryEntry>,
}

impl RulesConfig {
    /// Load a configuration file from a specific path.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ConfigNotFound` if the file does not exist.
    /// Returns `ConfigError::ConfigInvalid` if TOML parsing fails.
    /// Returns `ConfigError::IoError` if the file cannot be read.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))
    }

    /// Validate the entries and build a [`RuleTable`] preserving file order.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty table, an empty category name, or an
    /// extension without a leading dot.
    pub fn into_table(self) -> Result<RuleTable, ConfigError> {
        if self.categories.is_empty() {
            return Err(ConfigError::EmptyTable);
        }

        let mut categories = Vec::with_capacity(self.categories.len());
        for entry in self.categories {
            if entry.name.trim().is_empty() {
                return Err(ConfigError::EmptyCategoryName);
            }
            for ext in &entry.extensions {
                if !ext.starts_with('.') || ext.len() < 2 {
                    return Err(ConfigError::InvalidExtension {
                        category: entry.name.clone(),
                        extension: ext.clone(),
                    });
                }
            }
            let exts: Vec<&str> = entry.extensions.iter().map(String::as_str).collect();
            categories.push(Category::new(entry.name, &exts));
        }

        Ok(RuleTable::new(categories))
    }
}

/// Load the active rule table, with fallback to the built-in defaults.
///
/// Attempts to load configuration in the following order:
/// 1. If `config_path` is provided, load from that file
/// 2. Look for `.sortdirrc.toml` in the current directory
/// 3. Look for `~/.config/sortdir/config.toml` in the home directory
/// 4. Fall back to the built-in default table
///
/// # Errors
///
/// Returns an error if a configuration file was found but cannot be read,
/// parsed, or validated.
pub fn load_rules(config_path: Option<&Path>) -> Result<RuleTable, ConfigError> {
    // If explicitly specified, load from that path
    if let Some(path) = config_path {
        return RulesConfig::load_from_file(path)?.into_table();
    }

    // Try current directory
    let local_config = PathBuf::from(".sortdirrc.toml");
    if local_config.exists() {
        return RulesConfig::load_from_file(&local_config)?.into_table();
    }

    // Try home directory
    if let Ok(home) = std::env::var("HOME") {
        let home_config = PathBuf::from(home)
            .join(".config")
            .join("sortdir")
            .join("config.toml");
        if home_config.exists() {
            return RulesConfig::load_from_file(&home_config)?.into_table();
        }
    }

    // Fall back to defaults
    Ok(RuleTable::default())
}
