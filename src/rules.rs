//! Extension-to-category classification rules.
//!
//! This module provides the ordered rule table that maps file extensions
//! to category names. Lookup is a linear scan in table order, so when two
//! categories claim the same extension the one listed first wins.
//!
//! # Examples
//!
//! ```
//! use sortdir::rules::{RuleTable, UNCATEGORIZED};
//!
//! let rules = RuleTable::default();
//! assert_eq!(rules.classify(".jpg"), "Images");
//! assert_eq!(rules.classify(".PDF"), "Documents");
//! assert_eq!(rules.classify(".xyz"), UNCATEGORIZED);
//! ```

/// Fallback category name for extensions that match no rule.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// A named bucket of file extensions.
///
/// The name doubles as the destination subdirectory name, so it must be a
/// valid directory component (e.g. "Images", "Adobe Files").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    name: String,
    extensions: Vec<String>,
}

impl Category {
    /// Creates a category from a name and a list of dotted extensions.
    ///
    /// Extensions are lower-cased on construction so that matching is
    /// case-insensitive.
    pub fn new<S: Into<String>>(name: S, extensions: &[&str]) -> Self {
        Self {
            name: name.into(),
            extensions: extensions.iter().map(|e| e.to_lowercase()).collect(),
        }
    }

    /// Returns the category name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the lower-cased extensions this category recognizes.
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Tests whether an already lower-cased extension belongs to this category.
    fn matches(&self, extension: &str) -> bool {
        self.extensions.iter().any(|e| e == extension)
    }
}

/// An ordered sequence of categories, immutable once constructed.
///
/// Iteration order is the construction order; `classify` returns the first
/// category whose extension set contains the input.
#[derive(Debug, Clone)]
pub struct RuleTable {
    categories: Vec<Category>,
}

impl RuleTable {
    /// Creates a rule table from an ordered list of categories.
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    /// Returns the categories in table order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Maps a dotted extension (e.g. ".pdf") to a category name.
    ///
    /// The input is lower-cased internally, so callers may pass the
    /// extension exactly as it appears in the file name. No trimming is
    /// performed. Returns [`UNCATEGORIZED`] when no category matches.
    ///
    /// # Examples
    ///
    /// ```
    /// use sortdir::rules::RuleTable;
    ///
    /// let rules = RuleTable::default();
    /// assert_eq!(rules.classify(".mp3"), "Audio");
    /// assert_eq!(rules.classify(".Mp3"), "Audio");
    /// ```
    pub fn classify(&self, extension: &str) -> &str {
        let extension = extension.to_lowercase();
        self.categories
            .iter()
            .find(|c| c.matches(&extension))
            .map(|c| c.name())
            .unwrap_or(UNCATEGORIZED)
    }
}

impl Default for RuleTable {
    /// Builds the built-in table of eight categories.
    fn default() -> Self {
        Self::new(vec![
            Category::new("Images", &[".jpg", ".jpeg", ".png", ".gif", ".bmp"]),
            Category::new("Documents", &[".pdf", ".docx", ".doc", ".txt", ".odt"]),
            Category::new("Audio", &[".mp3", ".wav", ".flac", ".aac"]),
            Category::new("Video", &[".mp4", ".mov", ".avi", ".mkv"]),
            Category::new("Archives", &[".zip", ".rar", ".7z"]),
            Category::new("Adobe Files", &[".psd", ".ai", ".indd"]),
            Category::new("Executables", &[".exe", ".msi", ".bat"]),
            Category::new("Code", &[".py", ".js", ".html", ".css", ".cpp", ".java"]),
        ])
    }
}
