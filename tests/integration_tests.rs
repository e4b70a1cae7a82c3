//! Integration tests for sortdir
//!
//! These tests exercise the complete sort pipeline against real temporary
//! directories: classification, collision-safe moving, aggregation, and
//! the dry-run preview.
//!
//! Test categories:
//! 1. Basic sorting workflows
//! 2. Count conservation and repeat-run safety
//! 3. Collision handling
//! 4. Skip semantics (directories, extension-less files)
//! 5. Fatal-error behavior
//! 6. Configuration and dry-run

use sortdir::cli::{self, Args};
use sortdir::engine::{NullSink, SortEngine, SortError};
use sortdir::rules::RuleTable;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;

// ============================================================================
// Test Utilities
// ============================================================================

/// A test fixture that sets up a temporary directory with a configurable
/// file structure.
struct TestFixture {
    temp_dir: TempDir,
}

impl TestFixture {
    /// Create a new test fixture with a temporary directory.
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        TestFixture { temp_dir }
    }

    /// Get the path to the test directory.
    fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Create a file with content in the test directory.
    fn create_file(&self, name: &str, content: &[u8]) {
        let file_path = self.path().join(name);
        let mut file = File::create(&file_path).expect("Failed to create file");
        file.write_all(content)
            .expect("Failed to write file content");
    }

    /// Create a subdirectory in the test directory.
    fn create_subdir(&self, name: &str) {
        let dir_path = self.path().join(name);
        fs::create_dir(&dir_path).expect("Failed to create subdirectory");
    }

    /// Run the sort engine with the default rule table.
    fn sort(&self) -> sortdir::SortOutcome {
        SortEngine::new(RuleTable::default())
            .sort(self.path(), &mut NullSink)
            .expect("Sort failed")
    }

    /// Assert that a file exists at the given relative path.
    fn assert_file_exists(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        assert!(
            path.exists() && path.is_file(),
            "File should exist: {}",
            path.display()
        );
    }

    /// Assert that a file does NOT exist at the given relative path.
    fn assert_not_exists(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        assert!(!path.exists(), "Path should not exist: {}", path.display());
    }

    /// Count direct children of the test directory.
    fn count_children(&self) -> usize {
        fs::read_dir(self.path())
            .expect("Failed to read directory")
            .count()
    }

    /// Count regular files anywhere under the test directory.
    fn count_files_recursive(&self) -> usize {
        fn walk(dir: &Path) -> usize {
            fs::read_dir(dir)
                .expect("Failed to read directory")
                .flatten()
                .map(|e| {
                    let path = e.path();
                    if path.is_dir() {
                        walk(&path)
                    } else {
                        1
                    }
                })
                .sum()
        }
        walk(self.path())
    }
}

// ============================================================================
// 1. Basic sorting workflows
// ============================================================================

#[test]
fn test_sorts_mixed_directory_scenario() {
    let fixture = TestFixture::new();
    fixture.create_file("a.jpg", b"image");
    fixture.create_file("b.PDF", b"document");
    fixture.create_file("c", b"no extension");
    fixture.create_subdir("d");

    let outcome = fixture.sort();

    assert_eq!(outcome.moved, 2);
    assert_eq!(outcome.skipped, 2);
    fixture.assert_file_exists("Images/a.jpg");
    // Extension matching is case-insensitive but the file name keeps its
    // original casing.
    fixture.assert_file_exists("Documents/b.PDF");
    fixture.assert_not_exists("Documents/b.pdf");
    fixture.assert_file_exists("c");
    assert!(fixture.path().join("d").is_dir());
}

#[test]
fn test_every_default_category_is_reachable() {
    let fixture = TestFixture::new();
    let samples = [
        ("photo.png", "Images/photo.png"),
        ("letter.odt", "Documents/letter.odt"),
        ("track.flac", "Audio/track.flac"),
        ("clip.mov", "Video/clip.mov"),
        ("bundle.7z", "Archives/bundle.7z"),
        ("mockup.psd", "Adobe Files/mockup.psd"),
        ("setup.msi", "Executables/setup.msi"),
        ("page.html", "Code/page.html"),
        ("mystery.xyz", "Uncategorized/mystery.xyz"),
    ];
    for (name, _) in &samples {
        fixture.create_file(name, b"data");
    }

    let outcome = fixture.sort();

    assert_eq!(outcome.moved, samples.len());
    for (_, dest) in &samples {
        fixture.assert_file_exists(dest);
    }
}

// ============================================================================
// 2. Count conservation and repeat-run safety
// ============================================================================

#[test]
fn test_moved_plus_skipped_equals_enumerated_children() {
    let fixture = TestFixture::new();
    fixture.create_file("one.jpg", b"1");
    fixture.create_file("two.zip", b"2");
    fixture.create_file("three", b"3");
    fixture.create_file("four.unknownext", b"4");
    fixture.create_subdir("five");

    let before = fixture.count_children();
    let outcome = fixture.sort();

    assert_eq!(outcome.moved + outcome.skipped, before);
}

#[test]
fn test_two_consecutive_runs_lose_nothing() {
    let fixture = TestFixture::new();
    fixture.create_file("a.jpg", b"image");
    fixture.create_file("b.txt", b"text");
    fixture.create_file("plain", b"stays");

    let files_before = fixture.count_files_recursive();

    let first = fixture.sort();
    assert_eq!(first.moved, 2);

    // Second run over the original root: sorted files are now one level
    // down, so only the extension-less file is left to consider.
    let second = fixture.sort();
    assert_eq!(second.moved, 0);

    assert_eq!(fixture.count_files_recursive(), files_before);
    fixture.assert_file_exists("Images/a.jpg");
    fixture.assert_file_exists("Documents/b.txt");
    fixture.assert_file_exists("plain");
}

#[test]
fn test_large_run_counts_only_children_present_at_call_time() {
    let fixture = TestFixture::new();

    // Enough entries that a live directory stream would page through the
    // listing after the first category directory has been created; the
    // engine must still account only for the original children.
    let total = 3000usize;
    for i in 0..total {
        fixture.create_file(&format!("photo-{:04}.jpg", i), b"img");
    }

    let outcome = fixture.sort();

    assert_eq!(outcome.moved, total);
    assert_eq!(outcome.skipped, 0);
    assert_eq!(outcome.moved + outcome.skipped, total);
    // The Images/ directory the run created must not appear in its own
    // decision log.
    assert!(
        !outcome
            .decisions
            .iter()
            .any(|d| matches!(d, sortdir::Decision::SkippedDirectory { .. })),
        "run must not observe category directories it created itself"
    );
}

#[test]
fn test_empty_directory_sorts_to_zero() {
    let fixture = TestFixture::new();
    let outcome = fixture.sort();
    assert_eq!(outcome.moved, 0);
    assert_eq!(outcome.skipped, 0);
    assert_eq!(fixture.count_children(), 0);
}

// ============================================================================
// 3. Collision handling
// ============================================================================

#[test]
fn test_collision_law_across_three_runs() {
    let fixture = TestFixture::new();

    // Move three files with the same name into the same destination, one
    // run each (a single directory can only hold one "dup.txt" at a time).
    for expected in ["Documents/dup.txt", "Documents/dup (1).txt", "Documents/dup (2).txt"] {
        fixture.create_file("dup.txt", expected.as_bytes());
        let outcome = fixture.sort();
        assert_eq!(outcome.moved, 1);
        fixture.assert_file_exists(expected);
    }

    // Exactly one file per disambiguated name; contents prove none was
    // overwritten.
    for expected in ["Documents/dup.txt", "Documents/dup (1).txt", "Documents/dup (2).txt"] {
        let content =
            fs::read_to_string(fixture.path().join(expected)).expect("Failed to read file");
        assert_eq!(content, expected);
    }
}

#[test]
fn test_pre_existing_destination_is_never_overwritten() {
    let fixture = TestFixture::new();
    fixture.create_subdir("Images");
    fs::write(fixture.path().join("Images").join("pic.jpg"), b"original")
        .expect("Failed to seed destination");
    fixture.create_file("pic.jpg", b"incoming");

    let outcome = fixture.sort();

    assert_eq!(outcome.moved, 1);
    // The Images directory itself counts as a skipped child.
    assert_eq!(outcome.skipped, 1);
    let original = fs::read(fixture.path().join("Images/pic.jpg")).unwrap();
    assert_eq!(original, b"original");
    let incoming = fs::read(fixture.path().join("Images/pic (1).jpg")).unwrap();
    assert_eq!(incoming, b"incoming");
}

// ============================================================================
// 4. Skip semantics
// ============================================================================

#[test]
fn test_extensionless_files_never_move_even_zero_byte() {
    let fixture = TestFixture::new();
    fixture.create_file("empty", b"");
    fixture.create_file("notes", b"some text");

    let outcome = fixture.sort();

    assert_eq!(outcome.moved, 0);
    assert_eq!(outcome.skipped, 2);
    fixture.assert_file_exists("empty");
    fixture.assert_file_exists("notes");
    fixture.assert_not_exists("Uncategorized");
}

#[test]
fn test_subdirectories_and_their_contents_are_untouched() {
    let fixture = TestFixture::new();
    fixture.create_subdir("Images");
    fixture.create_subdir("vacation.photos");
    fs::write(
        fixture.path().join("vacation.photos").join("beach.jpg"),
        b"img",
    )
    .expect("Failed to write nested file");

    let outcome = fixture.sort();

    assert_eq!(outcome.moved, 0);
    assert_eq!(outcome.skipped, 2);
    fixture.assert_file_exists("vacation.photos/beach.jpg");
}

// ============================================================================
// 5. Fatal-error behavior
// ============================================================================

#[test]
fn test_missing_directory_is_fatal_and_creates_nothing() {
    let fixture = TestFixture::new();
    let missing = fixture.path().join("not-here");

    let result = SortEngine::new(RuleTable::default()).sort(&missing, &mut NullSink);

    assert!(matches!(result, Err(SortError::DirectoryNotFound { .. })));
    assert_eq!(fixture.count_children(), 0);
}

// ============================================================================
// 6. Configuration and dry-run
// ============================================================================

#[test]
fn test_custom_rule_file_drives_the_engine() {
    let fixture = TestFixture::new();
    fixture.create_file("draft.txt", b"text");
    fixture.create_file("song.mp3", b"audio");

    let config_dir = TempDir::new().expect("Failed to create config dir");
    let config_path = config_dir.path().join("rules.toml");
    fs::write(
        &config_path,
        r#"
        [[categories]]
        name = "Writing"
        extensions = [".txt"]
        "#,
    )
    .expect("Failed to write config");

    let rules = sortdir::load_rules(Some(&config_path)).expect("Failed to load rules");
    let outcome = SortEngine::new(rules)
        .sort(fixture.path(), &mut NullSink)
        .expect("Sort failed");

    assert_eq!(outcome.moved, 2);
    fixture.assert_file_exists("Writing/draft.txt");
    // Not in the custom table, so it falls back to Uncategorized.
    fixture.assert_file_exists("Uncategorized/song.mp3");
}

#[test]
fn test_dry_run_mutates_nothing() {
    let fixture = TestFixture::new();
    fixture.create_file("a.jpg", b"image");
    fixture.create_file("b.pdf", b"document");

    let args = Args {
        directory: fixture.path().to_path_buf(),
        config: None,
        dry_run: true,
        list_rules: false,
    };
    cli::run(&args).expect("Dry run failed");

    fixture.assert_file_exists("a.jpg");
    fixture.assert_file_exists("b.pdf");
    fixture.assert_not_exists("Images");
    fixture.assert_not_exists("Documents");
    assert_eq!(fixture.count_children(), 2);
}

#[test]
fn test_dry_run_on_missing_directory_fails() {
    let fixture = TestFixture::new();
    let args = Args {
        directory: fixture.path().join("gone"),
        config: None,
        dry_run: true,
        list_rules: false,
    };
    assert!(cli::run(&args).is_err());
}

#[test]
fn test_list_rules_does_not_touch_the_directory() {
    let fixture = TestFixture::new();
    fixture.create_file("a.jpg", b"image");

    let args = Args {
        directory: fixture.path().to_path_buf(),
        config: None,
        dry_run: false,
        list_rules: true,
    };
    cli::run(&args).expect("list-rules failed");

    fixture.assert_file_exists("a.jpg");
    assert_eq!(fixture.count_children(), 1);
}
