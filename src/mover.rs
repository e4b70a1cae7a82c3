//! Collision-safe single-file move primitive.
//!
//! This module moves exactly one file per call. It creates any missing
//! destination directories, probes for a free destination name when the
//! desired one is taken, and falls back to copy-then-delete when a plain
//! rename fails (e.g. across filesystems). It never deletes or overwrites
//! an existing file.

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

/// Errors that can occur while moving a single file.
#[derive(Debug)]
pub enum MoveError {
    /// The source path does not name an existing regular file.
    SourceNotFound { path: PathBuf },
    /// The destination directory could not be created. The source file
    /// was not touched.
    DestinationUnavailable {
        path: PathBuf,
        source: io::Error,
    },
    /// The move itself failed. The source file is still in place unless
    /// the failure happened mid-transfer.
    MoveFailed {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },
}

impl std::fmt::Display for MoveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SourceNotFound { path } => {
                write!(
                    f,
                    "Source file {} not found or is not a regular file",
                    path.display()
                )
            }
            Self::DestinationUnavailable { path, source } => {
                write!(
                    f,
                    "Failed to create destination directory {}: {}",
                    path.display(),
                    source
                )
            }
            Self::MoveFailed { from, to, source } => {
                write!(
                    f,
                    "Failed to move {} to {}: {}",
                    from.display(),
                    to.display(),
                    source
                )
            }
        }
    }
}

impl std::error::Error for MoveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::SourceNotFound { .. } => None,
            Self::DestinationUnavailable { source, .. } => Some(source),
            Self::MoveFailed { source, .. } => Some(source),
        }
    }
}

/// Result type for move operations.
pub type MoveResult<T> = Result<T, MoveError>;

/// Moves files without ever clobbering an existing filesystem entry.
pub struct SafeMover;

impl SafeMover {
    /// Moves `source` to `desired_dest`, or to a ` (N)`-suffixed sibling
    /// of it when `desired_dest` is already taken.
    ///
    /// Missing ancestors of the destination are created first. The final
    /// path actually used is returned on success.
    ///
    /// The existence probe and the rename are not atomic: if another
    /// process claims the probed name in between, the rename may fail and
    /// the error is reported as [`MoveError::MoveFailed`]. The copy
    /// fallback opens the destination with `create_new`, so even that
    /// race can never overwrite an existing file.
    ///
    /// # Arguments
    ///
    /// * `source` - The file to move. Must be an existing regular file.
    /// * `desired_dest` - The full destination path, including the file name.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use sortdir::mover::SafeMover;
    /// use std::path::Path;
    ///
    /// let final_path = SafeMover::move_safely(
    ///     Path::new("/downloads/photo.jpg"),
    ///     Path::new("/downloads/Images/photo.jpg"),
    /// );
    ///
    /// match final_path {
    ///     Ok(path) => println!("Moved to {}", path.display()),
    ///     Err(e) => eprintln!("Move failed: {}", e),
    /// }
    /// ```
    pub fn move_safely(source: &Path, desired_dest: &Path) -> MoveResult<PathBuf> {
        if !source.is_file() {
            return Err(MoveError::SourceNotFound {
                path: source.to_path_buf(),
            });
        }

        if let Some(dest_dir) = desired_dest.parent()
            && !dest_dir.as_os_str().is_empty()
            && !dest_dir.exists()
        {
            fs::create_dir_all(dest_dir).map_err(|e| MoveError::DestinationUnavailable {
                path: dest_dir.to_path_buf(),
                source: e,
            })?;
        }

        let final_dest = next_free_path(desired_dest);

        transfer(source, &final_dest).map_err(|e| MoveError::MoveFailed {
            from: source.to_path_buf(),
            to: final_dest.clone(),
            source: e,
        })?;

        Ok(final_dest)
    }
}

/// Returns `desired` if it is free, otherwise the first free sibling named
/// `"<stem> (N)<.ext>"` with N counting up from 1.
///
/// Each candidate is checked against the live filesystem, so external
/// writers can only ever steal a candidate, not get overwritten by one.
fn next_free_path(desired: &Path) -> PathBuf {
    if !desired.exists() {
        return desired.to_path_buf();
    }

    // Handles dotfiles and non-UTF8 names via OsString concatenation.
    let stem = desired
        .file_stem()
        .map(|s| s.to_owned())
        .unwrap_or_else(|| OsString::from("file"));
    let ext = desired.extension().map(|e| e.to_owned());

    for n in 1u32.. {
        let mut name = OsString::new();
        name.push(&stem);
        name.push(format!(" ({})", n));
        if let Some(ref e) = ext {
            name.push(".");
            name.push(e);
        }
        let candidate = desired.with_file_name(name);
        if !candidate.exists() {
            return candidate;
        }
    }
    unreachable!("u32 suffix space exhausted");
}

/// Renames `source` to `dest`, falling back to copy-then-delete when the
/// rename fails (cross-device moves return `EXDEV` from rename).
fn transfer(source: &Path, dest: &Path) -> io::Result<()> {
    match fs::rename(source, dest) {
        Ok(()) => Ok(()),
        Err(_) => copy_then_delete(source, dest),
    }
}

/// Copies `source` to a newly created `dest`, then removes `source`.
///
/// `create_new` guarantees the destination did not exist at open time, so
/// this path can never clobber a file that appeared after the probe.
fn copy_then_delete(source: &Path, dest: &Path) -> io::Result<()> {
    let mut reader = File::open(source)?;
    let mut writer = OpenOptions::new().write(true).create_new(true).open(dest)?;
    io::copy(&mut reader, &mut writer)?;
    writer.sync_all()?;
    drop(writer);
    fs::remove_file(source)
}
