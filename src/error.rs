//! Error handling for vault export operations

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for export operations
///
/// Every I/O failure carries the path it happened on, so a failed run always
/// names the offending file.
#[derive(Debug, Error)]
pub enum Error {
    /// Expected a directory path
    ///
    /// # Example
    /// ```no_run
    /// use obsidian_extract::prelude::*;
    ///
    /// // Will fail if passed a file path
    /// let options = ExportOptions::new("notes.md", "media", "out");
    /// Exporter::new(&options).run().unwrap();
    /// ```
    #[error("Path: `{0}` is not a directory")]
    IsNotDir(PathBuf),

    /// Directory traversal failed
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// Note could not be read
    #[error("Failed to read note `{path}`: {source}")]
    ReadNote {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Note is not encoded in UTF-8
    ///
    /// Obsidian stores notes as UTF-8. The whole run stops on the first note
    /// that is not, so the output never silently misses a file.
    #[error("Note `{path}` is not encoded in UTF-8")]
    NotUtf8 {
        path: PathBuf,
        source: std::string::FromUtf8Error,
    },

    /// Rewritten note could not be written
    #[error("Failed to write note `{path}`: {source}")]
    WriteNote {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Directory in the destination tree could not be created
    #[error("Failed to create directory `{path}`: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Media asset could not be copied
    #[error("Failed to copy media `{from}` -> `{to}`: {source}")]
    CopyMedia {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },

    /// Walked entry does not live under the source root
    #[error("Path: `{0}` is outside of the source directory")]
    OutsideRoot(PathBuf),
}
