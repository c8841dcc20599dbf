//! Options for [`Exporter`]
//!
//! [`Exporter`]: crate::export::Exporter

use std::path::{Path, PathBuf};

/// Name of the media directory inside the destination tree
pub const MEDIA_DIR: &str = "media";

/// Where an export reads from and writes to
///
/// [`Exporter`]: crate::export::Exporter
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ExportOptions {
    /// Root of the notes to export
    source: PathBuf,

    /// Directory holding the media embedded by the notes
    source_media: PathBuf,

    /// Root of the exported tree
    destination: PathBuf,
}

impl ExportOptions {
    /// Create new [`ExportOptions`]
    pub fn new(
        source: impl AsRef<Path>,
        source_media: impl AsRef<Path>,
        destination: impl AsRef<Path>,
    ) -> Self {
        Self {
            source: source.as_ref().to_path_buf(),
            source_media: source_media.as_ref().to_path_buf(),
            destination: destination.as_ref().to_path_buf(),
        }
    }

    /// Get root of the notes
    #[inline]
    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Get media directory of the notes
    #[inline]
    #[must_use]
    pub fn source_media(&self) -> &Path {
        &self.source_media
    }

    /// Get root of the exported tree
    #[inline]
    #[must_use]
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Get media directory of the exported tree (`<destination>/media`)
    #[must_use]
    pub fn destination_media(&self) -> PathBuf {
        self.destination.join(MEDIA_DIR)
    }
}
