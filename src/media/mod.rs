//! Copying embedded media next to the exported notes
//!
//! Every `![[Media]]` embed is looked up by its original name under the
//! source media directory, copied under its sanitized name into the
//! destination media directory and rewritten to point at the copy.

use crate::error::Error;
use crate::link::{LinkReference, Token, tokenize};
use crate::sanitize::sanitize_filename;
use std::fs::{self, File};
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

/// Renders an embed of an already sanitized media name
///
/// `prefix` leads from the written note back to the destination root
/// (`""` or a run of `../`).
#[must_use]
pub fn render_embed(safe_name: &str, prefix: &str) -> String {
    format!("![{safe_name}]({prefix}media/{safe_name})")
}

/// Whether `name` stays inside the directory it is joined to
fn is_contained(name: &str) -> bool {
    Path::new(name)
        .components()
        .all(|component| matches!(component, Component::Normal(_) | Component::CurDir))
}

/// Copies content and permissions, then carries over the modification time
///
/// A previous copy is removed first, since it may carry read-only permissions
/// from its source and could not be overwritten in place.
fn copy_media(from: &Path, to: &Path) -> Result<(), Error> {
    let copy_error = |source: std::io::Error| Error::CopyMedia {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    };

    #[cfg(feature = "tracing")]
    tracing::debug!("Copy {} -> {}", from.display(), to.display());

    if let Err(error) = fs::remove_file(to)
        && error.kind() != ErrorKind::NotFound
    {
        return Err(copy_error(error));
    }

    fs::copy(from, to).map_err(copy_error)?;

    let modified = fs::metadata(from)
        .and_then(|metadata| metadata.modified())
        .map_err(copy_error)?;

    // Read-only handle: the copy may be read-only, the owner can still set times
    File::open(to)
        .and_then(|file| file.set_modified(modified))
        .map_err(copy_error)
}

/// Copies media referenced by notes into the destination tree
///
/// Copies overwrite what is already there, so repeated runs give the same
/// result. Two media names that sanitize to the same name end up in one
/// file, the last copy wins.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct MediaRelocator {
    /// Directory the original media is read from
    source_root: PathBuf,

    /// Directory the sanitized copies are written to
    destination_root: PathBuf,
}

impl MediaRelocator {
    /// Create new [`MediaRelocator`]
    pub fn new(source_root: impl AsRef<Path>, destination_root: impl AsRef<Path>) -> Self {
        Self {
            source_root: source_root.as_ref().to_path_buf(),
            destination_root: destination_root.as_ref().to_path_buf(),
        }
    }

    /// Get directory the media is read from
    #[inline]
    #[must_use]
    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    /// Get directory the media is written to
    #[inline]
    #[must_use]
    pub fn destination_root(&self) -> &Path {
        &self.destination_root
    }

    /// Copies the media file `name` and returns the rewritten embed
    ///
    /// A missing source is not an error: the copy is skipped (with a warning
    /// when the `tracing` feature is on) and the embed is still rewritten, so
    /// the exported note holds a dangling link. The same goes for a source
    /// that is not a regular file, for names that sanitize to nothing usable
    /// (`""`, `.` or `..`) and for names that would leave the source media
    /// directory (absolute paths, `..` components).
    ///
    /// # Errors
    /// - [`Error::CreateDir`] if the destination directory can't be created
    /// - [`Error::CopyMedia`] if the copy itself fails
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, prefix)))]
    pub fn relocate(&self, name: &str, prefix: &str) -> Result<String, Error> {
        let safe_name = sanitize_filename(name);

        fs::create_dir_all(&self.destination_root).map_err(|source| Error::CreateDir {
            path: self.destination_root.clone(),
            source,
        })?;

        let from = self.source_root.join(name);

        if matches!(safe_name.as_str(), "" | "." | "..") {
            #[cfg(feature = "tracing")]
            tracing::warn!("Media name sanitizes to `{safe_name}`, skip copy");
        } else if !is_contained(name) {
            #[cfg(feature = "tracing")]
            tracing::warn!("Media path leaves the media directory, skip copy");
        } else if from.is_file() {
            copy_media(&from, &self.destination_root.join(&safe_name))?;
        } else {
            #[cfg(feature = "tracing")]
            tracing::warn!("Media not found: {}", from.display());
        }

        Ok(render_embed(&safe_name, prefix))
    }

    /// Rewrites only the embeds in `text`, other links stay as written
    ///
    /// # Errors
    /// Same as [`MediaRelocator::relocate`]
    pub fn rewrite_media(&self, text: &str, prefix: &str) -> Result<String, Error> {
        let mut result = String::with_capacity(text.len());

        for token in tokenize(text) {
            match token {
                Token::Link {
                    link: LinkReference::Embed { name },
                    ..
                } => result.push_str(&self.relocate(name, prefix)?),
                other => result.push_str(other.source()),
            }
        }

        Ok(result)
    }
}
