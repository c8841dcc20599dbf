//! Exporting a whole vault into a portable markdown tree
//!
//! Walks the source notes, rewrites each note's links (see [`rewrite_note`])
//! and writes it to the same relative path under the destination root.
//! Embedded media ends up in `<destination>/media`.
//!
//! # Example
//! ```no_run
//! use obsidian_extract::prelude::*;
//!
//! let options = ExportOptions::new("vault/Notes", "vault/Media", "export");
//!
//! for note in Exporter::new(&options).exclude_dir("Templates").into_iter() {
//!     let note = note.unwrap();
//!     println!("{} -> {}", note.source().display(), note.destination().display());
//! }
//! ```

pub mod options;


use crate::error::Error;
use crate::link::rewrite_note;
use crate::media::MediaRelocator;
use crate::sanitize::sanitize_filename;
pub use options::{ExportOptions, MEDIA_DIR};
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Directories skipped unless [`Exporter::excluded_dirs`] says otherwise
pub const DEFAULT_EXCLUDED_DIRS: [&str; 2] = [MEDIA_DIR, "interna"];

/// Note written by an export
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ExportedNote {
    source: PathBuf,
    destination: PathBuf,
}

impl ExportedNote {
    /// Get path of the original note
    #[inline]
    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Get path of the written note
    #[inline]
    #[must_use]
    pub fn destination(&self) -> &Path {
        &self.destination
    }
}

impl Display for ExportedNote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} -> {}",
            self.source.display(),
            self.destination.display()
        )
    }
}

/// Builder for an export run
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Exporter<'a> {
    options: &'a ExportOptions,
    include_hidden: bool,
    follow_links: bool,
    sanitize_file_names: bool,
    excluded_dirs: Vec<String>,
}

fn is_hidden(path: impl AsRef<Path>) -> bool {
    path.as_ref()
        .file_name()
        .is_some_and(|e| e.to_str().is_some_and(|name| name.starts_with('.')))
}

fn is_md_file(path: impl AsRef<Path>) -> bool {
    path.as_ref()
        .extension()
        .is_some_and(|p| p.eq_ignore_ascii_case("md"))
}

/// `../` once per directory between the note and the source root
fn relative_prefix(relative: &Path) -> String {
    let depth = relative.components().count().saturating_sub(1);
    "../".repeat(depth)
}

macro_rules! impl_setter {
    ($name:ident, $t:ty) => {
        #[must_use]
        #[allow(missing_docs)]
        pub const fn $name(mut self, $name: $t) -> Self {
            self.$name = $name;
            self
        }
    };
}

impl<'a> Exporter<'a> {
    /// Create default [`Exporter`]
    ///
    /// Hidden entries are exported, symlinks are not followed, note file
    /// names are kept and [`DEFAULT_EXCLUDED_DIRS`] are skipped.
    #[must_use]
    pub fn new(options: &'a ExportOptions) -> Self {
        Self {
            options,
            include_hidden: true,
            follow_links: false,
            sanitize_file_names: false,
            excluded_dirs: DEFAULT_EXCLUDED_DIRS.into_iter().map(String::from).collect(),
        }
    }

    impl_setter!(include_hidden, bool);
    impl_setter!(follow_links, bool);

    /// Write notes under their sanitized file name
    ///
    /// Rewritten links always point at sanitized names ending in `.md`, so
    /// with this set links between notes in the same directory resolve in
    /// the export. The extension is lower-cased too (`Note.MD` -> `Note.md`).
    #[must_use]
    pub const fn sanitize_file_names(mut self, sanitize_file_names: bool) -> Self {
        self.sanitize_file_names = sanitize_file_names;
        self
    }

    /// Skip every directory named `name` below the source root
    #[must_use]
    pub fn exclude_dir(mut self, name: impl Into<String>) -> Self {
        self.excluded_dirs.push(name.into());
        self
    }

    /// Replace the set of skipped directory names
    #[must_use]
    pub fn excluded_dirs<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_dirs = names.into_iter().map(Into::into).collect();
        self
    }

    fn is_pruned(
        entry: &DirEntry,
        include_hidden: bool,
        excluded_dirs: &[String],
        destination: &Path,
    ) -> bool {
        if entry.depth() == 0 {
            return false;
        }

        if !include_hidden && is_hidden(entry.path()) {
            return true;
        }

        if !entry.file_type().is_dir() {
            return false;
        }

        let excluded = entry
            .file_name()
            .to_str()
            .is_some_and(|name| excluded_dirs.iter().any(|dir| dir == name));

        excluded || fs::canonicalize(entry.path()).is_ok_and(|path| path == destination)
    }

    /// Checks the source root and creates the destination root
    ///
    /// Returns the canonical destination, so a destination inside the
    /// source is never walked.
    fn prepare(&self) -> Result<PathBuf, Error> {
        let source = self.options.source();
        if !source.is_dir() {
            #[cfg(feature = "tracing")]
            tracing::error!("Path is not directory: {}", source.display());

            return Err(Error::IsNotDir(source.to_path_buf()));
        }

        let destination = self.options.destination();
        fs::create_dir_all(destination).map_err(|source| Error::CreateDir {
            path: destination.to_path_buf(),
            source,
        })?;

        Ok(fs::canonicalize(destination).unwrap_or_else(|_| destination.to_path_buf()))
    }

    fn get_notes_from_walkdir(
        self,
        destination: PathBuf,
    ) -> impl Iterator<Item = Result<PathBuf, Error>> + 'a {
        let Self {
            options,
            include_hidden,
            follow_links,
            excluded_dirs,
            ..
        } = self;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            "Walking {} (excluded: {:?})",
            options.source().display(),
            excluded_dirs
        );

        WalkDir::new(options.source())
            .follow_links(follow_links)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |entry| {
                !Self::is_pruned(entry, include_hidden, &excluded_dirs, &destination)
            })
            .filter_map(|entry| match entry {
                Ok(entry) => (entry.file_type().is_file() && is_md_file(entry.path()))
                    .then(|| Ok(entry.into_path())),
                Err(error) => Some(Err(Error::from(error))),
            })
    }

    /// Into [`Exporter`] to iterator
    ///
    /// Creates the destination root right away, then exports one note per
    /// item, in directory-walk order sorted by file name. Each item is the
    /// progress notification for that note.
    ///
    /// # Errors
    /// Items are errors if:
    /// - the source root is not a directory ([`Error::IsNotDir`], only item)
    /// - walking, reading, decoding or writing a note fails
    /// - copying an embedded media file fails
    #[allow(clippy::should_implement_trait)]
    pub fn into_iter(self) -> impl Iterator<Item = Result<ExportedNote, Error>> + 'a {
        let writer = NoteWriter {
            options: self.options,
            relocator: MediaRelocator::new(
                self.options.source_media(),
                self.options.destination_media(),
            ),
            sanitize_file_names: self.sanitize_file_names,
        };

        let (failed, notes) = match self.prepare() {
            Ok(destination) => (None, Some(self.get_notes_from_walkdir(destination))),
            Err(error) => (Some(Err(error)), None),
        };

        failed.into_iter().chain(
            notes
                .into_iter()
                .flatten()
                .map(move |path| writer.export(&path?)),
        )
    }

    /// Exports every note, stopping at the first error
    ///
    /// Notes written before the error stay on disk.
    ///
    /// # Errors
    /// See [`Exporter::into_iter`]
    pub fn run(self) -> Result<Vec<ExportedNote>, Error> {
        let notes = self.into_iter().collect::<Result<Vec<_>, _>>()?;

        #[cfg(feature = "tracing")]
        tracing::info!("Exported {} notes", notes.len());

        Ok(notes)
    }
}

/// Reads, rewrites and writes single notes
struct NoteWriter<'a> {
    options: &'a ExportOptions,
    relocator: MediaRelocator,
    sanitize_file_names: bool,
}

impl NoteWriter<'_> {
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, path), fields(path = %path.display())))]
    fn export(&self, path: &Path) -> Result<ExportedNote, Error> {
        let relative = path
            .strip_prefix(self.options.source())
            .map_err(|_| Error::OutsideRoot(path.to_path_buf()))?;

        let data = fs::read(path).map_err(|source| Error::ReadNote {
            path: path.to_path_buf(),
            source,
        })?;

        let text = String::from_utf8(data).map_err(|source| Error::NotUtf8 {
            path: path.to_path_buf(),
            source,
        })?;

        let content = rewrite_note(&text, &relative_prefix(relative), &self.relocator)?;

        let mut destination = self.options.destination().join(relative);
        if self.sanitize_file_names
            && let Some(stem) = relative.file_stem().and_then(|stem| stem.to_str())
        {
            destination.set_file_name(format!("{}.md", sanitize_filename(stem)));
        }

        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent).map_err(|source| Error::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        fs::write(&destination, content).map_err(|source| Error::WriteNote {
            path: destination.clone(),
            source,
        })?;

        #[cfg(feature = "tracing")]
        tracing::info!("Processed {} -> {}", path.display(), destination.display());

        Ok(ExportedNote {
            source: path.to_path_buf(),
            destination,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::export_test::{INDEX_NOTE, PLAN_NOTE, SIMPLE_NOTE, create_test_vault};
    use crate::test_utils::{PHOTO_DATA, is_error};
    use sha2::{Digest, Sha256};
    use std::collections::BTreeMap;
    use std::string::FromUtf8Error;

    fn read(path: impl AsRef<Path>) -> String {
        fs::read_to_string(path).unwrap()
    }

    fn hash_tree(root: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
        WalkDir::new(root)
            .into_iter()
            .map(Result::unwrap)
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| {
                let hash = Sha256::digest(fs::read(entry.path()).unwrap());
                (entry.into_path(), hash.as_slice().to_vec())
            })
            .collect()
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn prefix() {
        assert_eq!(relative_prefix(Path::new("index.md")), "");
        assert_eq!(relative_prefix(Path::new("a/index.md")), "../");
        assert_eq!(relative_prefix(Path::new("a/b/c/index.md")), "../../../");
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn is_hidden() {
        assert!(super::is_hidden(".trash"));
        assert!(!super::is_hidden("notes"));
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn is_md_file() {
        assert!(super::is_md_file("note.md"));
        assert!(super::is_md_file("NOTE.MD"));
        assert!(!super::is_md_file("note.txt"));
        assert!(!super::is_md_file("md"));
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn run() {
        let (_temp_dir, options) = create_test_vault().unwrap();
        let out = options.destination();

        let notes = Exporter::new(&options).run().unwrap();

        let written: Vec<_> = notes
            .iter()
            .map(|note| note.destination().strip_prefix(out).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            written,
            vec![
                PathBuf::from("Simple Note.md"),
                PathBuf::from("index.md"),
                Path::new("projects").join("deep").join("plan.md"),
            ]
        );

        assert_eq!(
            read(out.join("index.md")),
            "# Index\n[Simple Note](Simple_Note.md) and [intro-section](Note_A.md#intro-section)\n![photo_one.png](media/photo_one.png)\n"
        );
        assert_eq!(read(out.join("Simple Note.md")), "Back to [index](index.md)");
        assert_eq!(
            read(out.join("projects").join("deep").join("plan.md")),
            "![photo_one.png](../../media/photo_one.png) [top](index.md#top) ![missing.jpg](../../media/missing.jpg)"
        );
        assert_eq!(fs::read(out.join("media").join("photo_one.png")).unwrap(), PHOTO_DATA);
        assert!(!out.join("media").join("missing.jpg").exists());
        assert!(!out.join("projects").join("todo.txt").exists());
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn run_leaves_source_untouched() {
        let (_temp_dir, options) = create_test_vault().unwrap();

        Exporter::new(&options).run().unwrap();

        let source = options.source();
        assert_eq!(read(source.join("index.md")), INDEX_NOTE);
        assert_eq!(read(source.join("Simple Note.md")), SIMPLE_NOTE);
        assert_eq!(
            read(source.join("projects").join("deep").join("plan.md")),
            PLAN_NOTE
        );
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn run_twice_is_identical() {
        let (_temp_dir, options) = create_test_vault().unwrap();

        Exporter::new(&options).run().unwrap();
        let first = hash_tree(options.destination());
        Exporter::new(&options).run().unwrap();
        let second = hash_tree(options.destination());

        assert!(!first.is_empty());
        assert_eq!(first, second);
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn excluded_dirs_are_skipped() {
        let (_temp_dir, options) = create_test_vault().unwrap();
        let out = options.destination();

        Exporter::new(&options).run().unwrap();

        assert!(!out.join("interna").exists());
        assert!(!out.join("media").join("stray.md").exists());
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn exclusion_can_be_disabled() {
        let (_temp_dir, options) = create_test_vault().unwrap();
        let out = options.destination();

        let notes = Exporter::new(&options)
            .excluded_dirs(Vec::<String>::new())
            .run()
            .unwrap();

        assert_eq!(notes.len(), 5);
        assert_eq!(read(out.join("interna").join("secret.md")), "[private](private.md)");
        assert_eq!(read(out.join("media").join("stray.md")), "[stray](stray.md)");
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn exclude_custom_dir() {
        let (_temp_dir, options) = create_test_vault().unwrap();

        let notes = Exporter::new(&options).exclude_dir("projects").run().unwrap();

        assert_eq!(notes.len(), 2);
        assert!(!options.destination().join("projects").exists());
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn exclusion_matches_whole_segment() {
        let (_temp_dir, options) = create_test_vault().unwrap();
        let multimedia = options.source().join("multimedia");
        fs::create_dir(&multimedia).unwrap();
        fs::write(multimedia.join("clip.md"), "clip").unwrap();

        Exporter::new(&options).run().unwrap();

        assert!(options.destination().join("multimedia").join("clip.md").is_file());
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn hidden_entries() {
        let (_temp_dir, options) = create_test_vault().unwrap();
        let trash = options.source().join(".trash");
        fs::create_dir(&trash).unwrap();
        fs::write(trash.join("old.md"), "old").unwrap();
        let exported = options.destination().join(".trash").join("old.md");

        Exporter::new(&options).include_hidden(false).run().unwrap();
        assert!(!exported.exists());

        Exporter::new(&options).run().unwrap();
        assert!(exported.is_file());
    }

    #[cfg(unix)]
    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn symlinked_dirs() {
        let (temp_dir, options) = create_test_vault().unwrap();
        let shared = temp_dir.path().join("shared");
        fs::create_dir(&shared).unwrap();
        fs::write(shared.join("linked.md"), "[[index]]").unwrap();
        std::os::unix::fs::symlink(&shared, options.source().join("shared")).unwrap();
        let exported = options.destination().join("shared").join("linked.md");

        Exporter::new(&options).run().unwrap();
        assert!(!exported.exists());

        Exporter::new(&options).follow_links(true).run().unwrap();
        assert_eq!(read(exported), "[index](index.md)");
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn sanitized_file_names() {
        let (_temp_dir, options) = create_test_vault().unwrap();
        let out = options.destination();

        Exporter::new(&options).sanitize_file_names(true).run().unwrap();

        assert!(out.join("Simple_Note.md").is_file());
        assert!(!out.join("Simple Note.md").exists());
        assert!(read(out.join("index.md")).contains("[Simple Note](Simple_Note.md)"));
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn sanitized_file_names_lower_extension() {
        let (_temp_dir, options) = create_test_vault().unwrap();
        fs::write(options.source().join("Upper Case.MD"), "[[index]]").unwrap();

        let notes = Exporter::new(&options).sanitize_file_names(true).run().unwrap();

        let upper = notes
            .iter()
            .find(|note| note.source().ends_with("Upper Case.MD"))
            .unwrap();
        assert_eq!(upper.destination().file_name().unwrap(), "Upper_Case.md");
        assert_eq!(read(upper.destination()), "[index](index.md)");
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn unwritable_directory_stops_run() {
        let (_temp_dir, options) = create_test_vault().unwrap();
        let out = options.destination();
        fs::create_dir_all(out).unwrap();
        fs::write(out.join("projects"), "in the way").unwrap();

        let error = Exporter::new(&options).run().unwrap_err();

        let blocked = out.join("projects").join("deep");
        assert!(matches!(&error, Error::CreateDir { path, .. } if *path == blocked));
        assert!(is_error::<std::io::Error>(&error));
        assert_eq!(read(out.join("Simple Note.md")), "Back to [index](index.md)");
        assert!(out.join("index.md").is_file());
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn unwritable_note_stops_run() {
        let (_temp_dir, options) = create_test_vault().unwrap();
        let out = options.destination();
        fs::create_dir_all(out.join("index.md")).unwrap();

        let error = Exporter::new(&options).run().unwrap_err();

        let blocked = out.join("index.md");
        assert!(matches!(&error, Error::WriteNote { path, .. } if *path == blocked));
        assert!(out.join("Simple Note.md").is_file());
        assert!(!out.join("projects").exists());
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn unwritable_destination_root() {
        let (_temp_dir, options) = create_test_vault().unwrap();
        fs::write(options.destination(), "not a directory").unwrap();

        let results: Vec<_> = Exporter::new(&options).into_iter().collect();

        assert_eq!(results.len(), 1);
        assert!(
            matches!(&results[0], Err(Error::CreateDir { path, .. }) if path == options.destination())
        );
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn destination_inside_source() {
        let (_temp_dir, options) = create_test_vault().unwrap();
        let nested = ExportOptions::new(
            options.source(),
            options.source_media(),
            options.source().join("export"),
        );

        let first = Exporter::new(&nested).run().unwrap();
        let second = Exporter::new(&nested).run().unwrap();

        assert_eq!(first, second);
        assert!(!nested.destination().join("export").exists());
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn not_utf8_stops_run() {
        let (_temp_dir, options) = create_test_vault().unwrap();
        let bad = options.source().join("bad.md");
        fs::write(&bad, [0xff, 0xfe, 0xfd]).unwrap();

        let error = Exporter::new(&options).run().unwrap_err();

        assert!(matches!(&error, Error::NotUtf8 { path, .. } if *path == bad));
        assert!(is_error::<FromUtf8Error>(&error));
        assert!(error.to_string().contains("bad.md"));
        assert!(options.destination().join("Simple Note.md").is_file());
        assert!(!options.destination().join("index.md").exists());
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn source_not_dir() {
        let (_temp_dir, options) = create_test_vault().unwrap();
        let file = ExportOptions::new(
            options.source().join("index.md"),
            options.source_media(),
            options.destination(),
        );

        let results: Vec<_> = Exporter::new(&file).into_iter().collect();

        assert_eq!(results.len(), 1);
        assert!(matches!(results[0], Err(Error::IsNotDir(_))));
        assert!(!options.destination().exists());
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn progress_display() {
        let note = ExportedNote {
            source: PathBuf::from("a.md"),
            destination: PathBuf::from("out/a.md"),
        };

        assert_eq!(note.to_string(), format!("a.md -> {}", Path::new("out/a.md").display()));
    }
}
