//! All prelude

pub use crate::error::Error;
pub use crate::export::{DEFAULT_EXCLUDED_DIRS, ExportOptions, ExportedNote, Exporter};
pub use crate::link::{LinkReference, Token, rewrite_links, rewrite_note, tokenize};
pub use crate::media::MediaRelocator;
pub use crate::sanitize::{sanitize_filename, sanitize_section_name};
