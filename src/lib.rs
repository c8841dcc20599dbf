//! `obsidian-extract` - Export an [Obsidian](https://obsidian.md) vault into a portable markdown tree
//!
//! Provides idiomatic APIs for:
//! - Rewriting wiki-links (`[[Note]]`, `[[Note#Section]]`) into relative markdown links
//! - Copying embedded media (`![[image.png]]`) next to the exported notes
//! - Sanitizing note names and headings into file names and anchors that work everywhere
//!
//! ## Key Features
//! * 🔗 **Single-pass rewriting**: every link span is classified once, embeds can't be mangled by note links
//! * 🧼 **Safe names**: exported file names only use `[A-Za-z0-9_.-]`, anchors only `[a-z0-9_-]`
//! * 🖼️ **Media relocation**: assets are copied once into `<export>/media` with their modification time
//! * 🔁 **Repeatable**: exporting an unchanged vault twice gives byte-identical output
//!
//! ## Examples
//!
//! ### Rewriting text
//! ```
//! use obsidian_extract::link::rewrite_links;
//!
//! assert_eq!(
//!     rewrite_links("[[Note A#Intro Section]]"),
//!     "[intro-section](Note_A.md#intro-section)"
//! );
//! assert_eq!(rewrite_links("[[Simple Note]]"), "[Simple Note](Simple_Note.md)");
//! ```
//!
//! ### Exporting a vault
//! ```no_run
//! use obsidian_extract::prelude::*;
//!
//! let options = ExportOptions::new("/path/to/vault/Notes", "/path/to/vault/Media", "/tmp/export");
//!
//! for note in Exporter::new(&options).run().unwrap() {
//!     println!("---> Processed {note}");
//! }
//! ```
//!
//! ## Logging
//! Enable the `tracing` feature to get [`tracing`](https://docs.rs/tracing) events for every
//! exported note, copied asset and skipped embed.

//#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::undocumented_unsafe_blocks)]
#![warn(clippy::cargo)]
#![warn(clippy::nursery)]
#![warn(clippy::perf)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::panic)]
#![warn(clippy::needless_pass_by_value)]
#![warn(clippy::unreadable_literal)]
#![warn(clippy::missing_const_for_fn)]
#![warn(clippy::as_conversions)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod error;
pub mod export;
pub mod link;
pub mod media;
pub mod prelude;
pub mod sanitize;

pub use error::Error;

#[cfg(test)]
pub(crate) mod test_utils;
