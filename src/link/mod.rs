//! Rewriting Obsidian wiki-links into relative markdown links
//!
//! | Source                | Output                                   |
//! |-----------------------|------------------------------------------|
//! | `[[Target]]`          | `[Target](Target.md)`                    |
//! | `[[Target#Section]]`  | `[section](Target.md#section)`           |
//! | `![[Media]]`          | `![Media](<prefix>media/Media)`          |
//!
//! Names go through [`sanitize_filename`] and sections through
//! [`sanitize_section_name`]. The visible text of a note link is the
//! original target, the visible text of a section link is the slug.
//!
//! # Example
//! ```
//! use obsidian_extract::link::rewrite_links;
//!
//! assert_eq!(
//!     rewrite_links("See [[Note A#Intro Section]] and [[Simple Note]]"),
//!     "See [intro-section](Note_A.md#intro-section) and [Simple Note](Simple_Note.md)"
//! );
//! ```

pub mod parser;

pub use parser::{LinkReference, Token, Tokens, tokenize};

use crate::error::Error;
use crate::media::MediaRelocator;
use crate::sanitize::{sanitize_filename, sanitize_section_name};

/// Renders `[[target]]`
#[must_use]
pub fn render_note_link(target: &str) -> String {
    format!("[{target}]({}.md)", sanitize_filename(target))
}

/// Renders `[[target#section]]`
#[must_use]
pub fn render_section_link(target: &str, section: &str) -> String {
    let slug = sanitize_section_name(section);
    format!("[{slug}]({}.md#{slug})", sanitize_filename(target))
}

/// Rewrites note and section links in `text`
///
/// Embeds (`![[...]]`) are left exactly as written; use
/// [`MediaRelocator::rewrite_media`] or [`rewrite_note`] for those.
#[must_use]
pub fn rewrite_links(text: &str) -> String {
    let mut result = String::with_capacity(text.len());

    for token in tokenize(text) {
        match token {
            Token::Link {
                link: LinkReference::Note { target },
                ..
            } => result.push_str(&render_note_link(target)),
            Token::Link {
                link: LinkReference::Section { target, section },
                ..
            } => result.push_str(&render_section_link(target, section)),
            Token::Link {
                link: LinkReference::Embed { .. },
                span,
            }
            | Token::Text(span) => result.push_str(span),
        }
    }

    result
}

/// Rewrites every link in `text` in a single pass
///
/// Embeds are copied by `relocator` and point at `<prefix>media/`, where
/// `prefix` leads from the written note back to the destination root.
///
/// # Errors
/// - [`Error::CreateDir`] or [`Error::CopyMedia`] from [`MediaRelocator::relocate`]
///
/// # Example
/// ```no_run
/// use obsidian_extract::link::rewrite_note;
/// use obsidian_extract::media::MediaRelocator;
///
/// let relocator = MediaRelocator::new("vault/Media", "out/media");
/// let text = rewrite_note("![[photo one.png]] [[Other]]", "../", &relocator).unwrap();
///
/// assert_eq!(text, "![photo_one.png](../media/photo_one.png) [Other](Other.md)");
/// ```
pub fn rewrite_note(text: &str, prefix: &str, relocator: &MediaRelocator) -> Result<String, Error> {
    let mut result = String::with_capacity(text.len());

    for token in tokenize(text) {
        match token {
            Token::Text(plain) => result.push_str(plain),
            Token::Link { link, .. } => match link {
                LinkReference::Note { target } => result.push_str(&render_note_link(target)),
                LinkReference::Section { target, section } => {
                    result.push_str(&render_section_link(target, section));
                }
                LinkReference::Embed { name } => {
                    result.push_str(&relocator.relocate(name, prefix)?);
                }
            },
        }
    }

    Ok(result)
}
