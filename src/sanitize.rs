//! Filesystem-safe file names and anchor-safe section slugs
//!
//! Both transforms are pure and total: any input yields an output, and
//! applying a transform to its own output changes nothing.

/// Sanitizes a note or media name into a single safe path segment
///
/// 1. Drops every non-ASCII character
/// 2. Replaces spaces with `_`
/// 3. Drops everything outside `[A-Za-z0-9_.-]`
///
/// The result never contains path separators or whitespace. Distinct inputs
/// may collide (`"a b"` and `"a_b"` both become `"a_b"`).
///
/// # Example
/// ```
/// use obsidian_extract::sanitize::sanitize_filename;
///
/// assert_eq!(sanitize_filename("photo one.png"), "photo_one.png");
/// assert_eq!(sanitize_filename("Größe/Maß?.md"), "GreMa.md");
/// ```
#[must_use]
pub fn sanitize_filename(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii)
        .map(|c| if c == ' ' { '_' } else { c })
        .filter(|c| is_filename_char(*c))
        .collect()
}

/// Sanitizes a heading into a markdown anchor slug
///
/// 1. Lower-cases the input
/// 2. Replaces spaces and `/` with `-`
/// 3. Drops everything outside `[a-z0-9_-]`
///
/// Repeated hyphens are kept as-is (`"a / b"` becomes `"a---b"`), which is
/// what heading anchor generators emit for the same heading.
///
/// # Example
/// ```
/// use obsidian_extract::sanitize::sanitize_section_name;
///
/// assert_eq!(sanitize_section_name("Intro Section"), "intro-section");
/// assert_eq!(sanitize_section_name("Input / Output"), "input---output");
/// ```
#[must_use]
pub fn sanitize_section_name(raw: &str) -> String {
    raw.to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '/' { '-' } else { c })
        .filter(|c| is_slug_char(*c))
        .collect()
}

const fn is_filename_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-')
}

const fn is_slug_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '_' | '-')
}
