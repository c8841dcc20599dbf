//! Left-to-right tokenizer for Obsidian link syntax
//!
//! Splits note text into plain text and link spans in one pass. Every
//! `[[...]]` / `![[...]]` span is classified exactly once, so no rewrite ever
//! sees the output of another.

/// Link found in note text
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum LinkReference<'a> {
    /// `[[Target]]`
    Note {
        /// Raw target, may contain `#` when it has no usable section
        target: &'a str,
    },

    /// `[[Target#Section]]`
    Section {
        /// Everything before the first `#`, never empty
        target: &'a str,
        /// Everything after the first `#`, never empty
        section: &'a str,
    },

    /// `![[Media]]`
    Embed {
        /// Raw media file name as written in the note
        name: &'a str,
    },
}

impl<'a> LinkReference<'a> {
    fn classify(inner: &'a str, embed: bool) -> Self {
        if embed {
            return Self::Embed { name: inner };
        }

        match inner.split_once('#') {
            Some((target, section)) if !target.is_empty() && !section.is_empty() => {
                Self::Section { target, section }
            }
            _ => Self::Note { target: inner },
        }
    }
}

/// Piece of note text produced by [`tokenize`]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Token<'a> {
    /// Text outside of any link, passed through unchanged
    Text(&'a str),

    /// Link span
    Link {
        /// Exact source text of the span, including brackets and `!`
        span: &'a str,
        /// Parsed reference
        link: LinkReference<'a>,
    },
}

impl<'a> Token<'a> {
    /// Source text this token was produced from
    #[must_use]
    pub const fn source(&self) -> &'a str {
        match *self {
            Self::Text(text) | Self::Link { span: text, .. } => text,
        }
    }
}

/// Iterator over [`Token`]s, see [`tokenize`]
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    text: &'a str,
    pos: usize,
}

/// Splits `text` into [`Token`]s
///
/// A link opens with `[[`, holds a non-empty run without `[` or `]` and closes
/// with `]]`. A `!` directly in front makes it an embed. Anything that does
/// not fit (unbalanced or nested brackets) stays plain text.
///
/// Concatenating [`Token::source`] of all tokens gives back `text`.
///
/// # Example
/// ```
/// use obsidian_extract::link::{LinkReference, Token, tokenize};
///
/// let tokens: Vec<_> = tokenize("See [[Physics#Laws]]!").collect();
/// assert_eq!(
///     tokens,
///     vec![
///         Token::Text("See "),
///         Token::Link {
///             span: "[[Physics#Laws]]",
///             link: LinkReference::Section { target: "Physics", section: "Laws" },
///         },
///         Token::Text("!"),
///     ]
/// );
/// ```
#[must_use]
pub const fn tokenize(text: &str) -> Tokens<'_> {
    Tokens { text, pos: 0 }
}

/// Returns the inner text and end offset of a link opened at `open`
fn parse_link_at(text: &str, open: usize) -> Option<(&str, usize)> {
    let start = open + "[[".len();
    let rest = &text[start..];
    let len = rest.find(['[', ']'])?;

    if len == 0 || !rest[len..].starts_with("]]") {
        return None;
    }

    Some((&rest[..len], start + len + "]]".len()))
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let text = self.text;
        if self.pos >= text.len() {
            return None;
        }

        let mut search = self.pos;
        while let Some(found) = text[search..].find("[[") {
            let open = search + found;

            let Some((inner, end)) = parse_link_at(text, open) else {
                search = open + 1;
                continue;
            };

            let embed = open > self.pos && text.as_bytes()[open - 1] == b'!';
            let span_start = if embed { open - 1 } else { open };

            if span_start > self.pos {
                let plain = &text[self.pos..span_start];
                self.pos = span_start;
                return Some(Token::Text(plain));
            }

            self.pos = end;
            return Some(Token::Link {
                span: &text[span_start..end],
                link: LinkReference::classify(inner, embed),
            });
        }

        let plain = &text[self.pos..];
        self.pos = text.len();
        Some(Token::Text(plain))
    }
}

impl std::iter::FusedIterator for Tokens<'_> {}
