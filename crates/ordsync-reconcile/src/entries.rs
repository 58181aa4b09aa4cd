//! Entry splitting shared by the mapping text and the record export.
//!
//! Both inputs are "one entry per line", but the line break arrives in
//! several shapes depending on who produced the text:
//!
//! - real line breaks (`\n`, `\r\n`, `\r`)
//! - the literal HTML break `<br>` left behind by the legacy export
//! - the literal two-character escape `\n` (backslash, `n`), optionally
//!   preceded by `\r`
//!
//! All of them are treated as the same separator. Each yielded entry is
//! trimmed; empty entries are yielded too and the caller decides what an
//! empty entry means.

/// Longest first so `\r\n` is never split into two breaks.
const SEPARATORS: &[&str] = &["<br>", "\\r\\n", "\\n", "\r\n", "\n", "\r"];

/// Lazily split `text` into trimmed entries.
pub fn split_entries(text: &str) -> Entries<'_> {
    Entries { rest: Some(text) }
}

/// Iterator returned by [`split_entries`].
#[derive(Debug, Clone)]
pub struct Entries<'a> {
    rest: Option<&'a str>,
}

impl<'a> Iterator for Entries<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let rest = self.rest?;
        match find_separator(rest) {
            Some((at, len)) => {
                self.rest = Some(&rest[at + len..]);
                Some(rest[..at].trim())
            }
            None => {
                self.rest = None;
                Some(rest.trim())
            }
        }
    }
}

/// Byte offset and length of the first separator in `s`.
fn find_separator(s: &str) -> Option<(usize, usize)> {
    for (i, _) in s.char_indices() {
        let tail = &s[i..];
        if let Some(sep) = SEPARATORS.iter().find(|sep| tail.starts_with(**sep)) {
            return Some((i, sep.len()));
        }
    }
    None
}
