//! Line-oriented documents.

use serde::{Deserialize, Serialize};

/// A single line of a source document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineDocument {
    /// Zero-based line index within the source.
    pub index: usize,
    /// Line text without its terminator.
    pub text: Box<str>,
}

/// Split document contents into one record per line.
///
/// Lines end at `\n`, `\r\n`, a lone `\r`, or any of the separators
/// `\x0b`, `\x0c`, `\x1c`..`\x1e`, `U+0085`, `U+2028`, `U+2029`. Empty
/// interior lines are kept so indices match the source file; a trailing
/// terminator does not produce an extra line.
#[must_use]
pub fn split_lines(contents: &str) -> Vec<LineDocument> {
    let mut texts: Vec<&str> = Vec::new();
    let mut start = 0;
    let mut chars = contents.char_indices().peekable();
    while let Some((offset, ch)) = chars.next() {
        if !is_line_terminator(ch) {
            continue;
        }
        texts.push(&contents[start..offset]);
        start = offset + ch.len_utf8();
        if ch == '\r'
            && let Some(&(next, '\n')) = chars.peek()
        {
            chars.next();
            start = next + 1;
        }
    }
    if start < contents.len() {
        texts.push(&contents[start..]);
    }

    texts
        .into_iter()
        .enumerate()
        .map(|(index, text)| LineDocument {
            index,
            text: text.into(),
        })
        .collect()
}

const fn is_line_terminator(ch: char) -> bool {
    matches!(
        ch,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}
