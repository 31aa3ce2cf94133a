//! Word boundary scanning for word-wise caret jumps.
//!
//! Classification is byte based: any byte at or above 0x80 counts as
//! word-forming, so every non-ASCII codepoint behaves like a letter.

use super::utf8::{next_boundary, prev_boundary};

/// ASCII alphanumeric, `_`, or any non-ASCII byte.
#[inline]
pub fn is_word_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_' || byte >= 0x80
}

/// ASCII whitespace.
#[inline]
pub fn is_space_byte(byte: u8) -> bool {
    byte.is_ascii_whitespace()
}

/// Start of the word (or punctuation run) before `cursor`.
pub fn prev_word_boundary<T: AsRef<[u8]> + ?Sized>(text: &T, cursor: usize) -> usize {
    let bytes = text.as_ref();
    let cursor = cursor.min(bytes.len());
    if cursor == 0 {
        return 0;
    }

    let mut i = prev_boundary(bytes, cursor);
    while i > 0 && is_space_byte(bytes[i]) {
        i = prev_boundary(bytes, i);
    }
    if is_space_byte(bytes[i]) {
        return 0;
    }

    let word = is_word_byte(bytes[i]);
    while i > 0 {
        let p = prev_boundary(bytes, i);
        let b = bytes[p];
        let same_class = if word {
            is_word_byte(b)
        } else {
            !is_word_byte(b) && !is_space_byte(b)
        };
        if !same_class {
            break;
        }
        i = p;
    }
    i
}

/// End of the run starting at `cursor`: a word run if one starts there,
/// otherwise the run of non-word bytes (spaces and punctuation).
pub fn next_word_boundary<T: AsRef<[u8]> + ?Sized>(text: &T, cursor: usize) -> usize {
    let bytes = text.as_ref();
    let len = bytes.len();
    if cursor >= len {
        return len;
    }

    let mut i = cursor;
    let word = is_word_byte(bytes[i]);
    while i < len && is_word_byte(bytes[i]) == word {
        i = next_boundary(bytes, i);
    }
    i
}
