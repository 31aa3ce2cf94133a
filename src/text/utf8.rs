//! Codepoint boundary navigation over UTF-8 byte strings.
//!
//! All functions work on raw bytes, so they stay in bounds even when handed
//! malformed input (stray continuation bytes are simply walked past).

use std::borrow::Cow;

#[inline]
fn is_continuation(byte: u8) -> bool {
    (byte & 0xC0) == 0x80
}

/// Previous codepoint boundary strictly before `index`.
///
/// Returns 0 when `index` is 0. An `index` past the end is treated as the end.
///
/// ```
/// use textedit::text::prev_boundary;
///
/// let s = "a€b"; // '€' is 3 bytes
/// assert_eq!(prev_boundary(s, 5), 4);
/// assert_eq!(prev_boundary(s, 4), 1);
/// assert_eq!(prev_boundary(s, 1), 0);
/// assert_eq!(prev_boundary(s, 0), 0);
/// ```
pub fn prev_boundary<T: AsRef<[u8]> + ?Sized>(text: &T, index: usize) -> usize {
    let bytes = text.as_ref();
    let mut i = index.min(bytes.len());
    if i == 0 {
        return 0;
    }
    i -= 1;
    while i > 0 && is_continuation(bytes[i]) {
        i -= 1;
    }
    i
}

/// Next codepoint boundary strictly after `index`, or the length at the end.
///
/// ```
/// use textedit::text::next_boundary;
///
/// let s = "a€b";
/// assert_eq!(next_boundary(s, 0), 1);
/// assert_eq!(next_boundary(s, 1), 4);
/// assert_eq!(next_boundary(s, 5), 5);
/// ```
pub fn next_boundary<T: AsRef<[u8]> + ?Sized>(text: &T, index: usize) -> usize {
    let bytes = text.as_ref();
    let len = bytes.len();
    if index >= len {
        return len;
    }
    let mut i = index + 1;
    while i < len && is_continuation(bytes[i]) {
        i += 1;
    }
    i
}

/// Clamp an arbitrary byte index into `0..=len` and back onto a boundary.
///
/// A mid-sequence index moves backwards to the start of its codepoint.
pub fn clamp_to_boundary<T: AsRef<[u8]> + ?Sized>(text: &T, index: usize) -> usize {
    let bytes = text.as_ref();
    let mut i = index.min(bytes.len());
    while i > 0 && i < bytes.len() && is_continuation(bytes[i]) {
        i -= 1;
    }
    i
}

/// Whether `index` sits on a codepoint boundary (0 and `len` included).
pub fn is_boundary<T: AsRef<[u8]> + ?Sized>(text: &T, index: usize) -> bool {
    let bytes = text.as_ref();
    match bytes.get(index) {
        Some(&b) => !is_continuation(b),
        None => index == bytes.len(),
    }
}

/// Every caret position in `text`, from 0 through `len` inclusive.
pub fn boundaries<T: AsRef<[u8]> + ?Sized>(text: &T) -> Vec<usize> {
    let bytes = text.as_ref();
    let mut out = Vec::with_capacity(bytes.len() + 1);
    let mut i = 0;
    out.push(0);
    while i < bytes.len() {
        i = next_boundary(bytes, i);
        out.push(i);
    }
    out
}

/// Number of codepoints in `text[..offset]`.
pub(crate) fn char_count_to(text: &str, offset: usize) -> usize {
    let offset = clamp_to_boundary(text, offset);
    text[..offset].chars().count()
}

/// Byte offset of the `n`-th codepoint, or the length when `n` runs past the end.
pub(crate) fn byte_offset_of_char(text: &str, n: usize) -> usize {
    text.char_indices()
        .nth(n)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

/// Strip CR and LF for single-line input.
pub fn filter_single_line(s: &str) -> Cow<'_, str> {
    if !s.contains('\n') && !s.contains('\r') {
        return Cow::Borrowed(s);
    }
    Cow::Owned(s.chars().filter(|c| *c != '\n' && *c != '\r').collect())
}

/// Normalize CRLF and lone CR to LF.
pub fn normalize_newlines(s: &str) -> Cow<'_, str> {
    if !s.contains('\r') {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut it = s.chars().peekable();
    while let Some(ch) = it.next() {
        match ch {
            '\r' => {
                if it.peek() == Some(&'\n') {
                    let _ = it.next();
                }
                out.push('\n');
            }
            _ => out.push(ch),
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIXED: &[u8] = b"a\xC3\xA9b\xE2\x82\xACc";

    #[test]
    fn test_forward_walk_visits_every_boundary() {
        let mut seen = vec![0];
        let mut i = 0;
        while i < MIXED.len() {
            i = next_boundary(MIXED, i);
            seen.push(i);
        }
        assert_eq!(seen, vec![0, 1, 3, 4, 7, 8]);
    }

    #[test]
    fn test_backward_walk_visits_every_boundary() {
        let mut seen = vec![MIXED.len()];
        let mut i = MIXED.len();
        while i > 0 {
            i = prev_boundary(MIXED, i);
            seen.push(i);
        }
        assert_eq!(seen, vec![8, 7, 4, 3, 1, 0]);
    }

    #[test]
    fn test_round_trip_lands_on_boundaries() {
        let s = "héllo wörld €";
        for i in 0..=s.len() {
            let back = next_boundary(s, prev_boundary(s, i));
            let fwd = prev_boundary(s, next_boundary(s, i));
            assert!(s.is_char_boundary(back), "offset {back} from {i}");
            assert!(s.is_char_boundary(fwd), "offset {fwd} from {i}");
            if i > 0 {
                assert!(prev_boundary(s, i) < i);
            }
            if i < s.len() {
                assert!(next_boundary(s, i) > i);
            }
        }
    }

    #[test]
    fn test_malformed_input_stays_in_bounds() {
        let bytes: &[u8] = &[0x80, 0x80, b'a', 0xBF];
        assert_eq!(prev_boundary(bytes, 2), 0);
        assert_eq!(next_boundary(bytes, 0), 2);
        assert_eq!(next_boundary(bytes, 2), 4);
        assert_eq!(prev_boundary(bytes, 100), 2);
        assert_eq!(next_boundary(bytes, 100), 4);
    }

    #[test]
    fn test_clamp_to_boundary() {
        let s = "a€b";
        assert_eq!(clamp_to_boundary(s, 0), 0);
        assert_eq!(clamp_to_boundary(s, 2), 1);
        assert_eq!(clamp_to_boundary(s, 3), 1);
        assert_eq!(clamp_to_boundary(s, 4), 4);
        assert_eq!(clamp_to_boundary(s, 100), 5);
    }

    #[test]
    fn test_boundaries_list() {
        assert_eq!(boundaries(""), vec![0]);
        assert_eq!(boundaries("a€b"), vec![0, 1, 4, 5]);
        assert!(is_boundary("a€b", 5));
        assert!(!is_boundary("a€b", 2));
        assert!(!is_boundary("a€b", 6));
    }

    #[test]
    fn test_char_offsets() {
        let s = "aé€";
        assert_eq!(char_count_to(s, 3), 2);
        assert_eq!(char_count_to(s, 2), 1);
        assert_eq!(byte_offset_of_char(s, 2), 3);
        assert_eq!(byte_offset_of_char(s, 9), s.len());
    }

    #[test]
    fn test_newline_filters() {
        assert_eq!(filter_single_line("hello"), "hello");
        assert_eq!(filter_single_line("a\r\nb\nc"), "abc");
        assert_eq!(normalize_newlines("a\r\nb\rc"), "a\nb\nc");
        assert!(matches!(normalize_newlines("plain\n"), Cow::Borrowed(_)));
    }
}
