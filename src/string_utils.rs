//! UTF-8 Safe String Utilities
//!
//! Cursor positions arrive from the host surface as raw byte offsets, which
//! may fall in the middle of a multi-byte character (`ø`, `中`, `🎉`).
//! Slicing at such an offset panics, so every command and decoration engine
//! clamps offsets through this module first.
//!
//! Also hosts the line-geometry helpers (line range at a position, line
//! starts for a span) shared by the shortcut commands and the presentation
//! engine.

// ─────────────────────────────────────────────────────────────────────────────
// Character Boundary Functions
// ─────────────────────────────────────────────────────────────────────────────

/// Returns the largest index that is less than or equal to `index`
/// and is on a UTF-8 character boundary.
///
/// If `index` is greater than the string length, returns the string length.
#[inline]
pub fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }

    let bytes = s.as_bytes();
    let mut i = index;
    while i > 0 && !is_utf8_char_start(bytes[i]) {
        i -= 1;
    }
    i
}

/// Returns the smallest index that is greater than or equal to `index`
/// and is on a UTF-8 character boundary.
///
/// If `index` is greater than or equal to the string length, returns the
/// string length.
#[inline]
pub fn ceil_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }

    let bytes = s.as_bytes();
    let mut i = index;
    while i < bytes.len() && !is_utf8_char_start(bytes[i]) {
        i += 1;
    }
    i
}

/// Check if a byte is the start of a UTF-8 character
/// (anything but a continuation byte `10xxxxxx`).
#[inline]
fn is_utf8_char_start(byte: u8) -> bool {
    (byte & 0b1100_0000) != 0b1000_0000
}

/// Safely slice a string from `start` to `end`, adjusting both indices to
/// valid UTF-8 character boundaries. Returns an empty string if the
/// adjusted range is empty or inverted.
#[inline]
pub fn safe_slice(s: &str, start: usize, end: usize) -> &str {
    let start = floor_char_boundary(s, start);
    let end = ceil_char_boundary(s, end);

    if start >= end {
        return "";
    }

    &s[start..end]
}

// ─────────────────────────────────────────────────────────────────────────────
// Line Geometry
// ─────────────────────────────────────────────────────────────────────────────

/// The byte range `[start, end)` of the line containing `position`,
/// excluding the trailing newline. `position` is clamped to the text.
pub fn line_range_at(text: &str, position: usize) -> (usize, usize) {
    let position = floor_char_boundary(text, position.min(text.len()));
    let start = text[..position].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let end = text[position..]
        .find('\n')
        .map(|i| position + i)
        .unwrap_or(text.len());
    (start, end)
}

/// Byte offsets of every line start within `[from, to)`, beginning with the
/// start of the line containing `from`.
pub fn line_starts_in(text: &str, from: usize, to: usize) -> Vec<usize> {
    let from = floor_char_boundary(text, from.min(text.len()));
    let to = ceil_char_boundary(text, to.min(text.len()));

    let (first, _) = line_range_at(text, from);
    let mut starts = vec![first];
    for (i, b) in text.as_bytes()[first..to].iter().enumerate() {
        if *b == b'\n' {
            let next = first + i + 1;
            if next < to {
                starts.push(next);
            }
        }
    }
    starts
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_boundary_ascii_and_multibyte() {
        let s = "Hei på deg"; // 'å' occupies bytes 5-6
        assert_eq!(floor_char_boundary(s, 0), 0);
        assert_eq!(floor_char_boundary(s, 5), 5);
        assert_eq!(floor_char_boundary(s, 6), 5); // mid-'å' floors to its start
        assert_eq!(floor_char_boundary(s, 100), s.len());
    }

    #[test]
    fn test_ceil_boundary_multibyte() {
        let s = "Hei på deg";
        assert_eq!(ceil_char_boundary(s, 5), 5);
        assert_eq!(ceil_char_boundary(s, 6), 7); // mid-'å' ceils past it
        assert_eq!(ceil_char_boundary(s, 100), s.len());
    }

    #[test]
    fn test_safe_slice() {
        let s = "Hello 世界!";
        assert_eq!(safe_slice(s, 0, 5), "Hello");
        assert_eq!(safe_slice(s, 6, 12), "世界");
        assert_eq!(safe_slice(s, 3, 2), "");
    }

    #[test]
    fn test_line_range_at() {
        let text = "first\nsecond\nthird";
        assert_eq!(line_range_at(text, 0), (0, 5));
        assert_eq!(line_range_at(text, 5), (0, 5));
        assert_eq!(line_range_at(text, 6), (6, 12));
        assert_eq!(line_range_at(text, text.len()), (13, 18));
    }

    #[test]
    fn test_line_range_single_line() {
        assert_eq!(line_range_at("only", 2), (0, 4));
        assert_eq!(line_range_at("", 0), (0, 0));
    }

    #[test]
    fn test_line_starts_in() {
        let text = "```rust\nfn main() {}\n```";
        assert_eq!(line_starts_in(text, 0, text.len()), vec![0, 8, 21]);
        assert_eq!(line_starts_in(text, 3, 7), vec![0]);
    }

    #[test]
    fn test_no_panic_on_any_byte_index() {
        let s = "Hei på 世界 🎉 end";
        for i in 0..=s.len() + 4 {
            let _ = floor_char_boundary(s, i);
            let _ = ceil_char_boundary(s, i);
            let _ = line_range_at(s, i);
            for j in 0..=s.len() + 4 {
                let _ = safe_slice(s, i, j);
            }
        }
    }
}
