//! Line and column helpers.
//!
//! Positions handed to editors count UTF-16 code units, while Rust string
//! slicing works on bytes. Everything that records a column goes through
//! these functions.

/// Number of UTF-16 code units in `s`.
pub fn utf16_len(s: &str) -> u32 {
    s.encode_utf16().count() as u32
}

/// UTF-16 column of the byte offset `byte_index` within `line`.
///
/// Offsets past the end, or inside a multi-byte character, are moved back
/// to the nearest character boundary.
pub fn column_of(line: &str, byte_index: usize) -> u32 {
    let mut index = byte_index.min(line.len());
    while !line.is_char_boundary(index) {
        index -= 1;
    }
    utf16_len(&line[..index])
}

/// Byte offset of the UTF-16 `column` within `line`, clamped to the line end.
pub fn byte_index_of(line: &str, column: u32) -> usize {
    let mut units = 0u32;
    for (index, c) in line.char_indices() {
        if units >= column {
            return index;
        }
        units += c.len_utf16() as u32;
    }
    line.len()
}

/// The zero-based `line` of `text`, without its line terminator.
pub fn line_at(text: &str, line: u32) -> Option<&str> {
    text.split('\n')
        .nth(line as usize)
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
}

/// UTF-16 column of the first non-whitespace character of `line`.
pub fn indentation_column(line: &str) -> u32 {
    column_of(line, line.len() - line.trim_start().len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_columns_match_byte_offsets() {
        assert_eq!(column_of("  foo = bar", 8), 8);
        assert_eq!(byte_index_of("  foo = bar", 8), 8);
    }

    #[test]
    fn astral_characters_count_as_two_units() {
        let line = "a = 😀 b";
        let b = line.find('b').unwrap();
        assert_eq!(column_of(line, b), 7);
        assert_eq!(byte_index_of(line, 7), b);
    }

    #[test]
    fn byte_index_is_clamped() {
        assert_eq!(byte_index_of("abc", 40), 3);
        assert_eq!(column_of("abc", 40), 3);
    }

    #[test]
    fn line_at_strips_carriage_return() {
        let text = "first\r\nsecond\r\n";
        assert_eq!(line_at(text, 0), Some("first"));
        assert_eq!(line_at(text, 1), Some("second"));
        assert_eq!(line_at(text, 5), None);
    }

    #[test]
    fn indentation_counts_tabs_and_spaces() {
        assert_eq!(indentation_column("\t  key = 1"), 3);
        assert_eq!(indentation_column("key = 1"), 0);
    }
}
