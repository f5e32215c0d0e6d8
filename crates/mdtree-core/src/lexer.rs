//! Line splitting for callers holding a single input string.
//!
//! The parser itself works on an already-split line sequence. This module
//! is the convenience front door: it cuts a `&str` into borrowed lines with
//! `memchr` (SIMD on supported platforms), stripping `\n` and a preceding `\r`.

use memchr::memchr;

/// Iterator over the lines of an input string, terminators stripped.
///
/// Unlike [`str::lines`], a trailing newline does not produce an extra
/// empty line, and a lone `\r` in the middle of a line is preserved.
pub struct Lexer<'a> {
    input: &'a str,
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input.
    #[inline]
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            bytes: input.as_bytes(),
            offset: 0,
        }
    }

    /// Check if all input has been consumed.
    #[inline(always)]
    pub fn is_eof(&self) -> bool {
        self.offset >= self.bytes.len()
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.is_eof() {
            return None;
        }

        let start = self.offset;
        let end = match memchr(b'\n', &self.bytes[start..]) {
            Some(pos) => start + pos,
            None => self.bytes.len(),
        };

        let text_end = if end > start && self.bytes[end - 1] == b'\r' {
            end - 1
        } else {
            end
        };

        self.offset = if end < self.bytes.len() { end + 1 } else { end };

        Some(&self.input[start..text_end])
    }
}

/// Split `input` into lines with terminators stripped.
#[inline]
pub fn split_lines(input: &str) -> Vec<&str> {
    Lexer::new(input).collect()
}

/// Check if a line contains only spaces and tabs.
#[inline(always)]
pub fn is_blank(line: &str) -> bool {
    line.bytes().all(|b| b == b' ' || b == b'\t')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_lf_and_crlf() {
        assert_eq!(split_lines("a\r\nb\nc"), vec!["a", "b", "c"]);
    }

    #[test]
    fn trailing_newline_adds_no_line() {
        assert_eq!(split_lines("a\n"), vec!["a"]);
        assert_eq!(split_lines("a\n\n"), vec!["a", ""]);
    }

    #[test]
    fn empty_input_has_no_lines() {
        assert!(split_lines("").is_empty());
    }

    #[test]
    fn blank_detection() {
        assert!(is_blank(""));
        assert!(is_blank(" \t "));
        assert!(!is_blank("  x"));
    }
}
