//! In-memory text document tracked through full-content synchronization.

use crate::types::{
    SourcePosition,
    SourceRange,
};

/// A text buffer mirroring one open document in the host editor.
///
/// Positions use 0-indexed lines and byte offsets within the line. All
/// lookups are bounds-checked; an out-of-range position yields `None`
/// rather than a panic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    /// Full document text.
    text: String,
}

impl Document {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replaces the entire content (full text synchronization).
    pub fn set_text(&mut self, text: String) {
        self.text = text;
    }

    /// Returns the content of a line, without its line terminator.
    #[must_use]
    pub fn line(&self, line: u32) -> Option<&str> {
        self.text
            .split('\n')
            .nth(line as usize)
            .map(|content| content.strip_suffix('\r').unwrap_or(content))
    }

    /// Returns the text covered by `range`, or `None` if the range does not
    /// resolve to valid offsets in this buffer.
    #[must_use]
    pub fn slice(&self, range: SourceRange) -> Option<&str> {
        let start = self.offset_of(range.start)?;
        let end = self.offset_of(range.end)?;
        self.text.get(start..end)
    }

    /// Overwrites exactly the region covered by `range` with `replacement`.
    ///
    /// Returns `false` (leaving the buffer untouched) when the range does not
    /// resolve to a valid forward region.
    pub fn replace(&mut self, range: SourceRange, replacement: &str) -> bool {
        let Some(start) = self.offset_of(range.start) else {
            return false;
        };
        let Some(end) = self.offset_of(range.end) else {
            return false;
        };
        if start > end || !self.text.is_char_boundary(start) || !self.text.is_char_boundary(end) {
            return false;
        }
        self.text.replace_range(start..end, replacement);
        true
    }

    /// Converts a position into a byte offset into the full text.
    ///
    /// The character offset is clamped to the line content length, matching
    /// how editors treat a caret past the end of a line.
    fn offset_of(&self, position: SourcePosition) -> Option<usize> {
        let mut offset = 0usize;
        for (index, raw_line) in self.text.split('\n').enumerate() {
            if index == position.line as usize {
                let content = raw_line.strip_suffix('\r').unwrap_or(raw_line);
                return Some(offset + (position.character as usize).min(content.len()));
            }
            offset += raw_line.len() + 1;
        }
        None
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::first(0, Some("let a = 1;"))]
    #[case::middle(1, Some("let b = tr(\"hello\");"))]
    #[case::last(2, Some(""))]
    #[case::out_of_range(3, None)]
    fn test_line(#[case] line: u32, #[case] expected: Option<&str>) {
        let document = Document::new("let a = 1;\nlet b = tr(\"hello\");\n");

        assert_that!(document.line(line), eq(expected));
    }

    #[rstest]
    fn test_line_strips_carriage_return() {
        let document = Document::new("first\r\nsecond\r\n");

        assert_that!(document.line(0), eq(Some("first")));
        assert_that!(document.line(1), eq(Some("second")));
    }

    #[rstest]
    fn test_slice_single_line() {
        let document = Document::new("let b = tr(\"hello\");\n");

        let text = document.slice(SourceRange::single_line(0, 12, 17));

        assert_that!(text, eq(Some("hello")));
    }

    #[rstest]
    fn test_slice_across_lines() {
        let document = Document::new("abc\ndef\n");

        let range = SourceRange::new(
            SourcePosition { line: 0, character: 2 },
            SourcePosition { line: 1, character: 1 },
        );

        assert_that!(document.slice(range), eq(Some("c\nd")));
    }

    #[rstest]
    fn test_slice_clamps_character_to_line_length() {
        let document = Document::new("abc\n");

        let text = document.slice(SourceRange::single_line(0, 1, 99));

        assert_that!(text, eq(Some("bc")));
    }

    #[rstest]
    fn test_replace_overwrites_only_the_region() {
        let mut document = Document::new("x = tr(\"hello world\")\ny = 2\n");

        let replaced = document.replace(SourceRange::single_line(0, 8, 19), "greeting");

        assert_that!(replaced, eq(true));
        assert_that!(document.text(), eq("x = tr(\"greeting\")\ny = 2\n"));
    }

    #[rstest]
    fn test_replace_rejects_missing_line() {
        let mut document = Document::new("only line\n");
        let before = document.clone();

        let replaced = document.replace(SourceRange::single_line(5, 0, 3), "x");

        assert_that!(replaced, eq(false));
        assert_that!(document, eq(before));
    }

    #[rstest]
    fn test_set_text_replaces_everything() {
        let mut document = Document::new("old");
        document.set_text("new content".to_string());

        assert_that!(document.text(), eq("new content"));
    }
}
