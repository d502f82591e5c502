//! Translation call detection.
//!
//! Locates the string-literal argument area of a `tr(...)` call around the
//! cursor on a single line of source text. This span decides both what text
//! is read as the lookup label and what region gets overwritten when a key
//! is chosen, so the rules here are deliberately conservative:
//!
//! - both quote styles (`tr("` / `tr('`) open a call;
//! - a quote directly followed by `,` or `)` closes it (the label may be the
//!   sole argument or be followed by a description argument);
//! - a call whose closing quote does not exist yet is *open* and ends at the
//!   cursor;
//! - calls never span lines.

use std::ops::Range;

/// Marker opening a call: function name up to and including the parenthesis.
const CALL_OPEN: &str = "tr(";

/// A located `tr(...)` call on one line.
///
/// Offsets are byte offsets within the line. `start` sits just after the
/// opening quote; `end` sits on the closing quote for a terminated call, or
/// on the cursor for an open one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranslationCall {
    /// Span start, just after the opening quote.
    start: usize,
    /// Span end, exclusive.
    end: usize,
    /// Whether an end marker was found on the line.
    closed: bool,
}

/// A start marker match: the `tr(` offset and the span start after the quote.
#[derive(Debug, Clone, Copy)]
struct StartMarker {
    /// Offset of the `t` of `tr(`.
    offset: usize,
    /// Offset just after the opening quote.
    text_start: usize,
}

impl TranslationCall {
    /// Locates the call containing or immediately preceding `cursor`.
    ///
    /// With several calls on one line, the last start marker before the
    /// cursor wins. Returns `None` when no start marker sits at or before
    /// the cursor; callers then fall back to the literal selection.
    #[must_use]
    pub fn locate(line: &str, cursor: usize) -> Option<Self> {
        let cursor = clamp_to_char_boundary(line, cursor);

        let mut chosen = find_start_marker(line, 0)?;
        while let Some(next) = find_start_marker(line, chosen.text_start) {
            if next.offset >= cursor {
                break;
            }
            chosen = next;
        }
        if chosen.offset > cursor {
            return None;
        }

        match find_end_marker(line, chosen.text_start) {
            Some(quote) => Some(Self { start: chosen.text_start, end: quote, closed: true }),
            None => Some(Self {
                start: chosen.text_start,
                end: cursor.max(chosen.text_start),
                closed: false,
            }),
        }
    }

    /// Span start offset within the line.
    #[must_use]
    pub const fn start(&self) -> usize {
        self.start
    }

    /// Span end offset within the line (exclusive).
    #[must_use]
    pub const fn end(&self) -> usize {
        self.end
    }

    /// Whether the call has a closing marker on the line.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    /// The detected span as a byte range.
    #[must_use]
    pub const fn span(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Text covered by the span.
    #[must_use]
    pub fn text<'a>(&self, line: &'a str) -> &'a str {
        line.get(self.span()).unwrap_or("")
    }

    /// The label: span text cut at the first `"`, so a span that already
    /// carries `label","description` yields just the label.
    #[must_use]
    pub fn label<'a>(&self, line: &'a str) -> &'a str {
        let text = self.text(line);
        match text.find('"') {
            Some(quote) => text.get(..quote).unwrap_or(text),
            None => text,
        }
    }
}

/// Finds the next `tr(` immediately followed by a quote, at or after `from`.
fn find_start_marker(line: &str, from: usize) -> Option<StartMarker> {
    let mut search = from;
    while let Some(found) = line.get(search..).and_then(|rest| rest.find(CALL_OPEN)) {
        let offset = search + found;
        let quote_at = offset + CALL_OPEN.len();
        match line.as_bytes().get(quote_at) {
            Some(b'"' | b'\'') => {
                return Some(StartMarker { offset, text_start: quote_at + 1 });
            }
            _ => search = quote_at,
        }
    }
    None
}

/// Finds the next quote immediately followed by `,` or `)`, at or after
/// `from`. Returns the offset of the quote itself.
fn find_end_marker(line: &str, from: usize) -> Option<usize> {
    let bytes = line.as_bytes();
    let mut at = from;
    while at + 1 < bytes.len() {
        if matches!(bytes.get(at), Some(b'"' | b'\''))
            && matches!(bytes.get(at + 1), Some(b',' | b')'))
        {
            return Some(at);
        }
        at += 1;
    }
    None
}

/// Clamps an offset to the line length and backs it off a multi-byte
/// code point so slicing stays valid.
fn clamp_to_char_boundary(line: &str, offset: usize) -> usize {
    let mut at = offset.min(line.len());
    while at > 0 && !line.is_char_boundary(at) {
        at -= 1;
    }
    at
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;

    /// `x = tr("hello world")` with the cursor inside the literal.
    #[rstest]
    fn locate_closed_call() {
        let line = r#"x = tr("hello world")"#;

        let call = TranslationCall::locate(line, 10).unwrap();

        assert_that!(call.is_closed(), eq(true));
        assert_that!(call.span(), eq(8..19));
        assert_that!(call.text(line), eq("hello world"));
        assert_that!(call.label(line), eq("hello world"));
    }

    /// Anywhere from the opening quote to the end of the line resolves to
    /// the same span.
    #[rstest]
    #[case::on_opening_quote(7)]
    #[case::after_opening_quote(8)]
    #[case::inside_literal(13)]
    #[case::on_closing_quote(19)]
    #[case::end_of_line(21)]
    fn locate_is_cursor_insensitive_for_single_call(#[case] cursor: usize) {
        let line = r#"x = tr("hello world")"#;

        let call = TranslationCall::locate(line, cursor).unwrap();

        assert_that!(call.span(), eq(8..19));
    }

    /// No closing quote yet: the span is open and ends at the cursor.
    #[rstest]
    fn locate_open_call_ends_at_cursor() {
        let line = r#"x = tr("partial"#;

        let call = TranslationCall::locate(line, line.len()).unwrap();

        assert_that!(call.is_closed(), eq(false));
        assert_that!(call.text(line), eq("partial"));
    }

    #[rstest]
    fn locate_open_call_tracks_cursor_position() {
        let line = r#"x = tr("partial"#;

        let call = TranslationCall::locate(line, 11).unwrap();

        assert_that!(call.text(line), eq("par"));
    }

    /// Two calls on one line: a cursor after the second start marker must
    /// resolve to the second call, never the first.
    #[rstest]
    fn locate_picks_call_nearest_to_cursor() {
        let line = r#"a = tr("first") + tr("second")"#;

        let in_first = TranslationCall::locate(line, 10).unwrap();
        let in_second = TranslationCall::locate(line, 25).unwrap();

        assert_that!(in_first.text(line), eq("first"));
        assert_that!(in_second.text(line), eq("second"));
    }

    /// A cursor before any call start is not inside a call.
    #[rstest]
    #[case::start_of_line(0)]
    #[case::before_marker(3)]
    fn locate_rejects_cursor_before_call(#[case] cursor: usize) {
        let line = r#"a = tr("first")"#;

        assert_that!(TranslationCall::locate(line, cursor), none());
    }

    #[rstest]
    fn locate_rejects_line_without_call() {
        assert_that!(TranslationCall::locate("let x = compute();", 10), none());
    }

    /// `tr(` not followed by a quote is not a start marker.
    #[rstest]
    fn locate_skips_non_literal_call() {
        let line = r#"a = tr(name) + tr("real")"#;

        let call = TranslationCall::locate(line, 22).unwrap();

        assert_that!(call.text(line), eq("real"));
    }

    #[rstest]
    #[case::double_quote_comma(r#"x = tr("label","desc")"#, "label")]
    #[case::double_quote_paren(r#"x = tr("label")"#, "label")]
    #[case::single_quote_comma(r#"x = tr('label','desc')"#, "label")]
    #[case::single_quote_paren(r#"x = tr('label')"#, "label")]
    fn locate_accepts_both_end_marker_variants(#[case] line: &str, #[case] expected: &str) {
        let call = TranslationCall::locate(line, 10).unwrap();

        assert_that!(call.is_closed(), eq(true));
        assert_that!(call.text(line), eq(expected));
    }

    /// An open span scooping up a second argument still yields the bare
    /// label.
    #[rstest]
    fn label_cuts_at_first_double_quote() {
        let call = TranslationCall { start: 0, end: 12, closed: false };

        assert_that!(call.label(r#"label","desc"#), eq("label"));
    }

    /// Cursor on the quote right after `tr(`: the span is empty, not
    /// reversed.
    #[rstest]
    fn locate_clamps_open_span_to_its_start() {
        let line = r#"x = tr("partial"#;

        let call = TranslationCall::locate(line, 7).unwrap();

        assert_that!(call.text(line), eq(""));
    }

    /// Cursor offsets beyond the line or inside a multi-byte character are
    /// clamped instead of panicking.
    #[rstest]
    fn locate_clamps_cursor_into_line() {
        let line = "x = tr(\"héllo";

        let call = TranslationCall::locate(line, 999).unwrap();

        assert_that!(call.text(line), eq("héllo"));
    }

    #[rstest]
    fn locate_is_deterministic() {
        let line = r#"a = tr("first") + tr("second")"#;

        let first = TranslationCall::locate(line, 25);
        let second = TranslationCall::locate(line, 25);

        assert_that!(first, eq(second));
    }
}
