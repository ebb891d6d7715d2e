//! Wrapping and cursor geometry for the InputBox.
//!
//! Wrapping matches ratatui's `Paragraph` closely enough for cursor
//! placement: words break at ASCII spaces, long words are split, and every
//! `\n` starts a new line, including a trailing one.

use std::borrow::Cow;

/// Border (2) + padding (2) consumed horizontally by the bordered block
const HORIZONTAL_OVERHEAD: u16 = 4;
/// Top + bottom borders consumed vertically
pub(super) const VERTICAL_OVERHEAD: u16 = 2;
/// Maximum visible content lines before internal scrolling kicks in
pub(super) const MAX_VISIBLE_LINES: u16 = 5;

pub(super) fn inner_width(width: u16) -> u16 {
    width.saturating_sub(HORIZONTAL_OVERHEAD)
}

fn options(width: u16) -> textwrap::Options<'static> {
    textwrap::Options::new(usize::from(width.max(1)))
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace)
}

/// Wrapped display lines. Always at least one (possibly empty) line.
pub(super) fn wrapped_lines(text: &str, width: u16) -> Vec<String> {
    let opts = options(width);
    let mut out = Vec::new();
    for logical in text.split('\n') {
        if logical.is_empty() {
            out.push(String::new());
            continue;
        }
        out.extend(textwrap::wrap(logical, &opts).into_iter().map(|l| l.into_owned()));
    }
    out
}

/// Row and column of the cursor within the wrapped text.
///
/// The column is measured from where the cursor's wrapped segment starts in
/// the source text, so trailing spaces (which textwrap trims) still count.
pub(super) fn cursor_line_and_column(text: &str, cursor: usize, width: u16) -> (u16, u16) {
    let before = &text[..cursor];
    let (rows_above, current) = match before.rfind('\n') {
        Some(i) => (wrapped_lines(&before[..i], width).len(), &before[i + 1..]),
        None => (0, before),
    };

    let segments = textwrap::wrap(current, &options(width));
    let (row_in_line, column) = match segments.last() {
        None => (0, 0),
        Some(last) => {
            // Lines are borrowed slices of `current`; find where the last one starts
            let offset = match last {
                Cow::Borrowed(s) => (s.as_ptr() as usize).saturating_sub(current.as_ptr() as usize),
                Cow::Owned(_) => 0,
            };
            let column = current.get(offset..).map_or(0, |rest| rest.chars().count());
            (segments.len() - 1, column)
        }
    };

    let row = rows_above + row_in_line;
    (row as u16, column.min(usize::from(u16::MAX)) as u16)
}

pub(super) fn prev_boundary(text: &str, pos: usize) -> usize {
    text[..pos].char_indices().next_back().map_or(0, |(i, _)| i)
}

pub(super) fn next_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .chars()
        .next()
        .map_or(text.len(), |c| pos + c.len_utf8())
}
