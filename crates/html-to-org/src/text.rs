//! Text processing helpers: whitespace collapsing, line wrapping and the final
//! normalization pass applied to every converted document.

use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

/// Lines inside block quotes are wrapped at this width when wrapping is on.
pub(crate) const MAX_LINE_LENGTH: usize = 74;

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \r\n\t]+").expect("valid regex"));
static TRAILING_SPACES: Lazy<Regex> = Lazy::new(|| Regex::new(r" +\n").expect("valid regex"));
static BLANK_LINE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").expect("valid regex"));

const NBSP: char = '\u{a0}';

/// Is `c` HTML inter-element whitespace?
///
/// Non-breaking spaces are deliberately excluded so they survive collapsing.
pub(crate) const fn is_html_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0c')
}

/// Trim HTML whitespace from both ends, leaving non-breaking spaces intact.
pub(crate) fn trim_html_whitespace(text: &str) -> &str {
    text.trim_matches(is_html_whitespace)
}

/// Collapse every run of spaces, tabs and line breaks into a single space.
pub(crate) fn collapse_whitespace(text: &str) -> Cow<'_, str> {
    WHITESPACE_RUN.replace_all(text, " ")
}

/// Flatten rendered markup onto a single line.
pub(crate) fn flatten(text: &str) -> String {
    trim_html_whitespace(&collapse_whitespace(text)).to_string()
}

/// Reduce every run of three or more newlines to a single blank line.
pub(crate) fn collapse_blank_lines(text: &str) -> Cow<'_, str> {
    BLANK_LINE_RUN.replace_all(text, "\n\n")
}

/// Final cleanup applied to a finished document.
///
/// Strips spaces before line breaks, collapses blank-line runs, maps
/// non-breaking spaces to ordinary spaces and trims the document edges.
pub(crate) fn normalize_output(text: &str) -> String {
    let stripped = TRAILING_SPACES.replace_all(text, "\n");
    let collapsed = collapse_blank_lines(&stripped);
    let mapped = collapsed.replace(NBSP, " ");
    mapped.trim().to_string()
}

/// Split `data` into pieces so that no line grows past `width` characters.
///
/// `existing` is the number of characters already on the current output line.
/// Breaks happen on whitespace where possible; a word longer than the width is
/// kept whole and the break moves forward to the next whitespace. Every piece
/// except the last ends with a newline.
pub(crate) fn wrap_to_width(data: &str, existing: usize, width: usize) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut existing = existing;

    for segment in data.split_inclusive('\n') {
        let (body, newline) = match segment.strip_suffix('\n') {
            Some(body) => (body, true),
            None => (segment, false),
        };
        let mut chars: Vec<char> = body.chars().collect();

        if existing >= width && !chars.is_empty() {
            pieces.push("\n".to_string());
            existing = 0;
        }

        while !chars.is_empty() && chars.len() + existing > width {
            let limit = width - existing;
            let split = (0..=limit)
                .rev()
                .find(|&i| chars[i].is_whitespace())
                .or_else(|| (limit..chars.len()).find(|&i| chars[i].is_whitespace()))
                .unwrap_or(chars.len());

            let mut line: String = chars[..split].iter().collect();
            line.push('\n');
            pieces.push(line);

            let mut rest = split;
            while rest < chars.len() && chars[rest].is_whitespace() {
                rest += 1;
            }
            chars.drain(..rest);
            existing = 0;
        }

        let mut tail: String = chars.iter().collect();
        if newline {
            tail.push('\n');
            existing = 0;
        } else {
            existing += chars.len();
        }
        if !tail.is_empty() {
            pieces.push(tail);
        }
    }

    pieces
}
