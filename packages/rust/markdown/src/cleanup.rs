//! Post-conversion cleanup passes for Markdown output.
//!
//! Each pass is a function `&str -> String` applied in sequence.

use std::sync::LazyLock;

use regex::Regex;

/// Run the full cleanup pipeline on raw Markdown text.
pub(crate) fn run_pipeline(md: &str) -> String {
    let mut result = md.to_string();

    result = collapse_blank_lines(&result);
    result = strip_trailing_whitespace(&result);
    result = replace_nbsp(&result);

    result.trim().to_string()
}

/// Collapse runs of 3+ newlines into exactly 2 (one blank line).
fn collapse_blank_lines(md: &str) -> String {
    static MULTI_NEWLINE_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid regex"));

    MULTI_NEWLINE_RE.replace_all(md, "\n\n").to_string()
}

/// Strip trailing spaces/tabs before line breaks.
fn strip_trailing_whitespace(md: &str) -> String {
    static TRAILING_WS_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"[ \t]+\n").expect("valid regex"));

    TRAILING_WS_RE.replace_all(md, "\n").to_string()
}

/// Replace non-breaking spaces with ordinary spaces.
fn replace_nbsp(md: &str) -> String {
    md.replace('\u{a0}', " ")
}
