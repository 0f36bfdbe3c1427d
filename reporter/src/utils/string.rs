//! String utility functions

use std::sync::OnceLock;

use regex::Regex;

/// Collapse incidental whitespace in a GraphQL document.
///
/// Trims both ends, turns `\r` and `\n` into spaces, then folds any run of two
/// or more whitespace characters into a single space. Two documents that only
/// differ in formatting collapse to the same string.
pub fn collapse_whitespace(text: &str) -> String {
    static RE_RUNS: OnceLock<Regex> = OnceLock::new();
    let runs = RE_RUNS.get_or_init(|| Regex::new(r"\s{2,}").expect("Invalid regex"));

    let flattened = text.trim().replace('\r', "\n").replace('\n', " ");
    runs.replace_all(&flattened, " ").into_owned()
}

/// Returns `None` for missing or whitespace-only strings
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
