use lazy_static::lazy_static;
use regex::Regex;

/// Appended to a candidate the user already picked wrongly.
pub const WRONG_MARK: &str = "❌";

lazy_static! {
    static ref WHITESPACE_RE: Regex = Regex::new(r"\s+").unwrap();
    static ref WRONG_MARK_RE: Regex = Regex::new(r"\s*❌+$").unwrap();
}

/// Trims and collapses runs of whitespace into single spaces.
pub fn normalize_text(input: &str) -> String {
    WHITESPACE_RE.replace_all(input.trim(), " ").into_owned()
}

/// Normalizes a tapped candidate, dropping a trailing wrong mark.
pub fn normalize_answer(input: &str) -> String {
    normalize_text(&WRONG_MARK_RE.replace(input.trim(), ""))
}
