use std::sync::LazyLock;

use regex::Regex;

static PAGE_NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^\s*\d+\s*$").unwrap());
static HYPHEN_BREAK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([\p{Alphabetic}\p{Nd}])-\n([\p{Alphabetic}\p{Nd}])").unwrap());
static BLANK_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

/// Clean raw extractor output: unify line endings, drop page-number lines,
/// rejoin words hyphenated across a line break, squeeze blank-line runs.
pub fn normalize_text(raw: &str) -> String {
    let s = raw.replace("\r\n", "\n").replace('\r', "\n");
    let mut s = PAGE_NUMBER_RE.replace_all(&s, "").into_owned();
    // a one-letter fragment ("x-\ny-\nz") is shared by two matches, so repeat
    while HYPHEN_BREAK_RE.is_match(&s) {
        s = HYPHEN_BREAK_RE.replace_all(&s, "${1}${2}").into_owned();
    }
    BLANK_RUN_RE.replace_all(&s, "\n\n").into_owned()
}
