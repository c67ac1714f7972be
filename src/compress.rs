use crate::syntax::RE_PRINT;
use regex::Regex;
use std::sync::LazyLock;

static RE_BETWEEN_MARKERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\}\}\s*\{\{").unwrap());

pub fn strip_print(text: &str) -> String {
    RE_PRINT.replace_all(text, "{{${1}}}").to_string()
}

pub fn compact(text: &str) -> String {
    let text = RE_BETWEEN_MARKERS.replace_all(text, "}}{{");
    text.trim_end().to_string()
}
