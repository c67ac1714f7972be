use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

pub static RE_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{(?:(if|range|try|while|with|define|block)\b|end\}\})").unwrap()
});
pub static RE_PRINT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{print\s+(.*?)\}\}").unwrap());
// Group 1 is absent for a bare return.
pub static RE_RETURN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{return(?:\s+(.*?))?\s*\}\}").unwrap());
pub static RE_STATEMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{(.*?)\}\}").unwrap());

pub const CLOSE: &str = "{{end}}";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    If,
    Range,
    Try,
    While,
    With,
    Define,
    Block,
}

impl Keyword {
    pub fn from_name(name: &str) -> Option<Keyword> {
        match name {
            "if" => Some(Keyword::If),
            "range" => Some(Keyword::Range),
            "try" => Some(Keyword::Try),
            "while" => Some(Keyword::While),
            "with" => Some(Keyword::With),
            "define" => Some(Keyword::Define),
            "block" => Some(Keyword::Block),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::If => "if",
            Keyword::Range => "range",
            Keyword::Try => "try",
            Keyword::While => "while",
            Keyword::With => "with",
            Keyword::Define => "define",
            Keyword::Block => "block",
        }
    }

    pub fn opener_len(self) -> usize {
        2 + self.as_str().len()
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn line_of(text: &str, offset: usize) -> usize {
    let end = offset.min(text.len());
    text.as_bytes()[..end].iter().filter(|b| **b == b'\n').count() + 1
}

pub fn indent_at(text: &str, offset: usize) -> &str {
    let start = text[..offset].rfind('\n').map_or(0, |i| i + 1);
    let line = &text[start..];
    let width = line.len() - line.trim_start_matches([' ', '\t']).len();
    &line[..width]
}

pub fn declare(acc: &str) -> String {
    format!("{{{{{} := \"\"}}}}", acc)
}

pub fn append(acc: &str, expr: &str) -> String {
    format!("{{{{{acc} = joinStr \"\\n\" {acc} {expr}}}}}")
}

pub fn emit(acc: &str) -> String {
    format!("{{{{{}}}}}", acc)
}

pub fn pair(acc: &str, expr: &str) -> String {
    format!("(cslice {} ({}))", acc, expr)
}

pub fn project(tmp: &str, index: usize) -> String {
    format!("(index {} {})", tmp, index)
}
