use regex::{Captures, Regex};
use std::sync::LazyLock;

static RE_COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").unwrap());
static RE_WRAPPED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*\{\{.*\}\}\s*$").unwrap());

// Line breaks inside a comment survive so later line numbers still match the input.
pub fn strip_comments(text: &str) -> String {
    RE_COMMENT
        .replace_all(text, |caps: &Captures| caps[0].matches('\n').collect::<String>())
        .to_string()
}

pub fn wrap_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 4);
    for line in text.lines() {
        let body = line.trim();
        if body.is_empty() || RE_WRAPPED.is_match(line) {
            out.push_str(line);
        } else {
            let indent = &line[..line.len() - line.trim_start().len()];
            out.push_str(&format!("{}{{{{{}}}}}", indent, body));
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_inline_comment() {
        assert_eq!(strip_comments("a /* note */ b"), "a  b");
    }

    #[test]
    fn test_strip_comments_shortest_match() {
        assert_eq!(strip_comments("/* one */x/* two */"), "x");
    }

    #[test]
    fn test_strip_multiline_comment() {
        assert_eq!(strip_comments("a\n/* one\ntwo */\nb"), "a\n\n\nb");
    }

    #[test]
    fn test_wrap_preserves_indentation() {
        let result = wrap_lines("if $x\n    print \"hi\"\nend\n");
        assert_eq!(result, "{{if $x}}\n    {{print \"hi\"}}\n{{end}}\n");
    }

    #[test]
    fn test_wrap_trims_trailing_whitespace() {
        assert_eq!(wrap_lines("print 1   \t"), "{{print 1}}\n");
    }

    #[test]
    fn test_blank_lines_untouched() {
        assert_eq!(wrap_lines("a\n\n   \nb\n"), "{{a}}\n\n   \n{{b}}\n");
    }

    #[test]
    fn test_wrapped_lines_untouched() {
        assert_eq!(wrap_lines("  {{if $x}}  \n"), "  {{if $x}}  \n");
    }

    #[test]
    fn test_crlf_normalization() {
        assert_eq!(wrap_lines("a\r\nb\r\n"), "{{a}}\n{{b}}\n");
    }

    #[test]
    fn test_wrap_is_idempotent() {
        let inputs = [
            "define \"f\"\n  print 1\nend\n\nexecTemplate \"f\"\n",
            "  if $a  \n\t\n{{end}}",
            "",
            "x",
        ];
        for input in inputs {
            let once = wrap_lines(input);
            assert_eq!(wrap_lines(&once), once, "input: {:?}", input);
        }
    }

    #[test]
    fn test_stripped_comment_keeps_line_count() {
        let text = "/* a\nb\nc */\n{{$x := 1}}\n";
        let stripped = strip_comments(text);
        assert_eq!(stripped, "\n\n\n{{$x := 1}}\n");
        assert_eq!(stripped.lines().count(), text.lines().count());
    }

    #[test]
    fn test_wrap_long_line() {
        let line = format!("a{}b", " ".repeat(3000));
        let out = wrap_lines(&line);
        assert!(out.starts_with("{{a"));
        assert!(out.ends_with("b}}\n"));
    }
}
