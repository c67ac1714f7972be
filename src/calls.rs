use crate::config::{Config, UnknownCalls};
use crate::error::{CompileError, Result};
use crate::ir::{ReturnKind, Signatures};
use crate::scope::Symbols;
use crate::syntax::{append, indent_at, line_of, project, RE_STATEMENT};
use regex::Regex;
use std::collections::HashMap;
use std::ops::Range;
use std::sync::LazyLock;
use tracing::debug;

static RE_CALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"execTemplate\s+"([^"]+)""#).unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    // Whole statement, braces included. Calls sharing a statement share it.
    pub span: Range<usize>,
    // `execTemplate "name" ARG`
    pub call_span: Range<usize>,
    pub callee: String,
    pub prefix: String,
    pub args: String,
    pub suffix: String,
}

impl CallSite {
    pub fn call(&self) -> String {
        format!("execTemplate \"{}\"{}", self.callee, self.args)
    }

    fn has_context(&self) -> bool {
        !self.prefix.trim().is_empty() || !self.suffix.trim().is_empty()
    }

    // `print (execTemplate ...)` after print rewriting.
    fn is_appended(&self, acc: &str) -> bool {
        self.prefix == format!("{acc} = joinStr \"\\n\" {acc} (") && self.suffix == ")"
    }
}

pub fn call_sites(text: &str) -> Vec<CallSite> {
    let mut sites = Vec::new();
    for caps in RE_STATEMENT.captures_iter(text) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let base = inner.start();
        let inner = inner.as_str();
        let mut cursor = 0;
        while let Some(call) = RE_CALL.captures(&inner[cursor..]) {
            let Some(found) = call.get(0) else { break };
            let start = cursor + found.start();
            let (args, suffix) = split_argument(&inner[cursor + found.end()..]);
            let end = inner.len() - suffix.len();
            sites.push(CallSite {
                span: whole.range(),
                call_span: base + start..base + end,
                callee: call[1].to_string(),
                prefix: inner[..start].to_string(),
                args: args.to_string(),
                suffix: suffix.to_string(),
            });
            cursor = end;
        }
    }
    sites
}

pub fn callees(text: &str) -> Vec<String> {
    call_sites(text).into_iter().map(|site| site.callee).collect()
}

fn split_argument(rest: &str) -> (&str, &str) {
    let trimmed = rest.trim_start();
    let ws = rest.len() - trimmed.len();
    if ws == 0 {
        return ("", rest);
    }
    let len = match trimmed.chars().next() {
        Some('(') => balanced_len(trimmed),
        Some(q @ ('"' | '`')) => quoted_len(trimmed, q),
        Some(c) if c == '$' || c == '.' || c == '-' || c == '_' || c.is_alphanumeric() => trimmed
            .find(|c: char| c.is_whitespace() || c == ')')
            .unwrap_or(trimmed.len()),
        _ => return ("", rest),
    };
    rest.split_at(ws + len)
}

fn balanced_len(s: &str) -> usize {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for (i, c) in s.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' && q == '"' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '`' => quote = Some(c),
            '(' => depth += 1,
            ')' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return i + 1;
                }
            }
            _ => {}
        }
    }
    s.len()
}

fn quoted_len(s: &str, quote: char) -> usize {
    let mut escaped = false;
    for (i, c) in s.char_indices().skip(1) {
        if escaped {
            escaped = false;
        } else if c == '\\' && quote == '"' {
            escaped = true;
        } else if c == quote {
            return i + c.len_utf8();
        }
    }
    s.len()
}

pub fn rewrite_calls(
    text: &str,
    signatures: &Signatures,
    symbols: &Symbols,
    config: &Config,
) -> Result<String> {
    let sites = call_sites(text);

    if config.unknown_calls == UnknownCalls::Error {
        if let Some(site) = sites.iter().find(|s| !signatures.contains_key(&s.callee)) {
            return Err(CompileError::UnknownFunction {
                name: site.callee.clone(),
                line: line_of(text, site.span.start),
            });
        }
    }

    let mut out = text.to_string();
    let statements: Vec<&[CallSite]> = sites.chunk_by(|a, b| a.span == b.span).collect();
    for group in statements.into_iter().rev() {
        if let Some(replacement) = rewrite_statement(text, group, signatures, symbols) {
            out.replace_range(group[0].span.clone(), &replacement);
        }
    }

    Ok(out)
}

fn rewrite_statement(
    text: &str,
    group: &[CallSite],
    signatures: &Signatures,
    symbols: &Symbols,
) -> Option<String> {
    let acc = symbols.accumulator();
    let span = group[0].span.clone();
    let lone = group.len() == 1;

    let mut uses: HashMap<&str, usize> = HashMap::new();
    let mut temporaries = Vec::with_capacity(group.len());
    for site in group {
        let nth = uses.entry(site.callee.as_str()).or_default();
        temporaries.push(symbols.temporary(&site.callee, *nth));
        *nth += 1;
    }

    let mut statement = text[span.clone()].to_string();
    let mut setup: Vec<Vec<String>> = Vec::new();
    let mut keep_statement = true;

    for (site, tmp) in group.iter().zip(&temporaries).rev() {
        let Some(signature) = signatures.get(&site.callee) else {
            debug!(callee = %site.callee, "call to unknown template left as is");
            continue;
        };
        if !signature.produces() {
            continue;
        }
        let call = site.call_span.start - span.start..site.call_span.end - span.start;

        match signature.returns {
            ReturnKind::Implicit => {
                let appended = append(acc, &format!("({})", site.call()));
                if lone && (!site.has_context() || site.is_appended(acc)) {
                    return Some(appended);
                }
                // Such a template hands back no value; its caller sees an empty one.
                debug!(callee = %site.callee, "implicit call inside expression");
                setup.push(vec![appended]);
                statement.replace_range(call, "\"\"");
            }
            ReturnKind::Explicit => {
                setup.push(vec![
                    format!("{{{{{} := {}}}}}", tmp, site.call()),
                    append(acc, &project(tmp, 0)),
                ]);
                statement.replace_range(call, &project(tmp, 1));
                if lone && !site.has_context() {
                    keep_statement = false;
                }
            }
        }
    }

    if setup.is_empty() {
        return None;
    }
    let mut stmts: Vec<String> = setup.into_iter().rev().flatten().collect();
    if keep_statement {
        stmts.push(statement);
    }
    Some(stmts.join(&format!("\n{}", indent_at(text, span.start))))
}
