use crate::blocks::{block_end, Frame};
use crate::calls::callees;
use crate::error::Result;
use crate::ir::{Extracted, FunctionDef, FunctionTable, OutputKind, ReturnKind, Signature};
use crate::syntax::{line_of, Keyword, RE_PRINT, RE_RETURN};
use indexmap::map::Entry;
use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;
use tracing::{debug, warn};

static RE_DEFINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\{\{define\s+"([^"]+)"\s*\}\}"#).unwrap());

pub fn extract_functions(text: &str) -> Result<Extracted> {
    let mut functions = FunctionTable::new();
    let mut spans: Vec<Range<usize>> = Vec::new();
    let mut pos = 0;

    while let Some(caps) = RE_DEFINE.captures(&text[pos..]) {
        let Some(whole) = caps.get(0) else { break };
        let start = pos + whole.start();
        let name = caps[1].to_string();
        let opener = Frame {
            keyword: Keyword::Define,
            start,
        };
        let end = block_end(text, opener, start + Keyword::Define.opener_len())?;
        let body = &text[start..end];
        let line = line_of(text, start);

        match functions.entry(name) {
            Entry::Occupied(entry) => {
                warn!(
                    name = %entry.key(),
                    line,
                    first = entry.get().line,
                    "duplicate template definition dropped"
                );
            }
            Entry::Vacant(entry) => {
                let signature = classify(body);
                let name = entry.key().clone();
                debug!(name = %name, line, ?signature, "extracted template");
                entry.insert(FunctionDef {
                    name,
                    text: body.to_string(),
                    line,
                    signature,
                });
            }
        }

        let removed_end = if text[end..].starts_with('\n') { end + 1 } else { end };
        spans.push(start..removed_end);
        pos = end;
    }

    promote_callers(&mut functions);

    let mut main = text.to_string();
    for span in spans.into_iter().rev() {
        main.replace_range(span, "");
    }

    Ok(Extracted { main, functions })
}

pub fn classify(body: &str) -> Signature {
    let output = if RE_PRINT.is_match(body) {
        OutputKind::Produces
    } else {
        OutputKind::Pure
    };
    let returns = if RE_RETURN
        .captures_iter(body)
        .any(|caps| caps.get(1).is_some_and(|m| !m.as_str().is_empty()))
    {
        ReturnKind::Explicit
    } else {
        ReturnKind::Implicit
    };
    Signature { output, returns }
}

// A template that calls an output-producing template produces output too.
fn promote_callers(functions: &mut FunctionTable) {
    let calls: Vec<(String, Vec<String>)> = functions
        .values()
        .map(|def| (def.name.clone(), callees(&def.text)))
        .collect();

    loop {
        let mut changed = false;
        for (name, targets) in &calls {
            let produces = targets
                .iter()
                .any(|t| functions.get(t).is_some_and(|d| d.signature.produces()));
            if let Some(def) = functions.get_mut(name) {
                if produces && !def.signature.produces() {
                    debug!(name = %name, "template promoted to output-producing");
                    def.signature.output = OutputKind::Produces;
                    changed = true;
                }
            }
        }
        if !changed {
            break;
        }
    }
}
