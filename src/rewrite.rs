use crate::calls::rewrite_calls;
use crate::config::Config;
use crate::error::Result;
use crate::ir::{signatures, FunctionDef, FunctionTable, Signatures};
use crate::scope::Symbols;
use crate::syntax::{append, declare, emit, pair, CLOSE, RE_PRINT, RE_RETURN};
use regex::Captures;
use tracing::debug;

pub fn rewrite_prints(text: &str, acc: &str) -> String {
    RE_PRINT
        .replace_all(text, |caps: &Captures| append(acc, &caps[1]))
        .to_string()
}

// Valued returns hand back `(text, value)`, bare returns hand back the text.
pub fn normalize_returns(text: &str, acc: &str) -> String {
    RE_RETURN
        .replace_all(text, |caps: &Captures| {
            match caps.get(1).map(|m| m.as_str()).filter(|e| !e.is_empty()) {
                Some(expr) => format!("{{{{return {}}}}}", pair(acc, expr)),
                None => format!("{{{{return {}}}}}", acc),
            }
        })
        .to_string()
}

fn declare_accumulator(text: &str, acc: &str, indent: &str) -> String {
    match text.find("}}") {
        Some(i) => {
            let (head, tail) = text.split_at(i + 2);
            format!("{}\n{}{}{}", head, indent, declare(acc), tail)
        }
        None => text.to_string(),
    }
}

fn ensure_return(text: &str, indent: &str) -> String {
    if RE_RETURN.is_match(text) {
        return text.to_string();
    }
    let Some(close) = text.rfind(CLOSE) else {
        return text.to_string();
    };
    let line_start = text[..close].rfind('\n').map_or(0, |i| i + 1);
    let mut out = text.to_string();
    if text[line_start..close].trim().is_empty() {
        out.insert_str(line_start, &format!("{}{{{{return}}}}\n", indent));
    } else {
        out.insert_str(close, "{{return}}");
    }
    out
}

pub fn rewrite_function(
    def: &mut FunctionDef,
    signatures: &Signatures,
    symbols: &Symbols,
    config: &Config,
) -> Result<()> {
    if !def.signature.produces() {
        // Only unknown-call checking applies; calls from a pure template
        // never target an output-producing one.
        def.text = rewrite_calls(&def.text, signatures, symbols, config)?;
        return Ok(());
    }

    let acc = symbols.accumulator();
    let text = declare_accumulator(&def.text, acc, &config.indent);
    let text = rewrite_prints(&text, acc);
    let text = ensure_return(&text, &config.indent);
    let text = rewrite_calls(&text, signatures, symbols, config)?;
    def.text = normalize_returns(&text, acc);

    debug!(name = %def.name, "rewrote output-producing template");
    Ok(())
}

pub fn rewrite_functions(
    functions: &mut FunctionTable,
    symbols: &Symbols,
    config: &Config,
) -> Result<()> {
    let signatures = signatures(functions);
    for def in functions.values_mut() {
        rewrite_function(def, &signatures, symbols, config)?;
    }
    Ok(())
}

pub fn rewrite_main(
    main: &str,
    signatures: &Signatures,
    symbols: &Symbols,
    config: &Config,
) -> Result<String> {
    let acc = symbols.accumulator();
    let body = rewrite_prints(main, acc);
    let body = rewrite_calls(&body, signatures, symbols, config)?;

    let mut out = declare(acc);
    out.push('\n');
    out.push_str(&body);
    if !body.is_empty() && !body.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(&emit(acc));
    out.push('\n');
    Ok(out)
}
