pub mod blocks;
pub mod calls;
pub mod compress;
pub mod config;
pub mod emit;
pub mod error;
pub mod extract;
pub mod ir;
pub mod normalize;
pub mod rewrite;
pub mod scope;
pub mod syntax;

use config::Config;
use error::Result;
use ir::Extracted;
use scope::Symbols;
use std::io;
use std::path::PathBuf;
use tracing::{debug, info_span};

pub use error::CompileError;

pub fn compile(text: &str, config: &Config) -> Result<String> {
    let mode = config.mode;
    let _span = info_span!("compile", mode = ?mode).entered();

    // Stage 0
    let mut source = if mode.strips_comments() {
        normalize::strip_comments(text)
    } else {
        text.to_string()
    };
    source = normalize::wrap_lines(&source);

    // Stages 1-4
    if mode.rewrites_functions() {
        let symbols = Symbols::for_source(&source, config.naming)?;
        let Extracted {
            main,
            mut functions,
        } = extract::extract_functions(&source)?;
        debug!(templates = functions.len(), accumulator = symbols.accumulator(), "extracted");

        rewrite::rewrite_functions(&mut functions, &symbols, config)?;
        let main = rewrite::rewrite_main(&main, &ir::signatures(&functions), &symbols, config)?;
        source = emit::reassemble(&functions, &main);
    }

    // Stage 5
    if mode.strips_print() {
        source = compress::strip_print(&source);
    }
    if mode.compacts() {
        source = compress::compact(&source);
    }

    Ok(source)
}

pub fn list_files(inputs: &[PathBuf]) -> io::Result<Vec<PathBuf>> {
    let mut out: Vec<PathBuf> = Vec::new();

    for p in inputs {
        if p.is_dir() {
            for entry in std::fs::read_dir(p)? {
                let entry = entry?;
                let sub_path = entry.path();
                let hidden = sub_path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with('.'));
                if hidden {
                    continue;
                }
                if sub_path.is_dir() {
                    out.extend(list_files(&[sub_path])?);
                } else if sub_path.is_file() {
                    out.push(sub_path);
                }
            }
        } else if p.is_file() {
            out.push(p.clone());
        }
    }

    out.sort();
    Ok(out)
}
