use crate::error::{CompileError, Result};
use crate::syntax::{line_of, Keyword, RE_MARKER};
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Open(Keyword),
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub keyword: Keyword,
    pub start: usize,
}

pub fn next_marker(text: &str, from: usize) -> Option<(Marker, Range<usize>)> {
    let caps = RE_MARKER.captures(&text[from..])?;
    let whole = caps.get(0)?;
    let range = from + whole.start()..from + whole.end();
    let marker = match caps.get(1) {
        Some(kw) => Marker::Open(Keyword::from_name(kw.as_str())?),
        None => Marker::Close,
    };
    Some((marker, range))
}

// Scans from `after_open`, the offset right after the opening keyword.
pub fn block_end(text: &str, opener: Frame, after_open: usize) -> Result<usize> {
    let mut stack = vec![opener];
    let mut pos = after_open;

    while let Some(top) = stack.last().copied() {
        match next_marker(text, pos) {
            Some((Marker::Close, range)) => {
                stack.pop();
                pos = range.end;
            }
            Some((Marker::Open(keyword), range)) => {
                stack.push(Frame {
                    keyword,
                    start: range.start,
                });
                pos = range.end;
            }
            None => {
                return Err(CompileError::MalformedBlock {
                    keyword: top.keyword,
                    line: line_of(text, top.start),
                })
            }
        }
    }

    Ok(pos)
}

pub fn block_at(text: &str, start: usize) -> Result<Option<Range<usize>>> {
    match next_marker(text, start) {
        Some((Marker::Open(keyword), range)) if range.start == start => {
            let end = block_end(text, Frame { keyword, start }, range.end)?;
            Ok(Some(start..end))
        }
        _ => Ok(None),
    }
}
