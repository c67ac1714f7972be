use crate::syntax::Keyword;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CompileError {
    #[error("line {line}: `{{{{{keyword}` block has no matching `{{{{end}}}}`")]
    MalformedBlock { keyword: Keyword, line: usize },

    #[error("line {line}: variable `{name}` must not contain the word output")]
    IllegalIdentifier { name: String, line: usize },

    #[error("line {line}: call to undefined template `{name}`")]
    UnknownFunction { name: String, line: usize },
}

pub type Result<T> = std::result::Result<T, CompileError>;
