use indexmap::IndexMap;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    Produces,
    Pure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnKind {
    Implicit,
    Explicit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    pub output: OutputKind,
    pub returns: ReturnKind,
}

impl Signature {
    pub fn produces(self) -> bool {
        self.output == OutputKind::Produces
    }
}

#[derive(Debug, Clone)]
pub struct FunctionDef {
    pub name: String,
    pub text: String,
    pub line: usize,
    pub signature: Signature,
}

pub type FunctionTable = IndexMap<String, FunctionDef>;

pub type Signatures = HashMap<String, Signature>;

pub fn signatures(table: &FunctionTable) -> Signatures {
    table
        .iter()
        .map(|(name, def)| (name.clone(), def.signature))
        .collect()
}

#[derive(Debug)]
pub struct Extracted {
    pub main: String,
    pub functions: FunctionTable,
}
