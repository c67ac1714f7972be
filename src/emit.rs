use crate::ir::{FunctionDef, FunctionTable};

// Output-producing templates first, then pure ones, each group in source order.
pub fn reassemble(functions: &FunctionTable, main: &str) -> String {
    let (producing, pure): (Vec<&FunctionDef>, Vec<&FunctionDef>) =
        functions.values().partition(|def| def.signature.produces());

    let size = functions.values().map(|d| d.text.len() + 1).sum::<usize>() + main.len();
    let mut out = String::with_capacity(size);
    for def in producing.into_iter().chain(pure) {
        out.push_str(&def.text);
        out.push('\n');
    }
    out.push_str(main);
    out
}
