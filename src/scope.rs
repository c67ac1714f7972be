use crate::config::Naming;
use crate::error::{CompileError, Result};
use crate::syntax::line_of;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static RE_VARIABLE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$\w+").unwrap());
static RE_OUTPUT_VARIABLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\w*[oO]utput\w*").unwrap());

const ACCUMULATOR: &str = "$output";

#[derive(Debug, Clone)]
pub struct Symbols {
    naming: Naming,
    accumulator: String,
    taken: HashSet<String>,
}

impl Symbols {
    // Under reserved naming this is also the check that the source uses no
    // variable containing "output".
    pub fn for_source(text: &str, naming: Naming) -> Result<Symbols> {
        match naming {
            Naming::Reserved => {
                if let Some(m) = RE_OUTPUT_VARIABLE.find(text) {
                    return Err(CompileError::IllegalIdentifier {
                        name: m.as_str().to_string(),
                        line: line_of(text, m.start()),
                    });
                }
                Ok(Symbols {
                    naming,
                    accumulator: ACCUMULATOR.to_string(),
                    taken: HashSet::new(),
                })
            }
            Naming::Fresh => {
                let mut taken: HashSet<String> = RE_VARIABLE
                    .find_iter(text)
                    .map(|m| m.as_str().to_string())
                    .collect();
                let accumulator = fresh(ACCUMULATOR, &taken);
                taken.insert(accumulator.clone());
                Ok(Symbols {
                    naming,
                    accumulator,
                    taken,
                })
            }
        }
    }

    pub fn accumulator(&self) -> &str {
        &self.accumulator
    }

    // `nth` tells apart several calls to one template in a single statement.
    pub fn temporary(&self, callee: &str, nth: usize) -> String {
        let stem: String = callee
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
            .collect();
        let base = match nth {
            0 => format!("${}Output", stem),
            n => format!("${}Output{}", stem, n),
        };
        match self.naming {
            Naming::Reserved => base,
            Naming::Fresh => fresh(&base, &self.taken),
        }
    }
}

fn fresh(base: &str, taken: &HashSet<String>) -> String {
    if !taken.contains(base) {
        return base.to_string();
    }
    (1..)
        .map(|n| format!("{}{}", base, n))
        .find(|name| !taken.contains(name))
        .unwrap_or_else(|| base.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_names() {
        let symbols = Symbols::for_source("{{$x := 1}}", Naming::Reserved).unwrap();
        assert_eq!(symbols.accumulator(), "$output");
        assert_eq!(symbols.temporary("calc", 0), "$calcOutput");
        assert_eq!(symbols.temporary("calc", 2), "$calcOutput2");
    }

    #[test]
    fn test_reserved_rejects_output_variable() {
        let err = Symbols::for_source("{{$a := 1}}\n{{$myOutput := 2}}", Naming::Reserved)
            .unwrap_err();
        assert_eq!(
            err,
            CompileError::IllegalIdentifier {
                name: "$myOutput".to_string(),
                line: 2
            }
        );
    }

    #[test]
    fn test_reserved_rejects_lowercase_output() {
        assert!(Symbols::for_source("{{$output := 1}}", Naming::Reserved).is_err());
        assert!(Symbols::for_source("{{$outputs := 1}}", Naming::Reserved).is_err());
    }

    #[test]
    fn test_fresh_avoids_collisions() {
        let text = "{{$output := 1}}{{$output1 := 2}}{{$calcOutput := 3}}";
        let symbols = Symbols::for_source(text, Naming::Fresh).unwrap();
        assert_eq!(symbols.accumulator(), "$output2");
        assert_eq!(symbols.temporary("calc", 0), "$calcOutput1");
        assert_eq!(symbols.temporary("greet", 0), "$greetOutput");
    }

    #[test]
    fn test_fresh_keeps_default_when_free() {
        let symbols = Symbols::for_source("{{$myOutput := 1}}", Naming::Fresh).unwrap();
        assert_eq!(symbols.accumulator(), "$output");
    }

    #[test]
    fn test_temporary_from_non_word_name() {
        let symbols = Symbols::for_source("", Naming::Reserved).unwrap();
        assert_eq!(symbols.temporary("my-f", 0), "$my_fOutput");
        assert_eq!(symbols.temporary("a.b c", 1), "$a_b_cOutput1");
    }
}
