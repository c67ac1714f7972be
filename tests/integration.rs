use std::fs;
use std::path::Path;
use tmplc::config::{Config, Mode, Naming};
use tmplc::CompileError;

fn read_sample(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("corpora")
        .join("samples")
        .join(name);
    let text = fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("cannot read {}: {}", path.display(), e));
    // Normalize line endings for cross-platform comparison
    text.replace("\r\n", "\n")
}

fn compile_sample(name: &str, mode: Mode) -> String {
    let input = read_sample(name);
    tmplc::compile(&input, &Config::with_mode(mode)).unwrap()
}

#[test]
fn test_greet_conceptual_parity() {
    let result = compile_sample("greet.tmpl", Mode::Conceptual);
    assert_eq!(result, read_sample("greet.conceptual.out"));
}

#[test]
fn test_greet_product_parity() {
    let result = compile_sample("greet.tmpl", Mode::Product);
    assert_eq!(result, read_sample("greet.product.out"));
}

#[test]
fn test_report_runtime_parity() {
    let result = compile_sample("report.tmpl", Mode::Runtime);
    assert_eq!(result, read_sample("report.runtime.out"));
}

#[test]
fn test_report_syntax_parity() {
    let result = compile_sample("report.tmpl", Mode::Syntax);
    assert_eq!(result, read_sample("report.syntax.out"));
}

#[test]
fn test_product_is_compacted_runtime() {
    let runtime = compile_sample("report.tmpl", Mode::Runtime);
    let product = compile_sample("report.tmpl", Mode::Product);
    assert!(!product.contains("Report helpers"));
    assert!(!product.contains('\n'));
    assert!(product.starts_with("{{define \"line\"}}{{$output := \"\"}}"));
    assert!(runtime.contains("{{/* Report helpers */}}"));
}

#[test]
fn test_fresh_naming_matches_reserved_when_free() {
    let input = read_sample("report.tmpl");
    let mut config = Config::with_mode(Mode::Runtime);
    config.naming = Naming::Fresh;
    let fresh = tmplc::compile(&input, &config).unwrap();
    assert_eq!(fresh, read_sample("report.runtime.out"));
}

#[test]
fn test_reserved_name_collision() {
    let input = format!("{}$lastOutput := 1\n", read_sample("greet.tmpl"));
    let err = tmplc::compile(&input, &Config::with_mode(Mode::Product)).unwrap_err();
    assert_eq!(
        err,
        CompileError::IllegalIdentifier {
            name: "$lastOutput".to_string(),
            line: 12
        }
    );
}
