use serde::Deserialize;

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Syntax,
    Runtime,
    Conceptual,
    Product,
}

impl Mode {
    pub fn strips_comments(self) -> bool {
        matches!(self, Mode::Syntax | Mode::Product)
    }

    pub fn rewrites_functions(self) -> bool {
        !matches!(self, Mode::Syntax)
    }

    pub fn strips_print(self) -> bool {
        !matches!(self, Mode::Conceptual)
    }

    pub fn compacts(self) -> bool {
        matches!(self, Mode::Product)
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Naming {
    #[default]
    Reserved,
    Fresh,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UnknownCalls {
    #[default]
    Passthrough,
    Error,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub mode: Mode,

    #[serde(default)]
    pub naming: Naming,

    #[serde(default)]
    pub unknown_calls: UnknownCalls,

    #[serde(default = "default_indent")]
    pub indent: String,
}

fn default_indent() -> String {
    "    ".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            mode: Mode::Syntax,
            naming: Naming::Reserved,
            unknown_calls: UnknownCalls::Passthrough,
            indent: default_indent(),
        }
    }
}

impl Config {
    pub fn with_mode(mode: Mode) -> Self {
        Config {
            mode,
            ..Config::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.mode, Mode::Syntax);
        assert_eq!(config.naming, Naming::Reserved);
        assert_eq!(config.unknown_calls, UnknownCalls::Passthrough);
        assert_eq!(config.indent, "    ");
    }

    #[test]
    fn test_deserialize_full_config() {
        let json = r#"{
            "mode": "product",
            "naming": "fresh",
            "unknown_calls": "error",
            "indent": "\t"
        }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.mode, Mode::Product);
        assert_eq!(config.naming, Naming::Fresh);
        assert_eq!(config.unknown_calls, UnknownCalls::Error);
        assert_eq!(config.indent, "\t");
    }

    #[test]
    fn test_deserialize_partial_config() {
        let config: Config = serde_json::from_str(r#"{"mode": "runtime"}"#).unwrap();
        assert_eq!(config.mode, Mode::Runtime);
        assert_eq!(config.naming, Naming::Reserved);
        assert_eq!(config.indent, "    ");
    }

    #[test]
    fn test_mode_pass_matrix() {
        assert!(Mode::Syntax.strips_comments());
        assert!(!Mode::Syntax.rewrites_functions());
        assert!(Mode::Syntax.strips_print());
        assert!(!Mode::Syntax.compacts());

        assert!(!Mode::Runtime.strips_comments());
        assert!(Mode::Runtime.rewrites_functions());
        assert!(Mode::Runtime.strips_print());

        assert!(Mode::Conceptual.rewrites_functions());
        assert!(!Mode::Conceptual.strips_print());

        assert!(Mode::Product.strips_comments());
        assert!(Mode::Product.rewrites_functions());
        assert!(Mode::Product.compacts());
    }
}
