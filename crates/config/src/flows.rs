//! Flow declarations
//!
//! A flow pairs one input line with one or more output lines. The lines are
//! kept as raw strings here; tokenizing and registry lookups belong to the
//! flow parser.

use serde::Deserialize;

use crate::error::{ConfigError, Result};

/// One named flow
///
/// # Example
///
/// ```toml
/// [flows.capture]
/// input = "tcp|http"
/// outputs = ["json|gzip|gcs", "har|stdout"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FlowConfig {
    /// Input line: `source|modifier*|format`
    pub input: String,

    /// Output lines: `format|modifier*|sink`
    pub outputs: Vec<String>,
}

impl FlowConfig {
    /// Check that the flow has something to parse
    pub(crate) fn validate(&self, name: &str) -> Result<()> {
        if self.input.is_empty() {
            return Err(ConfigError::missing_field("flow", name, "input"));
        }
        if self.outputs.is_empty() {
            return Err(ConfigError::missing_field("flow", name, "outputs"));
        }
        if let Some(index) = self.outputs.iter().position(String::is_empty) {
            return Err(ConfigError::invalid_value(
                "flow",
                name,
                "outputs",
                format!("entry {index} is empty"),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flow(input: &str, outputs: &[&str]) -> FlowConfig {
        FlowConfig {
            input: input.into(),
            outputs: outputs.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_deserialize() {
        let toml = r#"
input = "tcp|http"
outputs = ["json|gzip|gcs", "har|stdout"]
"#;
        let config: FlowConfig = toml::from_str(toml).unwrap();
        assert_eq!(config, flow("tcp|http", &["json|gzip|gcs", "har|stdout"]));
    }

    #[test]
    fn test_valid_flow() {
        assert!(flow("tcp|http", &["json|stdout"]).validate("capture").is_ok());
    }

    #[test]
    fn test_missing_input() {
        let err = flow("", &["json|stdout"]).validate("capture").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingField { field: "input", .. }
        ));
    }

    #[test]
    fn test_missing_outputs() {
        let err = flow("tcp|http", &[]).validate("capture").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingField { field: "outputs", .. }
        ));
    }

    #[test]
    fn test_empty_output_entry() {
        let err = flow("tcp|http", &["json|stdout", ""])
            .validate("capture")
            .unwrap_err();
        assert!(err.to_string().contains("entry 1 is empty"));
    }

    #[test]
    fn test_grammar_not_checked() {
        // Token shape is the parser's concern
        assert!(flow("tcp", &["nonsense"]).validate("capture").is_ok());
    }
}
