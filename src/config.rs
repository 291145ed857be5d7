//! Extraction configuration loaded from `~/.config/rowsift/config.toml`.
//!
//! ```toml
//! [assembly]
//! line_pitch = 1.0
//!
//! [[rules]]
//! name = "section"
//! pattern = '(?i)^([A-Z\s&-]+)\s+--\s+Overall Stage Results'
//! action = "section"
//! capture = 1
//! ```
//!
//! When `rules` is present it replaces the built-in table entirely.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::assemble::AssemblyConfig;
use crate::classify::Classifier;
use crate::error::{ExtractError, Result};
use crate::rules::{default_specs, RuleSet, RuleSpec};

/// Top-level config file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractConfig {
    #[serde(default)]
    pub assembly: AssemblyConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<Vec<RuleSpec>>,
}

impl ExtractConfig {
    /// Parse TOML and validate it.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| ExtractError::Config(e.to_string()))?;
        config.assembly.validate()?;
        Ok(config)
    }

    /// Load from an explicit path. The file must exist.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ExtractError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml(&content)
            .map_err(|e| ExtractError::Config(format!("{}: {e}", path.display())))
    }

    /// Load from the default location.
    ///
    /// Returns defaults if the file doesn't exist (configuration is optional).
    pub fn load_default() -> Result<Self> {
        let path = config_path();
        if !path.exists() {
            return Ok(Self::default());
        }
        tracing::debug!(path = %path.display(), "loading config");
        Self::from_path(&path)
    }

    /// The rule table in effect: the configured one or the built-in one.
    pub fn rule_specs(&self) -> Vec<RuleSpec> {
        self.rules.clone().unwrap_or_else(default_specs)
    }

    pub fn classifier(&self) -> Result<Classifier> {
        Ok(Classifier::new(RuleSet::from_specs(&self.rule_specs())?))
    }
}

/// Return the path to the default config file.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("rowsift")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::RuleAction;

    #[test]
    fn parse_empty_config() {
        let config = ExtractConfig::from_toml("").unwrap();
        assert_eq!(config, ExtractConfig::default());
        assert_eq!(config.rule_specs(), default_specs());
    }

    #[test]
    fn parse_line_pitch() {
        let config = ExtractConfig::from_toml("[assembly]\nline_pitch = 2.5\n").unwrap();
        assert!((config.assembly.line_pitch - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_zero_pitch() {
        assert!(ExtractConfig::from_toml("[assembly]\nline_pitch = 0.0\n").is_err());
    }

    #[test]
    fn parse_custom_rules() {
        let toml_str = r#"
[[rules]]
name = "heat"
pattern = '^Heat\s+(\d+)'
action = "stage"
capture = 1

[[rules]]
name = "legend"
pattern = "(?i)lane"
action = "discard"
max_len = 40
"#;
        let config = ExtractConfig::from_toml(toml_str).unwrap();
        let specs = config.rule_specs();
        assert_eq!(specs.len(), 2);
        assert_eq!(specs[0].action, RuleAction::Stage);
        assert_eq!(specs[0].capture, 1);
        assert_eq!(specs[1].max_len, Some(40));
        assert!(config.classifier().is_ok());
    }

    #[test]
    fn rejects_unknown_action() {
        let toml_str = r#"
[[rules]]
name = "x"
pattern = "x"
action = "explode"
"#;
        assert!(matches!(
            ExtractConfig::from_toml(toml_str),
            Err(ExtractError::Config(_))
        ));
    }

    #[test]
    fn default_table_round_trips_through_toml() {
        let config = ExtractConfig {
            rules: Some(default_specs()),
            ..ExtractConfig::default()
        };
        let text = toml::to_string(&config).unwrap();
        assert_eq!(ExtractConfig::from_toml(&text).unwrap(), config);
    }
}
