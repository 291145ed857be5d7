//! Line classification rules.
//!
//! A [`RuleSet`] is an ordered table of named patterns, each mapped to an
//! action. The built-in table targets per-stage match results; other
//! document families supply their own table through the config file.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{ExtractError, Result};

/// Lines at or above this many characters are never treated as short
/// legend lines by a length-limited rule.
pub const SHORT_HEADER_MAX_LEN: usize = 60;

/// `DIVISION NAME -- Overall Stage Results`; group 1 is the section name.
pub const SECTION_PATTERN: &str = r"(?i)^([A-Z\s&-]+)\s+--\s+Overall Stage Results";
pub const STAGE_PATTERN: &str = r"(?i)Stage\s*(\d+|[A-Za-z0-9]+)";
pub const COLUMN_HEADER_PATTERN: &str =
    r"(?i)\bPTS\b|\bTIME\b|\bFACTOR\b|\bPOINTS\b|\bPERCENT\b|\bName\b|\b#\b";
pub const SECTION_BOUNDARY_PATTERN: &str = r"(?i)Overall Stage Results";
pub const SHORT_HEADER_PATTERN: &str = r"(?i)Event|Match|Rank|Ranking";

/// What a matching rule does with the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleAction {
    /// Start a new section; the captured text becomes the section label.
    Section,
    /// Start a new stage; the captured text becomes the stage label.
    Stage,
    /// Drop the line.
    Discard,
}

/// Serializable form of a rule, as written in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSpec {
    pub name: String,
    pub pattern: String,
    pub action: RuleAction,
    /// Capture group holding the label. 0 is the whole match.
    #[serde(default)]
    pub capture: usize,
    /// Only match lines shorter than this many characters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_len: Option<usize>,
}

impl RuleSpec {
    pub fn new(name: &str, pattern: &str, action: RuleAction) -> Self {
        Self {
            name: name.to_string(),
            pattern: pattern.to_string(),
            action,
            capture: 0,
            max_len: None,
        }
    }

    #[must_use]
    pub fn capture(mut self, group: usize) -> Self {
        self.capture = group;
        self
    }

    #[must_use]
    pub fn max_len(mut self, len: usize) -> Self {
        self.max_len = Some(len);
        self
    }
}

/// The built-in table for stage-results documents.
pub fn default_specs() -> Vec<RuleSpec> {
    vec![
        RuleSpec::new("section", SECTION_PATTERN, RuleAction::Section).capture(1),
        RuleSpec::new("stage", STAGE_PATTERN, RuleAction::Stage),
        RuleSpec::new("column-header", COLUMN_HEADER_PATTERN, RuleAction::Discard),
        RuleSpec::new("section-boundary", SECTION_BOUNDARY_PATTERN, RuleAction::Discard),
        RuleSpec::new("short-header", SHORT_HEADER_PATTERN, RuleAction::Discard)
            .max_len(SHORT_HEADER_MAX_LEN),
    ]
}

/// A compiled rule.
#[derive(Debug, Clone)]
pub struct Rule {
    pub name: String,
    pub action: RuleAction,
    regex: Regex,
    capture: usize,
    max_len: Option<usize>,
}

impl Rule {
    pub fn compile(spec: &RuleSpec) -> Result<Self> {
        let regex = Regex::new(&spec.pattern).map_err(|source| ExtractError::InvalidPattern {
            name: spec.name.clone(),
            source,
        })?;
        if spec.capture >= regex.captures_len() {
            return Err(ExtractError::Config(format!(
                "rule '{}' captures group {} but pattern has {} groups",
                spec.name,
                spec.capture,
                regex.captures_len() - 1
            )));
        }
        Ok(Self {
            name: spec.name.clone(),
            action: spec.action,
            regex,
            capture: spec.capture,
            max_len: spec.max_len,
        })
    }

    /// Trimmed label if the rule applies to `line`.
    ///
    /// A match whose capture group did not participate yields an empty label.
    pub fn apply(&self, line: &str) -> Option<String> {
        if let Some(max) = self.max_len {
            if line.chars().count() >= max {
                return None;
            }
        }
        let caps = self.regex.captures(line)?;
        Some(
            caps.get(self.capture)
                .map(|m| m.as_str().trim().to_string())
                .unwrap_or_default(),
        )
    }
}

/// Ordered rules; the first that applies wins.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn from_specs(specs: &[RuleSpec]) -> Result<Self> {
        let rules = specs.iter().map(Rule::compile).collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    /// First rule applying to `line`, with its label.
    pub fn first_match(&self, line: &str) -> Option<(&Rule, String)> {
        self.rules
            .iter()
            .find_map(|rule| rule.apply(line).map(|label| (rule, label)))
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::from_specs(&default_specs()).expect("built-in rule patterns compile")
    }
}
