use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::PricingRules;
use crate::domain::RuleDefinition;

/// Errors that can occur while loading pricing rules.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Parse and validate a JSON rule definition.
pub fn parse_json(content: &str) -> Result<PricingRules, ConfigError> {
    let def: RuleDefinition = serde_json::from_str(content)?;
    PricingRules::from_definition(def)
}

/// Parse and validate a YAML rule definition.
pub fn parse_yaml(content: &str) -> Result<PricingRules, ConfigError> {
    let def: RuleDefinition = serde_yaml::from_str(content)?;
    PricingRules::from_definition(def)
}

/// Load pricing rules from a file.
///
/// Files ending in `.json` are parsed as JSON, anything else as YAML.
pub fn load_rules(path: impl AsRef<Path>) -> Result<PricingRules, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        parse_json(&content)
    } else {
        parse_yaml(&content)
    }
}

/// Loader bound to a single rules file.
#[derive(Debug, Clone)]
pub struct RulesLoader {
    path: PathBuf,
}

impl RulesLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        RulesLoader { path: path.into() }
    }

    /// Load and validate the rules file.
    pub fn load(&self) -> Result<PricingRules, ConfigError> {
        load_rules(&self.path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
