//! Configuration types for taglint

use crate::diagnostics::Severity;
use crate::error::TaglintError;
use crate::result::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaglintConfig {
    /// Tag dialects to check
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Tag dialects to check (default: all)")]
    pub dialects: Option<Vec<Dialect>>,

    /// Linter configuration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linter: Option<LinterConfiguration>,

    /// File discovery configuration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<FilesConfiguration>,
}

/// Tag dialects understood by the checker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    Json,
    Bson,
    Binding,
}

impl Dialect {
    pub const ALL: [Dialect; 3] = [Dialect::Json, Dialect::Bson, Dialect::Binding];

    /// Tag key the dialect reads
    pub fn key(&self) -> &'static str {
        match self {
            Dialect::Json => "json",
            Dialect::Bson => "bson",
            Dialect::Binding => "binding",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Linter configuration
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LinterConfiguration {
    /// Enable/disable linter
    #[schemars(description = "Enable or disable the linter")]
    pub enabled: Option<bool>,

    /// Per-rule severity overrides keyed by rule id
    #[schemars(description = "Rule severity overrides, e.g. {\"json/same-tag-name\": \"error\"}")]
    pub rules: Option<BTreeMap<String, RuleSeverity>>,
}

/// Rule severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum RuleSeverity {
    /// Disable the rule
    Off,
    /// Informational message
    Info,
    /// Warning
    Warn,
    /// Error
    Error,
}

impl RuleSeverity {
    /// Diagnostic severity for this setting; `None` when the rule is off
    pub fn to_severity(self) -> Option<Severity> {
        match self {
            RuleSeverity::Off => None,
            RuleSeverity::Info => Some(Severity::Info),
            RuleSeverity::Warn => Some(Severity::Warning),
            RuleSeverity::Error => Some(Severity::Error),
        }
    }
}

/// Files configuration
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FilesConfiguration {
    /// Glob patterns to include
    #[schemars(description = "Glob patterns for model exports to include")]
    pub include: Option<Vec<String>>,

    /// Glob patterns to exclude
    #[schemars(description = "Glob patterns for model exports to exclude")]
    pub exclude: Option<Vec<String>>,
}

impl TaglintConfig {
    /// Load configuration from file
    ///
    /// Supports JSON (.json), TOML (.toml) and YAML (.yaml, .yml).
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| TaglintError::io_error(path, e))?;
        Self::parse(&content, path)
    }

    pub(crate) fn parse(content: &str, path: &Path) -> Result<Self> {
        let ext = path.extension().and_then(|e| e.to_str());
        let parsed = match ext {
            Some("yaml") | Some("yml") => serde_yaml::from_str(content).map_err(|e| e.to_string()),
            Some("json") => serde_json::from_str(content).map_err(|e| e.to_string()),
            Some("toml") => toml::from_str(content).map_err(|e| e.to_string()),
            _ => Err("Unsupported file extension (expected .json, .toml, .yaml or .yml)".to_string()),
        };
        parsed.map_err(|message| {
            TaglintError::config_error(format!("{}: {message}", path.display()))
        })
    }

    /// JSON Schema describing this configuration
    pub fn json_schema() -> serde_json::Value {
        serde_json::to_value(schemars::schema_for!(TaglintConfig))
            .unwrap_or(serde_json::Value::Null)
    }

    /// Dialects to check, all three when unset
    pub fn enabled_dialects(&self) -> Vec<Dialect> {
        match &self.dialects {
            Some(dialects) => {
                let mut dialects = dialects.clone();
                dialects.sort();
                dialects.dedup();
                dialects
            }
            None => Dialect::ALL.to_vec(),
        }
    }

    /// Get linter configuration with defaults
    pub fn linter_config(&self) -> LinterConfiguration {
        self.linter.clone().unwrap_or_default()
    }

    /// Get files configuration with defaults
    pub fn files_config(&self) -> FilesConfiguration {
        self.files.clone().unwrap_or_default()
    }

    /// Configured override for `rule_id`, if any
    pub fn rule_severity(&self, rule_id: &str) -> Option<RuleSeverity> {
        self.linter
            .as_ref()
            .and_then(|linter| linter.rules.as_ref())
            .and_then(|rules| rules.get(rule_id))
            .copied()
    }

    pub fn is_linter_enabled(&self) -> bool {
        self.linter_config().enabled.unwrap_or(true)
    }
}

impl Default for LinterConfiguration {
    fn default() -> Self {
        Self {
            enabled: Some(true),
            rules: None,
        }
    }
}

impl Default for FilesConfiguration {
    fn default() -> Self {
        Self {
            include: Some(vec![
                "**/*.taglint.json".to_string(),
                "**/*.taglint.yaml".to_string(),
                "**/*.taglint.yml".to_string(),
            ]),
            exclude: Some(vec![
                "**/vendor/**".to_string(),
                "**/node_modules/**".to_string(),
                "**/target/**".to_string(),
            ]),
        }
    }
}
