//! Rule registry and the engine that runs enabled dialects over a package

use crate::builtin::{BindingTagChecker, BsonTagChecker, JsonTagChecker, binding, bson, json};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use taglint_core::{
    DefaultDiagnosticCollector, Diagnostic, DiagnosticCollector, Dialect, INVALID_TAG, Package,
    RuleSeverity, Severity, TagChecker, TaglintConfig, run_tag_checker,
};
use tracing::{debug, info};

/// Static description of a built-in rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleMetadata {
    pub id: &'static str,
    /// Dialect the rule belongs to; `None` for rules shared by every dialect
    pub dialect: Option<Dialect>,
    pub default_severity: Severity,
    pub description: &'static str,
}

/// Every built-in rule
pub const BUILTIN_RULES: &[RuleMetadata] = &[
    RuleMetadata {
        id: INVALID_TAG,
        dialect: None,
        default_severity: Severity::Error,
        description: "Tag literal cannot be unquoted",
    },
    RuleMetadata {
        id: json::INVALID_NAME,
        dialect: Some(Dialect::Json),
        default_severity: Severity::Error,
        description: "Name contains a quote, backslash, semicolon or other rejected character",
    },
    RuleMetadata {
        id: json::STRING_NON_SCALAR,
        dialect: Some(Dialect::Json),
        default_severity: Severity::Error,
        description: "The string option is only meaningful on bool, number and string fields",
    },
    RuleMetadata {
        id: json::SAME_TAG_NAME,
        dialect: Some(Dialect::Json),
        default_severity: Severity::Warning,
        description: "Tag name repeats the field name (fixable)",
    },
    RuleMetadata {
        id: bson::INVALID_OPTIONS,
        dialect: Some(Dialect::Bson),
        default_severity: Severity::Error,
        description: "Options other than omitempty, minsize and inline",
    },
    RuleMetadata {
        id: bson::SAME_TAG_NAME,
        dialect: Some(Dialect::Bson),
        default_severity: Severity::Warning,
        description: "Tag name repeats the lower-cased field name",
    },
    RuleMetadata {
        id: bson::INLINE_SHAPE,
        dialect: Some(Dialect::Bson),
        default_severity: Severity::Error,
        description: "inline requires a struct, pointer to struct or map with string keys",
    },
    RuleMetadata {
        id: bson::MINSIZE_SHAPE,
        dialect: Some(Dialect::Bson),
        default_severity: Severity::Error,
        description: "minsize requires int64, uint64 or uintptr",
    },
    RuleMetadata {
        id: binding::EXISTS_NON_POINTER,
        dialect: Some(Dialect::Binding),
        default_severity: Severity::Error,
        description: "exists requires a pointer or interface field",
    },
];

/// Look up a built-in rule by id
pub fn rule_metadata(id: &str) -> Option<&'static RuleMetadata> {
    BUILTIN_RULES.iter().find(|rule| rule.id == id)
}

/// The checker implementing `dialect`
pub fn checker_for(dialect: Dialect) -> Box<dyn TagChecker> {
    match dialect {
        Dialect::Json => Box::new(JsonTagChecker),
        Dialect::Bson => Box::new(BsonTagChecker),
        Dialect::Binding => Box::new(BindingTagChecker),
    }
}

/// Runs the enabled dialects and applies severity overrides
#[derive(Debug, Clone)]
pub struct TagLinter {
    dialects: Vec<Dialect>,
    overrides: BTreeMap<String, RuleSeverity>,
    enabled: bool,
}

impl TagLinter {
    /// Linter with every dialect and default severities
    pub fn new() -> Self {
        Self {
            dialects: Dialect::ALL.to_vec(),
            overrides: BTreeMap::new(),
            enabled: true,
        }
    }

    pub fn from_config(config: &TaglintConfig) -> Self {
        let overrides = config.linter_config().rules.unwrap_or_default();
        for id in overrides.keys() {
            if rule_metadata(id).is_none() {
                tracing::warn!("Unknown rule in configuration: {id}");
            }
        }
        Self {
            dialects: config.enabled_dialects(),
            overrides,
            enabled: config.is_linter_enabled(),
        }
    }

    /// Restrict the run to `dialects`
    pub fn with_dialects(mut self, dialects: Vec<Dialect>) -> Self {
        let mut dialects = dialects;
        dialects.sort();
        dialects.dedup();
        self.dialects = dialects;
        self
    }

    pub fn dialects(&self) -> &[Dialect] {
        &self.dialects
    }

    /// Check `package`, returning diagnostics ordered by file and offset
    pub fn lint(&self, package: &Package) -> Vec<Diagnostic> {
        if !self.enabled {
            debug!("Linter disabled by configuration");
            return Vec::new();
        }

        let mut collector = DefaultDiagnosticCollector::new();
        for dialect in &self.dialects {
            let checker = checker_for(*dialect);
            let before = collector.total_count();
            run_tag_checker(package, checker.as_ref(), &mut collector);
            debug!(
                dialect = %dialect,
                found = collector.total_count() - before,
                "dialect finished"
            );
        }

        // Every dialect reports an unquotable literal; keep one per position
        let mut seen_invalid = HashSet::new();
        collector.retain(|d| {
            d.rule_id != INVALID_TAG
                || seen_invalid.insert((d.location.file.clone(), d.location.offset))
        });

        self.apply_overrides(&mut collector);
        collector.sort_by_location();

        info!(
            structs = package.struct_count(),
            diagnostics = collector.total_count(),
            "lint finished"
        );
        collector.drain()
    }

    fn apply_overrides(&self, collector: &mut DefaultDiagnosticCollector) {
        if self.overrides.is_empty() {
            return;
        }
        collector.retain(|d| self.overrides.get(&d.rule_id) != Some(&RuleSeverity::Off));
        for diagnostic in collector.diagnostics_mut() {
            if let Some(severity) = self
                .overrides
                .get(&diagnostic.rule_id)
                .and_then(|setting| setting.to_severity())
            {
                diagnostic.severity = severity;
            }
        }
    }
}

impl Default for TagLinter {
    fn default() -> Self {
        Self::new()
    }
}
