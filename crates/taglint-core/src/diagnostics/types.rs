//! Diagnostic types and the diagnostic collector
//!
//! Provides diagnostics with:
//! - Precise code positioning with line/column information
//! - Code suggestions with applicability levels (safe vs unsafe)
//! - A collector that keeps diagnostics in stable source order

use crate::model::Span;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Represents a diagnostic message from linting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Identifier of the rule that generated this diagnostic
    pub rule_id: String,
    /// Severity level of the diagnostic
    pub severity: Severity,
    /// Human-readable message
    pub message: String,
    /// Location in the source file
    pub location: Location,
    /// Code suggestions for fixing the issue
    pub suggestions: Vec<CodeSuggestion>,
}

/// Severity levels for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational messages
    Info,
    /// Warnings that should be addressed
    Warning,
    /// Errors that must be fixed
    Error,
}

/// Location information for diagnostics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// File path
    pub file: PathBuf,
    /// Line number (1-based, 0 when the source text is unknown)
    pub line: usize,
    /// Column number (1-based, 0 when the source text is unknown)
    pub column: usize,
    /// Byte offset in the file
    pub offset: usize,
    /// Length of the span in bytes
    pub length: usize,
}

/// Indicates how a tool should manage this suggestion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Applicability {
    /// The suggestion is definitely correct and can be applied automatically
    Always,
    /// The suggestion may be correct but should be reviewed
    MaybeIncorrect,
}

impl fmt::Display for Applicability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Applicability::Always => write!(f, "safe"),
            Applicability::MaybeIncorrect => write!(f, "unsafe"),
        }
    }
}

/// A code suggestion that can be automatically applied
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeSuggestion {
    /// Description of the suggested fix
    pub message: String,
    /// The replacement text to apply
    pub replacement: String,
    /// Location to apply the replacement
    pub location: Location,
    /// When this suggestion should be applied
    pub applicability: Applicability,
}

impl Diagnostic {
    /// Create a new diagnostic
    pub fn new(
        rule_id: impl Into<String>,
        severity: Severity,
        message: impl Into<String>,
        location: Location,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            severity,
            message: message.into(),
            location,
            suggestions: Vec::new(),
        }
    }

    /// Add a code suggestion to this diagnostic
    pub fn with_suggestion(mut self, suggestion: CodeSuggestion) -> Self {
        self.suggestions.push(suggestion);
        self
    }

    /// Check if this diagnostic has any safe fixes
    pub fn has_safe_fixes(&self) -> bool {
        self.suggestions
            .iter()
            .any(|s| s.applicability == Applicability::Always)
    }
}

impl Location {
    /// Build a location for a span; line and column are left at 0 without source text
    pub fn from_span(file: &Path, span: Span, source_map: Option<(&SourceMap, &str)>) -> Self {
        let (line, column) = source_map
            .map(|(map, source)| map.offset_to_position(span.start, source))
            .unwrap_or((0, 0));
        Self {
            file: file.to_path_buf(),
            line,
            column,
            offset: span.start,
            length: span.len(),
        }
    }

    pub fn span(&self) -> Span {
        Span::new(self.offset, self.offset + self.length)
    }
}

impl CodeSuggestion {
    /// Create a new code suggestion
    pub fn new(
        message: impl Into<String>,
        replacement: impl Into<String>,
        location: Location,
        applicability: Applicability,
    ) -> Self {
        Self {
            message: message.into(),
            replacement: replacement.into(),
            location,
            applicability,
        }
    }

    /// Create a safe (always applicable) suggestion
    pub fn safe(
        message: impl Into<String>,
        replacement: impl Into<String>,
        location: Location,
    ) -> Self {
        Self::new(message, replacement, location, Applicability::Always)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.line == 0 {
            write!(f, "{}@{}", self.file.display(), self.offset)
        } else {
            write!(f, "{}:{}:{}", self.file.display(), self.line, self.column)
        }
    }
}

/// Trait for collecting and managing diagnostics
pub trait DiagnosticCollector {
    /// Collect a diagnostic
    fn collect(&mut self, diagnostic: Diagnostic);

    /// Get all collected diagnostics
    fn diagnostics(&self) -> &[Diagnostic];

    /// Group diagnostics by rule ID
    fn group_by_rule(&self) -> HashMap<String, Vec<&Diagnostic>>;

    /// Get count of diagnostics by severity
    fn count_by_severity(&self) -> HashMap<Severity, usize>;

    /// Check if there are any errors
    fn has_errors(&self) -> bool;

    /// Get total count of diagnostics
    fn total_count(&self) -> usize;
}

/// Default implementation of DiagnosticCollector
#[derive(Debug, Clone, Default)]
pub struct DefaultDiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DefaultDiagnosticCollector {
    /// Create a new diagnostic collector
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
        }
    }

    /// Sort diagnostics by location (file, then byte offset); ties keep report order
    pub fn sort_by_location(&mut self) {
        self.diagnostics.sort_by(|a, b| {
            a.location
                .file
                .cmp(&b.location.file)
                .then_with(|| a.location.offset.cmp(&b.location.offset))
        });
    }

    /// Take the collected diagnostics, leaving the collector empty
    pub fn drain(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Keep only the diagnostics accepted by `keep`
    pub fn retain(&mut self, keep: impl FnMut(&Diagnostic) -> bool) {
        self.diagnostics.retain(keep);
    }

    /// Mutable access for post-processing such as severity overrides
    pub fn diagnostics_mut(&mut self) -> &mut [Diagnostic] {
        &mut self.diagnostics
    }
}

impl DiagnosticCollector for DefaultDiagnosticCollector {
    fn collect(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    fn group_by_rule(&self) -> HashMap<String, Vec<&Diagnostic>> {
        let mut groups = HashMap::new();
        for diagnostic in &self.diagnostics {
            groups
                .entry(diagnostic.rule_id.clone())
                .or_insert_with(Vec::new)
                .push(diagnostic);
        }
        groups
    }

    fn count_by_severity(&self) -> HashMap<Severity, usize> {
        let mut counts = HashMap::new();
        for diagnostic in &self.diagnostics {
            *counts.entry(diagnostic.severity).or_insert(0) += 1;
        }
        counts
    }

    fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    fn total_count(&self) -> usize {
        self.diagnostics.len()
    }
}

/// Source map for efficient byte offset to line/column conversion
#[derive(Debug, Clone)]
pub struct SourceMap {
    /// Cumulative byte offsets for each line start (line 0, line 1, ...)
    line_starts: Vec<usize>,
}

impl SourceMap {
    /// Create a source map from source text
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        for (idx, ch) in source.char_indices() {
            if ch == '\n' {
                line_starts.push(idx + 1);
            }
        }
        Self { line_starts }
    }

    /// Convert byte offset to 1-based `(line, column)`; columns count characters
    pub fn offset_to_position(&self, offset: usize, source: &str) -> (usize, usize) {
        let line_idx = match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx.saturating_sub(1),
        };

        let line_start = self.line_starts[line_idx];
        let end = offset.min(source.len()).max(line_start);
        let column = source
            .get(line_start..end)
            .map(|text| text.chars().count())
            .unwrap_or(end - line_start)
            + 1;

        (line_idx + 1, column)
    }
}
