//! Diagnostic renderer with rich terminal output

use super::{Applicability, CodeSuggestion, Diagnostic, Severity};
use crate::console::{Color, Console};
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Output format for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text with colors and formatting
    Text,
    /// JSON array of diagnostics
    Json,
    /// SARIF 2.1.0 report for CI integration
    Sarif,
}

/// Diagnostic renderer with rich formatting
///
/// Source text is registered up front with [`DiagnosticRenderer::with_source`]; the
/// renderer never reads files itself.
pub struct DiagnosticRenderer {
    console: Console,
    output_format: OutputFormat,
    sources: HashMap<PathBuf, String>,
}

impl DiagnosticRenderer {
    /// Create a new text renderer with automatic terminal detection
    pub fn new() -> Self {
        Self {
            console: Console::new(),
            output_format: OutputFormat::Text,
            sources: HashMap::new(),
        }
    }

    /// Create a renderer with colors disabled
    pub fn no_colors() -> Self {
        Self {
            console: Console::no_colors(),
            ..Self::new()
        }
    }

    /// Create a renderer with a specific output format
    pub fn with_format(format: OutputFormat) -> Self {
        let console = match format {
            OutputFormat::Json | OutputFormat::Sarif => Console::no_colors(),
            OutputFormat::Text => Console::new(),
        };
        Self {
            console,
            output_format: format,
            sources: HashMap::new(),
        }
    }

    /// Register the source text of a file for code frames
    pub fn with_source(mut self, file: impl Into<PathBuf>, source: impl Into<String>) -> Self {
        self.sources.insert(file.into(), source.into());
        self
    }

    /// Render every diagnostic in the configured format
    pub fn render_diagnostics(&self, diagnostics: &[Diagnostic]) -> String {
        match self.output_format {
            OutputFormat::Text => self.render_diagnostics_text(diagnostics),
            OutputFormat::Json => serde_json::to_string_pretty(diagnostics)
                .unwrap_or_else(|e| format!("{{\"error\": \"Failed to serialize: {e}\"}}")),
            OutputFormat::Sarif => render_sarif(diagnostics),
        }
    }

    fn render_diagnostics_text(&self, diagnostics: &[Diagnostic]) -> String {
        let mut output = String::new();
        for (i, diagnostic) in diagnostics.iter().enumerate() {
            if i > 0 {
                output.push('\n');
            }
            output.push_str(&self.render_text(diagnostic));
        }
        output
    }

    /// Render a single diagnostic as text
    pub fn render_text(&self, diagnostic: &Diagnostic) -> String {
        let mut output = String::new();

        output.push_str(&self.render_header(diagnostic));
        output.push('\n');
        output.push_str(&format!(
            "  {} {}\n",
            self.console.colorize("-->", Color::Blue),
            diagnostic.location
        ));

        if let Some(frame) = self.render_code_frame(diagnostic) {
            output.push_str(&frame);
        }

        for suggestion in &diagnostic.suggestions {
            output.push_str(&self.render_suggestion(suggestion));
        }

        output
    }

    fn render_header(&self, diagnostic: &Diagnostic) -> String {
        let severity_color = match diagnostic.severity {
            Severity::Error => Color::Red,
            Severity::Warning => Color::Yellow,
            Severity::Info => Color::Blue,
        };

        format!(
            "{}{}: {}",
            self.console
                .colorize(&diagnostic.severity.to_string(), severity_color),
            self.console
                .colorize(&format!("[{}]", diagnostic.rule_id), Color::Dim),
            self.console.colorize(&diagnostic.message, Color::Bold)
        )
    }

    fn source_line(&self, file: &Path, line: usize) -> Option<&str> {
        let source = self.sources.get(file)?;
        if line == 0 {
            return None;
        }
        source.lines().nth(line - 1)
    }

    fn render_code_frame(&self, diagnostic: &Diagnostic) -> Option<String> {
        let location = &diagnostic.location;
        let line = self.source_line(&location.file, location.line)?;

        let gutter = location.line.to_string();
        let pad = " ".repeat(gutter.len());
        let col_idx = location.column.saturating_sub(1);
        let width = line
            .chars()
            .skip(col_idx)
            .take(location.length.max(1))
            .count()
            .max(1);
        let highlight_color = match diagnostic.severity {
            Severity::Error => Color::Red,
            Severity::Warning => Color::Yellow,
            Severity::Info => Color::Blue,
        };

        let mut frame = String::new();
        frame.push_str(&format!("  {pad} {}\n", self.console.colorize("|", Color::Blue)));
        frame.push_str(&format!(
            "  {} {} {line}\n",
            self.console.colorize(&gutter, Color::Dim),
            self.console.colorize("|", Color::Blue)
        ));
        frame.push_str(&format!(
            "  {pad} {} {}{}\n",
            self.console.colorize("|", Color::Blue),
            " ".repeat(col_idx),
            self.console.colorize(&"^".repeat(width), highlight_color)
        ));
        Some(frame)
    }

    fn render_suggestion(&self, suggestion: &CodeSuggestion) -> String {
        let (label, label_color) = match suggestion.applicability {
            Applicability::Always => ("Safe fix", Color::Green),
            Applicability::MaybeIncorrect => ("Unsafe fix", Color::Yellow),
        };

        let mut output = format!(
            "  {} {}: {}\n",
            self.console.colorize("i", Color::Blue),
            self.console.colorize(label, label_color),
            suggestion.message
        );

        let location = &suggestion.location;
        let Some(line) = self.source_line(&location.file, location.line) else {
            output.push_str(&format!(
                "      replace with: {}\n",
                display_replacement(&suggestion.replacement)
            ));
            return output;
        };

        let start = line
            .char_indices()
            .nth(location.column.saturating_sub(1))
            .map(|(idx, _)| idx)
            .unwrap_or(line.len());
        let end = (start + location.length).min(line.len());
        let modified = match (line.get(..start), line.get(end..)) {
            (Some(prefix), Some(suffix)) => format!("{prefix}{}{suffix}", suggestion.replacement),
            _ => suggestion.replacement.clone(),
        };

        output.push_str(&format!(
            "    {} {}\n",
            self.console.colorize("-", Color::Red),
            self.console.colorize(line, Color::Red)
        ));
        output.push_str(&format!(
            "    {} {}\n",
            self.console.colorize("+", Color::Green),
            self.console.colorize(&modified, Color::Green)
        ));
        output
    }
}

impl Default for DiagnosticRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn display_replacement(replacement: &str) -> &str {
    if replacement.is_empty() {
        "(remove)"
    } else {
        replacement
    }
}

fn render_sarif(diagnostics: &[Diagnostic]) -> String {
    let report = SarifReport {
        version: "2.1.0".to_string(),
        runs: vec![SarifRun {
            tool: SarifTool {
                driver: SarifDriver {
                    name: "taglint".to_string(),
                    version: env!("CARGO_PKG_VERSION").to_string(),
                },
            },
            results: diagnostics
                .iter()
                .map(|d| SarifResult {
                    rule_id: d.rule_id.clone(),
                    level: match d.severity {
                        Severity::Error => "error".to_string(),
                        Severity::Warning => "warning".to_string(),
                        Severity::Info => "note".to_string(),
                    },
                    message: SarifMessage {
                        text: d.message.clone(),
                    },
                    locations: vec![SarifLocation {
                        physical_location: SarifPhysicalLocation {
                            artifact_location: SarifArtifactLocation {
                                uri: d.location.file.to_string_lossy().to_string(),
                            },
                            region: SarifRegion {
                                start_line: d.location.line,
                                start_column: d.location.column,
                                char_offset: d.location.offset,
                                char_length: d.location.length,
                            },
                        },
                    }],
                })
                .collect(),
        }],
    };

    serde_json::to_string_pretty(&report)
        .unwrap_or_else(|e| format!("{{\"error\": \"Failed to serialize: {e}\"}}"))
}

// SARIF format structures
#[derive(Serialize)]
struct SarifReport {
    version: String,
    runs: Vec<SarifRun>,
}

#[derive(Serialize)]
struct SarifRun {
    tool: SarifTool,
    results: Vec<SarifResult>,
}

#[derive(Serialize)]
struct SarifTool {
    driver: SarifDriver,
}

#[derive(Serialize)]
struct SarifDriver {
    name: String,
    version: String,
}

#[derive(Serialize)]
struct SarifResult {
    #[serde(rename = "ruleId")]
    rule_id: String,
    level: String,
    message: SarifMessage,
    locations: Vec<SarifLocation>,
}

#[derive(Serialize)]
struct SarifMessage {
    text: String,
}

#[derive(Serialize)]
struct SarifLocation {
    #[serde(rename = "physicalLocation")]
    physical_location: SarifPhysicalLocation,
}

#[derive(Serialize)]
struct SarifPhysicalLocation {
    #[serde(rename = "artifactLocation")]
    artifact_location: SarifArtifactLocation,
    region: SarifRegion,
}

#[derive(Serialize)]
struct SarifArtifactLocation {
    uri: String,
}

#[derive(Serialize)]
struct SarifRegion {
    #[serde(rename = "startLine")]
    start_line: usize,
    #[serde(rename = "startColumn")]
    start_column: usize,
    #[serde(rename = "charOffset")]
    char_offset: usize,
    #[serde(rename = "charLength")]
    char_length: usize,
}
