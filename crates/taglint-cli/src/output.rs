//! Output formatting and reporting

use colored::*;
use taglint_core::{
    DiagnosticRenderer, OutputFormat as CoreOutputFormat, Package, Result, Severity,
    TaglintError, diagnostics::Diagnostic,
};

use crate::OutputFormat;

/// Summary statistics for a check run
#[derive(Debug, Clone, Default)]
pub struct LintSummary {
    pub files_checked: usize,
    pub errors: usize,
    pub warnings: usize,
    pub info: usize,
    pub fixes_applied: usize,
    /// Diagnostics whose fix was written to disk
    pub fixed: usize,
}

impl LintSummary {
    pub fn new(files_checked: usize, diagnostics: &[Diagnostic]) -> Self {
        let mut summary = Self {
            files_checked,
            ..Self::default()
        };
        for diagnostic in diagnostics {
            match diagnostic.severity {
                Severity::Error => summary.errors += 1,
                Severity::Warning => summary.warnings += 1,
                Severity::Info => summary.info += 1,
            }
        }
        summary
    }

    pub fn total_issues(&self) -> usize {
        self.errors + self.warnings + self.info
    }

    pub fn has_issues(&self) -> bool {
        self.total_issues() > 0
    }

    /// Diagnostics left after fixes were written
    pub fn remaining(&self) -> usize {
        self.total_issues().saturating_sub(self.fixed)
    }
}

/// Output formatter for different formats
pub struct OutputFormatter {
    format: OutputFormat,
    use_colors: bool,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat, use_colors: bool) -> Self {
        Self { format, use_colors }
    }

    /// Format and print check results
    pub fn print_results(
        &self,
        diagnostics: &[Diagnostic],
        packages: &[Package],
        summary: &LintSummary,
    ) -> Result<()> {
        match self.format {
            OutputFormat::Human => {
                self.print_human_format(diagnostics, packages, summary);
                Ok(())
            }
            OutputFormat::Json => self.print_json_format(diagnostics, summary),
            OutputFormat::Sarif => {
                let renderer = DiagnosticRenderer::with_format(CoreOutputFormat::Sarif);
                println!("{}", renderer.render_diagnostics(diagnostics));
                Ok(())
            }
        }
    }

    fn print_human_format(
        &self,
        diagnostics: &[Diagnostic],
        packages: &[Package],
        summary: &LintSummary,
    ) {
        if diagnostics.is_empty() {
            println!("{} No issues found", "✓".green());
        } else {
            let mut renderer = if self.use_colors {
                DiagnosticRenderer::new()
            } else {
                DiagnosticRenderer::no_colors()
            };
            for file in packages.iter().flat_map(|p| p.files.iter()) {
                if let Some(source) = &file.source {
                    renderer = renderer.with_source(file.path.clone(), source.clone());
                }
            }
            println!("{}", renderer.render_diagnostics(diagnostics));
        }

        self.print_summary_human(summary);
    }

    fn print_summary_human(&self, summary: &LintSummary) {
        println!("\n{}", "Summary:".bold());
        println!("  Files checked: {}", summary.files_checked);

        if summary.has_issues() {
            println!("  Issues found:");
            if summary.errors > 0 {
                println!("    Errors: {}", summary.errors.to_string().red());
            }
            if summary.warnings > 0 {
                println!("    Warnings: {}", summary.warnings.to_string().yellow());
            }
            if summary.info > 0 {
                println!("    Info: {}", summary.info.to_string().blue());
            }
        }

        if summary.fixes_applied > 0 {
            println!(
                "  Fixes applied: {}",
                summary.fixes_applied.to_string().green()
            );
        }
    }

    fn print_json_format(&self, diagnostics: &[Diagnostic], summary: &LintSummary) -> Result<()> {
        let result = serde_json::json!({
            "filesChecked": summary.files_checked,
            "issues": diagnostics,
            "summary": {
                "errors": summary.errors,
                "warnings": summary.warnings,
                "info": summary.info,
                "total": summary.total_issues(),
                "fixesApplied": summary.fixes_applied
            }
        });

        println!(
            "{}",
            serde_json::to_string_pretty(&result).map_err(|e| {
                TaglintError::internal_error(format!("Failed to serialize JSON: {e}"))
            })?
        );
        Ok(())
    }
}
