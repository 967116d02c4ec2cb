//! CLI command implementations

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::Instant;
use taglint_core::{
    ConfigLoader, Diagnostic, Dialect, ExportDiscovery, Fix, Package, Result, ResultExt,
    RuleSeverity, TaglintConfig, TaglintError, apply_fixes, generate_unified_diff,
};
use taglint_rules::{BUILTIN_RULES, TagLinter};
use tracing::{debug, error, info, warn};

use crate::output::{LintSummary, OutputFormatter};
use crate::{ListFormat, OutputFormat};

/// Arguments of `taglint check`
pub struct CheckOptions {
    pub paths: Vec<PathBuf>,
    pub dialects: Vec<Dialect>,
    pub format: OutputFormat,
    pub fix: bool,
    pub diff: bool,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub config_path: Option<PathBuf>,
    pub use_colors: bool,
}

/// Check command implementation
///
/// Returns `Ok(true)` when every export loaded and no diagnostic is left unfixed.
pub fn check_command(options: CheckOptions) -> Result<bool> {
    debug!("Running check command on paths: {:?}", options.paths);

    let start_dir = match options.paths.first() {
        Some(path) if path.is_file() => match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        },
        Some(path) if path.is_dir() => path.as_path(),
        _ => Path::new("."),
    };
    let mut config = ConfigLoader::load(options.config_path.as_deref(), Some(start_dir))?;

    // Apply CLI overrides to configuration
    if !options.include.is_empty() {
        config.files.get_or_insert_with(Default::default).include = Some(options.include.clone());
    }
    if !options.exclude.is_empty() {
        config.files.get_or_insert_with(Default::default).exclude = Some(options.exclude.clone());
    }

    let start_time = Instant::now();

    let exports = collect_exports(&options.paths, &config)?;
    if exports.is_empty() {
        println!("No model exports found in specified paths.");
        return Ok(true);
    }
    debug!("Found {} exports to check", exports.len());

    let mut load_failures = 0;
    let mut packages = Vec::new();
    for export in &exports {
        match Package::load(export).log_and_continue() {
            Some(mut package) => {
                resolve_source_paths(&mut package, export);
                packages.push(package);
            }
            None => load_failures += 1,
        }
    }

    let mut linter = TagLinter::from_config(&config);
    if !options.dialects.is_empty() {
        linter = linter.with_dialects(options.dialects.clone());
    }

    let mut diagnostics = Vec::new();
    for package in &packages {
        diagnostics.extend(linter.lint(package));
    }

    let mut summary = LintSummary::new(packages.len(), &diagnostics);

    if options.fix || options.diff {
        let write = options.fix && !options.diff;
        let report = apply_suggested_fixes(&diagnostics, &packages, write)?;
        summary.fixes_applied = report.applied;
        if write {
            summary.fixed = diagnostics
                .iter()
                .filter(|d| report.resolves(d))
                .count();
        }
        let formatter = OutputFormatter::new(options.format, options.use_colors);
        formatter.print_results(&diagnostics, &packages, &summary)?;
        for diff in &report.diffs {
            match options.format {
                OutputFormat::Human => print!("\n{diff}"),
                _ => eprint!("{diff}"),
            }
        }
    } else {
        let formatter = OutputFormatter::new(options.format, options.use_colors);
        formatter.print_results(&diagnostics, &packages, &summary)?;
    }

    info!(
        "Checked {} exports in {:?}",
        packages.len(),
        start_time.elapsed()
    );

    Ok(load_failures == 0 && summary.remaining() == 0)
}

/// Expand the command-line paths into export files
fn collect_exports(paths: &[PathBuf], config: &TaglintConfig) -> Result<Vec<PathBuf>> {
    let files = config.files_config();
    if paths.is_empty() {
        return ExportDiscovery::new(".").discover_files(&files);
    }

    let mut exports = Vec::new();
    for path in paths {
        if path.is_file() {
            // Explicit files bypass the include patterns
            exports.push(path.clone());
        } else if path.is_dir() {
            exports.extend(ExportDiscovery::new(path).discover_files(&files)?);
        } else if path.to_string_lossy().contains('*') {
            let pattern = path.to_string_lossy();
            let entries = glob::glob(&pattern).map_err(|e| {
                TaglintError::config_error(format!("Invalid glob pattern '{pattern}': {e}"))
            })?;
            exports.extend(entries.filter_map(|entry| entry.ok()).filter(|p| p.is_file()));
        } else {
            error!("Path does not exist: {}", path.display());
        }
    }

    let mut seen = HashSet::new();
    exports.retain(|path| seen.insert(path.clone()));
    Ok(exports)
}

/// Make each source path relative to the export's directory
fn resolve_source_paths(package: &mut Package, export: &Path) {
    let Some(dir) = export.parent().filter(|d| !d.as_os_str().is_empty()) else {
        return;
    };
    for file in &mut package.files {
        if file.path.is_relative() {
            file.path = dir.join(&file.path);
        }
    }
}

#[derive(Default)]
struct FixReport {
    applied: usize,
    /// `(file, fix id)` of each fix that was applied
    applied_ids: HashSet<(PathBuf, String)>,
    diffs: Vec<String>,
}

impl FixReport {
    fn resolves(&self, diagnostic: &Diagnostic) -> bool {
        if !diagnostic.has_safe_fixes() {
            return false;
        }
        Fix::collect(std::slice::from_ref(diagnostic), false)
            .into_iter()
            .any(|fix| {
                self.applied_ids
                    .contains(&(fix.location.file.clone(), fix.id.clone()))
            })
    }
}

/// Apply safe fixes per source file, writing the result when `write` is set and
/// collecting a unified diff otherwise
fn apply_suggested_fixes(
    diagnostics: &[Diagnostic],
    packages: &[Package],
    write: bool,
) -> Result<FixReport> {
    let mut by_file: BTreeMap<PathBuf, Vec<Fix>> = BTreeMap::new();
    for fix in Fix::collect(diagnostics, false) {
        by_file.entry(fix.location.file.clone()).or_default().push(fix);
    }

    let exported: HashMap<&Path, &str> = packages
        .iter()
        .flat_map(|p| p.files.iter())
        .filter_map(|f| f.source.as_deref().map(|src| (f.path.as_path(), src)))
        .collect();

    let mut report = FixReport::default();
    for (path, fixes) in by_file {
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                error!("{}", TaglintError::io_error(&path, e));
                continue;
            }
        };
        if exported
            .get(path.as_path())
            .is_some_and(|source| *source != content)
        {
            warn!(
                "{} changed since it was exported, skipping fixes",
                path.display()
            );
            continue;
        }

        let result = apply_fixes(&content, &fixes);
        for err in &result.errors {
            error!("Fix error in {}: {}", path.display(), err);
        }
        if result.applied_count == 0 {
            continue;
        }

        if write {
            std::fs::write(&path, &result.content)
                .map_err(|e| TaglintError::io_error(&path, e))?;
            info!("Applied {} fixes to {}", result.applied_count, path.display());
        } else {
            report
                .diffs
                .push(generate_unified_diff(&content, &result.content, &path));
        }

        report.applied += result.applied_count;
        report
            .applied_ids
            .extend(result.applied.into_iter().map(|id| (path.clone(), id)));
    }

    Ok(report)
}

/// Rules command implementation
pub fn rules_command(
    dialect: Option<Dialect>,
    format: ListFormat,
    config_path: Option<PathBuf>,
) -> Result<()> {
    debug!("Listing available rules");

    let config = ConfigLoader::load(config_path.as_deref(), None)?;
    let rules: Vec<_> = BUILTIN_RULES
        .iter()
        .filter(|rule| dialect.is_none() || rule.dialect.is_none() || rule.dialect == dialect)
        .collect();

    match format {
        ListFormat::Json => {
            let listing: Vec<_> = rules
                .iter()
                .map(|rule| {
                    serde_json::json!({
                        "id": rule.id,
                        "dialect": rule.dialect,
                        "defaultSeverity": rule.default_severity,
                        "severity": effective_severity(&config, rule.id, rule.default_severity),
                        "description": rule.description,
                    })
                })
                .collect();
            let json = serde_json::to_string_pretty(&listing).map_err(|e| {
                TaglintError::internal_error(format!("Failed to serialize rules: {e}"))
            })?;
            println!("{json}");
        }
        ListFormat::Human => {
            println!("Available Rules:");
            println!("================");
            for rule in &rules {
                let dialect = rule
                    .dialect
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "all".to_string());
                println!(
                    "  {:<28} {:<8} {:<8} {}",
                    rule.id,
                    dialect,
                    effective_severity(&config, rule.id, rule.default_severity),
                    rule.description
                );
            }
            println!("\nTotal: {} rules", rules.len());
        }
    }

    Ok(())
}

fn effective_severity(
    config: &TaglintConfig,
    rule_id: &str,
    default: taglint_core::Severity,
) -> String {
    match config.rule_severity(rule_id) {
        Some(RuleSeverity::Off) => "off".to_string(),
        Some(setting) => setting
            .to_severity()
            .map(|s| s.to_string())
            .unwrap_or_default(),
        None => default.to_string(),
    }
}

/// Config schema command implementation
pub fn config_schema_command() -> Result<()> {
    let schema = serde_json::to_string_pretty(&TaglintConfig::json_schema()).map_err(|e| {
        TaglintError::internal_error(format!("Failed to serialize schema: {e}"))
    })?;
    println!("{schema}");
    Ok(())
}

/// Config show command implementation
pub fn config_show_command(config_path: Option<PathBuf>) -> Result<()> {
    debug!("Showing configuration");

    let config = ConfigLoader::load(config_path.as_deref(), None)?;
    let resolved = TaglintConfig {
        dialects: Some(config.enabled_dialects()),
        linter: Some(config.linter_config()),
        files: Some(config.files_config()),
    };
    let json = serde_json::to_string_pretty(&resolved).map_err(|e| {
        TaglintError::internal_error(format!("Failed to serialize config: {e}"))
    })?;
    println!("{json}");
    Ok(())
}
