//! Discovery of front-end model exports
//!
//! Directories are walked with `walkdir`; each file's path relative to the root is
//! matched against the configured include and exclude globs.

use crate::config::FilesConfiguration;
use crate::error::TaglintError;
use crate::result::Result;
use glob::Pattern;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Finds model exports under a root directory
#[derive(Debug, Clone)]
pub struct ExportDiscovery {
    pub root_dir: PathBuf,
}

impl ExportDiscovery {
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    /// Every export under the root accepted by `files`, sorted by path
    pub fn discover_files(&self, files: &FilesConfiguration) -> Result<Vec<PathBuf>> {
        let filter = ExportFilter::new(files)?;
        let mut found = Vec::new();

        for entry in WalkDir::new(&self.root_dir).follow_links(false) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry
                .path()
                .strip_prefix(&self.root_dir)
                .unwrap_or(entry.path());
            if filter.accepts(relative) {
                found.push(entry.into_path());
            }
        }

        found.sort();
        debug!(
            "Discovered {} exports under {}",
            found.len(),
            self.root_dir.display()
        );
        Ok(found)
    }

    /// Check a single path against `files`, relative to the root
    pub fn should_include(&self, path: &Path, files: &FilesConfiguration) -> Result<bool> {
        let filter = ExportFilter::new(files)?;
        let relative = path.strip_prefix(&self.root_dir).unwrap_or(path);
        Ok(filter.accepts(relative))
    }
}

struct ExportFilter {
    include: Vec<Pattern>,
    exclude: Vec<Pattern>,
}

impl ExportFilter {
    fn new(files: &FilesConfiguration) -> Result<Self> {
        let defaults = FilesConfiguration::default();
        let include = files
            .include
            .as_ref()
            .or(defaults.include.as_ref())
            .map(|patterns| compile(patterns))
            .transpose()?
            .unwrap_or_default();
        let exclude = files
            .exclude
            .as_ref()
            .map(|patterns| compile(patterns))
            .transpose()?
            .unwrap_or_default();
        Ok(Self { include, exclude })
    }

    fn accepts(&self, relative: &Path) -> bool {
        self.include.iter().any(|p| p.matches_path(relative))
            && !self.exclude.iter().any(|p| p.matches_path(relative))
    }
}

fn compile(patterns: &[String]) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|pattern| {
            Pattern::new(pattern).map_err(|e| {
                TaglintError::config_error(format!("Invalid glob pattern '{pattern}': {e}"))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "{}").unwrap();
    }

    #[test]
    fn test_default_patterns() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "root.taglint.json");
        touch(dir.path(), "pkg/model.taglint.yaml");
        touch(dir.path(), "pkg/notes.json");
        touch(dir.path(), "vendor/dep/dep.taglint.json");

        let found = ExportDiscovery::new(dir.path())
            .discover_files(&FilesConfiguration::default())
            .unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            names,
            vec![
                PathBuf::from("pkg/model.taglint.yaml"),
                PathBuf::from("root.taglint.json"),
            ]
        );
    }

    #[test]
    fn test_custom_include_without_exclude() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a/export.json");
        touch(dir.path(), "vendor/export.json");

        let files = FilesConfiguration {
            include: Some(vec!["**/export.json".to_string()]),
            exclude: None,
        };
        let discovery = ExportDiscovery::new(dir.path());
        assert_eq!(discovery.discover_files(&files).unwrap().len(), 2);
        assert!(
            discovery
                .should_include(&dir.path().join("a/export.json"), &files)
                .unwrap()
        );
    }

    #[test]
    fn test_invalid_pattern_is_config_error() {
        let files = FilesConfiguration {
            include: Some(vec!["[".to_string()]),
            exclude: None,
        };
        let err = ExportDiscovery::new(".").discover_files(&files).unwrap_err();
        assert!(err.to_string().contains("Invalid glob pattern"));
    }
}
