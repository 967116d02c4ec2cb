//! Configuration file discovery and loading

use super::TaglintConfig;
use crate::error::TaglintError;
use crate::result::Result;
use std::path::{Path, PathBuf};

/// Config file names in priority order
const CONFIG_FILE_NAMES: &[&str] = &[
    ".taglintrc.json",
    ".taglintrc.toml",
    "taglint.yaml",
    "taglint.yml",
    "taglint.json",
];

/// Configuration loader for discovering and loading config files
pub struct ConfigLoader;

impl ConfigLoader {
    /// Auto-discover config file by traversing upward from start_path
    ///
    /// Searches for config files in the following order:
    /// 1. `.taglintrc.json`
    /// 2. `.taglintrc.toml`
    /// 3. `taglint.yaml`
    /// 4. `taglint.yml`
    /// 5. `taglint.json`
    ///
    /// Starts from the given directory and moves up the directory tree until
    /// a config is found or the filesystem root is reached.
    pub fn auto_discover(start_path: &Path) -> Result<Option<PathBuf>> {
        let mut current = start_path
            .canonicalize()
            .map_err(|e| TaglintError::config_error(format!("Invalid path: {e}")))?;

        loop {
            for filename in CONFIG_FILE_NAMES {
                let config_path = current.join(filename);
                if config_path.is_file() {
                    tracing::debug!("Found config: {}", config_path.display());
                    return Ok(Some(config_path));
                }
            }

            if let Some(parent) = current.parent() {
                current = parent.to_path_buf();
            } else {
                break;
            }
        }

        Ok(None)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<TaglintConfig> {
        TaglintConfig::load(path).map_err(|e| {
            TaglintError::config_error(format!(
                "Failed to load config from '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Load config from path or auto-discover
    ///
    /// An explicit path must exist. Without one, discovery starts at `start_dir`
    /// (or the current directory) and falls back to the default configuration when
    /// nothing is found.
    pub fn load(custom_path: Option<&Path>, start_dir: Option<&Path>) -> Result<TaglintConfig> {
        if let Some(path) = custom_path {
            if !path.exists() {
                return Err(TaglintError::config_error(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            return Self::load_from_file(path);
        }

        let search_dir = start_dir.unwrap_or_else(|| Path::new("."));
        match Self::auto_discover(search_dir)? {
            Some(config_path) => Self::load_from_file(&config_path),
            None => {
                tracing::debug!("No config file found, using defaults");
                Ok(TaglintConfig::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Dialect, RuleSeverity};
    use std::fs;
    use tempfile::TempDir;

    fn create_temp_config(dir: &Path, filename: &str, content: &str) -> PathBuf {
        let path = dir.join(filename);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_from_file_json() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_temp_config(
            temp_dir.path(),
            "taglint.json",
            r#"{
                "dialects": ["json"],
                "linter": {
                    "enabled": true,
                    "rules": {"json/same-tag-name": "error"}
                }
            }"#,
        );

        let config = ConfigLoader::load_from_file(&config_path).unwrap();
        assert_eq!(config.enabled_dialects(), vec![Dialect::Json]);
        assert_eq!(
            config.rule_severity("json/same-tag-name"),
            Some(RuleSeverity::Error)
        );
    }

    #[test]
    fn test_auto_discover_from_nested_dir() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("pkg/models");
        fs::create_dir_all(&nested).unwrap();
        create_temp_config(temp_dir.path(), "taglint.yaml", "dialects: [bson]\n");

        let found = ConfigLoader::auto_discover(&nested).unwrap();
        assert_eq!(found.unwrap().file_name().unwrap(), "taglint.yaml");
    }

    #[test]
    fn test_auto_discover_priority() {
        let temp_dir = TempDir::new().unwrap();
        create_temp_config(temp_dir.path(), "taglint.json", "{}");
        create_temp_config(temp_dir.path(), ".taglintrc.toml", "[linter]\nenabled = true\n");

        let found = ConfigLoader::auto_discover(temp_dir.path()).unwrap();
        assert_eq!(found.unwrap().file_name().unwrap(), ".taglintrc.toml");
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = ConfigLoader::load(Some(Path::new("nonexistent.json")), None);
        assert!(matches!(result, Err(TaglintError::ConfigError { .. })));
    }

    #[test]
    fn test_load_invalid_json() {
        let temp_dir = TempDir::new().unwrap();
        let config_path =
            create_temp_config(temp_dir.path(), "invalid.json", r#"{ invalid json }"#);
        assert!(ConfigLoader::load_from_file(&config_path).is_err());
    }

    #[test]
    fn test_load_explicit_path() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_temp_config(
            temp_dir.path(),
            "custom.yml",
            "linter:\n  enabled: false\n",
        );
        let config = ConfigLoader::load(Some(&config_path), None).unwrap();
        assert!(!config.is_linter_enabled());
    }
}
