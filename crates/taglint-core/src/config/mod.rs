//! Configuration system for taglint
//!
//! - JSON, TOML and YAML configuration files
//! - Auto-discovery by traversing up directories
//! - Strong typing with serde and JSON Schema generation via schemars
//!
//! ## Configuration Discovery
//!
//! When no explicit config path is provided, the linter searches for configuration
//! files starting from the current directory and moving up the directory tree until a
//! config is found or the filesystem root is reached.
//!
//! ## Example Configuration
//!
//! ```json
//! {
//!   "dialects": ["json", "bson"],
//!   "linter": {
//!     "enabled": true,
//!     "rules": {
//!       "json/same-tag-name": "error",
//!       "bson/minsize-shape": "off"
//!     }
//!   },
//!   "files": {
//!     "include": ["**/*.taglint.json"],
//!     "exclude": ["**/vendor/**"]
//!   }
//! }
//! ```

mod loader;
mod taglint_config;

pub use loader::ConfigLoader;
pub use taglint_config::{
    Dialect, FilesConfiguration, LinterConfiguration, RuleSeverity, TaglintConfig,
};
