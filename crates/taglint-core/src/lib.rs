//! taglint core
//!
//! Core engine for checking struct field tags. This crate provides the tag
//! micro-parser, the front-end model and type descriptors, the field traversal
//! shared by every dialect, diagnostics and autofix support.

pub mod autofix;
pub mod config;
pub mod console; // Terminal console utilities for rich output
pub mod diagnostics;
pub mod discovery;
pub mod error;
pub mod model;
pub mod result;
pub mod tag;
pub mod traversal;
pub mod types;

// Re-export commonly used types
pub use autofix::{Fix, FixResult, apply_fixes, generate_unified_diff};
pub use config::{
    ConfigLoader, Dialect, FilesConfiguration, LinterConfiguration, RuleSeverity, TaglintConfig,
};
pub use console::{Color, Console};
pub use diagnostics::{
    Applicability, CodeSuggestion, DefaultDiagnosticCollector, Diagnostic, DiagnosticCollector,
    DiagnosticRenderer, Location, OutputFormat, Severity, SourceMap,
};
pub use discovery::ExportDiscovery;
pub use error::{ErrorKind, TagSyntaxKind, TaglintError};
pub use model::{FieldDef, Package, Render, SourceFile, Span, StructDef, TagLiteral};
pub use result::{Result, ResultExt};
pub use tag::{ParsedTag, SKIP_MARKER, TagEntry, TagSet};
pub use traversal::{FieldContext, INVALID_TAG, TagChecker, run_tag_checker};
pub use types::{BasicKind, TypeDescriptor};

/// Initialize the tracing subscriber for logging
///
/// `RUST_LOG` takes precedence over `default_filter`.
pub fn init_tracing(default_filter: &str) {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false),
        )
        .try_init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
