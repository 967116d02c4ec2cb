//! Error types and handling for taglint operations

use std::path::PathBuf;
use thiserror::Error;

/// Reasons a `key:"value"` tag literal can fail to parse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagSyntaxKind {
    /// The key is empty or starts with a forbidden byte
    Key,
    /// The key is not followed by `:`
    Tag,
    /// The value is not a well-formed quoted string
    Value,
}

impl std::fmt::Display for TagSyntaxKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TagSyntaxKind::Key => write!(f, "bad syntax for struct tag key"),
            TagSyntaxKind::Tag => write!(f, "bad syntax for struct tag pair"),
            TagSyntaxKind::Value => write!(f, "bad syntax for struct tag value"),
        }
    }
}

/// Main error type for taglint operations
#[derive(Debug, Error)]
pub enum TaglintError {
    /// A quoted literal could not be unquoted
    #[error("Invalid quoted literal {literal:?}: {reason}")]
    Unquote { literal: String, reason: String },

    /// A tag literal does not follow the `key:"value"` grammar
    #[error("{kind}: {tag:?}")]
    TagSyntax { kind: TagSyntaxKind, tag: String },

    /// Configuration loading or validation errors
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// Front-end export could not be loaded
    #[error("Model error for '{path}': {message}")]
    ModelError { path: PathBuf, message: String },

    /// File system I/O errors
    #[error("IO error for path '{path}': {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Autofix engine errors
    #[error("Autofix error: {message}")]
    AutofixError { message: String },

    /// Generic internal errors
    #[error("Internal error: {message}")]
    InternalError { message: String },
}

/// Error kind enumeration for categorizing errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    Tag,
    Config,
    Model,
    Io,
    Autofix,
    Internal,
}

impl TaglintError {
    /// Get the error kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            TaglintError::Unquote { .. } | TaglintError::TagSyntax { .. } => ErrorKind::Tag,
            TaglintError::ConfigError { .. } => ErrorKind::Config,
            TaglintError::ModelError { .. } => ErrorKind::Model,
            TaglintError::IoError { .. } => ErrorKind::Io,
            TaglintError::AutofixError { .. } => ErrorKind::Autofix,
            TaglintError::InternalError { .. } => ErrorKind::Internal,
        }
    }

    /// Check if this error is recoverable (can continue processing other fields or files)
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Tag | ErrorKind::Model | ErrorKind::Autofix
        )
    }

    /// Create an unquote error
    pub fn unquote(literal: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Unquote {
            literal: literal.into(),
            reason: reason.into(),
        }
    }

    /// Create a tag syntax error
    pub fn tag_syntax(kind: TagSyntaxKind, tag: impl Into<String>) -> Self {
        Self::TagSyntax {
            kind,
            tag: tag.into(),
        }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create a model loading error
    pub fn model_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ModelError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an IO error with path context
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            source,
        }
    }

    /// Create an autofix error
    pub fn autofix_error(message: impl Into<String>) -> Self {
        Self::AutofixError {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }
}

/// Convert from std::io::Error
impl From<std::io::Error> for TaglintError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError {
            path: PathBuf::new(),
            source: err,
        }
    }
}
