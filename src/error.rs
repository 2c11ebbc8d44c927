//! Error types for documentation generation, loading and validation.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by a plugin while enriching a context.
#[derive(Debug, Error)]
pub enum PluginError {
    #[error("missing {what} for {target}")]
    MissingMetadata { target: String, what: String },

    #[error("{message}")]
    Rejected { message: String },
}

impl PluginError {
    /// Convenience constructor for plugin-specific failures.
    pub fn rejected(message: impl Into<String>) -> Self {
        PluginError::Rejected {
            message: message.into(),
        }
    }
}

/// Errors aborting a generation pass for one group.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("plugin '{plugin}' failed on {target}: {source}")]
    Plugin {
        plugin: String,
        target: String,
        #[source]
        source: PluginError,
    },
}

impl GenerationError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        2
    }
}

/// Errors reading discovery output or configuration from disk.
#[derive(Debug, Error)]
pub enum LoadError {
    // IO errors (exit code 3)
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Parse errors (exit code 2)
    #[error("invalid JSON in {path}: {source}")]
    InvalidJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl LoadError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            LoadError::FileNotFound { .. } | LoadError::ReadError { .. } => 3,
            LoadError::InvalidJson { .. } => 2,
        }
    }
}

/// Errors turning a configuration into a runnable docket.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("group name must not be blank")]
    BlankGroupName,

    #[error("invalid path pattern \"{pattern}\": {source}")]
    InvalidPathPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("duplicate group \"{name}\"")]
    DuplicateGroup { name: String },
}

impl ConfigError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            ConfigError::Load(e) => e.exit_code(),
            _ => 2,
        }
    }
}

/// Errors validating a rendered document against its wire schema.
#[derive(Debug, Error)]
pub enum ValidateError {
    #[error("invalid wire schema: {message}")]
    InvalidSchema { message: String },

    #[error("cannot render document: {0}")]
    Render(#[from] serde_json::Error),

    #[error("document failed validation with {} error(s)", errors.len())]
    Invalid { errors: Vec<SchemaError> },
}

impl ValidateError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            ValidateError::InvalidSchema { .. } | ValidateError::Render(_) => 2,
            ValidateError::Invalid { .. } => 1,
        }
    }
}

/// Single validation error with path context.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SchemaError {
    /// JSON Pointer (RFC 6901) to the invalid field.
    pub path: String,
    /// Human-readable error message.
    pub message: String,
}

impl std::fmt::Display for SchemaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}
