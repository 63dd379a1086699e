//! Error definitions for all `bsq_emit` stages.

use thiserror::Error;

#[derive(Debug, Error)]
/// Top-level error type returned by public APIs.
pub enum EmitError {
    /// Source text could not be tokenized or parsed.
    #[error("parse error at {line}:{column}: {message}")]
    Parse {
        /// 1-based line of the offending token.
        line: usize,
        /// 1-based column of the offending token.
        column: usize,
        /// Human-readable description.
        message: String,
    },
    /// A construct the generator deliberately refuses (optional fields, valued enum members).
    #[error("unsupported feature: {0}")]
    Unsupported(String),
    /// The external analysis engine failed or could not be launched.
    #[error("toolchain error: {0}")]
    Toolchain(String),
    /// Malformed command arguments (entrypoint names, JSON argument lists).
    #[error("argument error: {0}")]
    Arguments(String),
    /// Missing or invalid toolchain configuration.
    #[error("config error: {0}")]
    Config(String),
    /// Filesystem I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON decoding or encoding failure.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EmitError {
    pub(crate) fn parse(line: usize, column: usize, message: impl Into<String>) -> Self {
        EmitError::Parse {
            line,
            column,
            message: message.into(),
        }
    }
}
