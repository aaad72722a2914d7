//! Error types for the husk core.
//!
//! The core library returns [`HuskError`]; the `husk` binary wraps these in
//! `anyhow` to attach command-level context before reporting them.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HuskError {
    /// A context or tag name failed validation (currently: empty).
    #[error("'{value}' is not a valid {kind} name")]
    Validation { kind: &'static str, value: String },

    /// A unique constraint on a context name or path was violated.
    #[error("{0} already exists")]
    DuplicateKey(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("store unavailable at {path}: {reason}")]
    StoreUnavailable { path: PathBuf, reason: String },

    #[error("{0} already exists (use --force to overwrite)")]
    AlreadyInitialized(PathBuf),

    #[error("malformed context marker {path}: {source}")]
    Marker {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type HuskResult<T> = Result<T, HuskError>;

impl HuskError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        HuskError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Whether a database error is a UNIQUE constraint violation.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}

/// Reject empty names for contexts and tags.
pub fn ensure_valid_name(kind: &'static str, name: &str) -> HuskResult<()> {
    if name.is_empty() {
        return Err(HuskError::Validation {
            kind,
            value: name.to_string(),
        });
    }
    Ok(())
}
