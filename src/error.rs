//! # Error Handling
//!
//! This module defines the centralized error type for `cib-reconcile`. It uses
//! the `thiserror` library to build an `Error` enum whose variants carry the
//! context needed to explain a failed reconciliation to the caller.
//!
//! ## Key Components
//!
//! - **`Error`**: every failure the library can produce. Variants are grouped
//!   into two families by [`Error::kind`]:
//!   - *validation* failures (bad or missing parameter, referenced object
//!     absent, invalid role, malformed `key=value` token) are raised before
//!     any mutation of a fetched scope is attempted;
//!   - *access* failures (the external control surface exited non-zero, its
//!     output could not be decoded, or the document file could not be read)
//!     carry the external diagnostic text verbatim.
//!
//! - **`ErrorKind`**: the machine-readable classification placed in failure
//!   reports, so callers and tests never need to match on message text.
//!
//! - **`Result<T>`**: a type alias for `std::result::Result<T, Error>`.
//!
//! Nothing in the library retries. A caller that wants a retry re-runs the
//! whole reconciliation, which is safe because reconciliation is idempotent.

use serde::Serialize;
use thiserror::Error;

/// Main error type for cib-reconcile operations
#[derive(Error, Debug)]
pub enum Error {
    /// A parameter is missing, malformed, or inconsistent with another one.
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// A token in an attribute list did not have the `key=value` form.
    #[error("non key=value parameter: {token}")]
    InvalidParameter { token: String },

    /// A referenced resource does not exist in the `resources` scope.
    #[error("no such resource: {name}")]
    NoSuchResource { name: String },

    /// A referenced cluster node does not exist in the `nodes` scope.
    #[error("no such host: {name}")]
    NoSuchHost { name: String },

    /// A role suffix other than `master` or `slave` was given.
    #[error("invalid role: {role}")]
    InvalidRole { role: String },

    /// A role was requested for a resource whose enclosing object does not
    /// offer roles.
    #[error("resource {name} is not inside a {expected} (found {found})")]
    UnexpectedWrapper {
        name: String,
        expected: String,
        found: String,
    },

    /// The external control surface failed.
    #[error("{command} failed: {stderr}")]
    Access { command: String, stderr: String },

    /// A fetched document could not be decoded, or a scope was missing from it.
    #[error("Malformed configuration document: {message}")]
    MalformedDocument { message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A JSON serialization error, wrapped from `serde_json::Error`.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A regular expression error, wrapped from `regex::Error`.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

/// Machine-readable failure classification carried in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    Validation,
    Access,
}

impl Error {
    /// Shorthand for [`Error::Validation`].
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation {
            message: message.into(),
        }
    }

    /// Classify this error for reporting.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Access { .. } | Error::MalformedDocument { .. } | Error::Io(_) => {
                ErrorKind::Access
            }
            Error::Validation { .. }
            | Error::InvalidParameter { .. }
            | Error::NoSuchResource { .. }
            | Error::NoSuchHost { .. }
            | Error::InvalidRole { .. }
            | Error::UnexpectedWrapper { .. }
            | Error::Yaml(_)
            | Error::Json(_)
            | Error::Regex(_) => ErrorKind::Validation,
        }
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
