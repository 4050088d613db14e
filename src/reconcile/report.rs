//! Structured result of one reconciliation.
//!
//! A report echoes every field of the request it answers (including the
//! `kind` tag) and adds `changed`. A failed reconciliation also carries
//! `failed: true`, the error text in `msg`, and its classification in
//! `error_kind`.

use crate::error::{Error, ErrorKind, Result};
use crate::kinds::ObjectKind;
use crate::request::Request;
use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Failure {
    pub failed: bool,
    pub msg: String,
    pub error_kind: ErrorKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    #[serde(skip)]
    pub kind: ObjectKind,
    #[serde(flatten)]
    pub echo: Map<String, Value>,
    pub changed: bool,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub failure: Option<Failure>,
}

impl Report {
    /// An unchanged, successful report for `request`.
    pub fn new(request: &Request) -> Self {
        let echo = match serde_json::to_value(request) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        };
        Self {
            kind: request.kind(),
            echo,
            changed: false,
            failure: None,
        }
    }

    pub fn with_changed(mut self, changed: bool) -> Self {
        self.changed = changed;
        self
    }

    /// Mark the report failed. A failed reconciliation commits nothing, so
    /// `changed` is reset.
    pub fn with_failure(mut self, error: &Error) -> Self {
        self.changed = false;
        self.failure = Some(Failure {
            failed: true,
            msg: error.to_string(),
            error_kind: error.kind(),
        });
        self
    }

    pub fn is_failed(&self) -> bool {
        self.failure.is_some()
    }

    /// Error text of a failed report.
    pub fn message(&self) -> Option<&str> {
        self.failure.as_ref().map(|failure| failure.msg.as_str())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
