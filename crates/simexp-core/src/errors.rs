//! Structured error types shared across simexp crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`SimExpError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (field names, paths, lengths, etc.).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for simexp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum SimExpError {
    /// Element-wise design given value lists of unequal length.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(ErrorInfo),
    /// A design input was not list-like or otherwise malformed.
    #[error("invalid design input: {0}")]
    InvalidDesignInput(ErrorInfo),
    /// No record grammar matched the requested field.
    #[error("field not found: {0}")]
    FieldNotFound(ErrorInfo),
    /// More than one record matched where exactly one was expected.
    #[error("ambiguous field: {0}")]
    AmbiguousField(ErrorInfo),
    /// The value cannot be represented in a record field.
    #[error("unsupported value type: {0}")]
    UnsupportedValueType(ErrorInfo),
    /// File system failures.
    #[error("io error: {0}")]
    Io(ErrorInfo),
    /// Serialization and schema errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl SimExpError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            SimExpError::ShapeMismatch(info)
            | SimExpError::InvalidDesignInput(info)
            | SimExpError::FieldNotFound(info)
            | SimExpError::AmbiguousField(info)
            | SimExpError::UnsupportedValueType(info)
            | SimExpError::Io(info)
            | SimExpError::Serde(info) => info,
        }
    }

    /// Wraps an I/O failure on `path` under the given code.
    pub fn io(code: &str, path: &Path, err: impl ToString) -> Self {
        SimExpError::Io(
            ErrorInfo::new(code, err.to_string()).with_context("path", path.display().to_string()),
        )
    }

    /// Wraps a (de)serialization failure under the given code.
    pub fn serde(code: &str, err: impl ToString) -> Self {
        SimExpError::Serde(ErrorInfo::new(code, err.to_string()))
    }
}
