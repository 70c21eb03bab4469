//! Error types for template rendering.
//!
//! This module provides [`RenderError`], the error type for every template
//! provider operation. It abstracts over the underlying engine's errors so that
//! views only ever see a stable set of variants.

use std::fmt;

/// Error type for template provider operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// Template syntax error or compilation failure.
    TemplateError(String),

    /// No template, explicit or default, matches the requested hash.
    TemplateNotFound(String),

    /// Data could not be converted into a template context.
    SerializationError(String),

    /// Other operational error raised while rendering.
    OperationError(String),
}

impl RenderError {
    /// Returns true if the error means the template hash was unknown.
    pub fn is_not_found(&self) -> bool {
        matches!(self, RenderError::TemplateNotFound(_))
    }
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::TemplateError(msg) => write!(f, "template error: {}", msg),
            RenderError::TemplateNotFound(name) => write!(f, "template not found: {}", name),
            RenderError::SerializationError(msg) => write!(f, "serialization error: {}", msg),
            RenderError::OperationError(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for RenderError {}

impl From<minijinja::Error> for RenderError {
    fn from(err: minijinja::Error) -> Self {
        use minijinja::ErrorKind;

        match err.kind() {
            ErrorKind::TemplateNotFound => RenderError::TemplateNotFound(err.to_string()),
            ErrorKind::SyntaxError
            | ErrorKind::BadEscape
            | ErrorKind::UndefinedError
            | ErrorKind::UnknownTest
            | ErrorKind::UnknownFunction
            | ErrorKind::UnknownFilter
            | ErrorKind::UnknownMethod => RenderError::TemplateError(err.to_string()),
            ErrorKind::BadSerialization => RenderError::SerializationError(err.to_string()),
            _ => RenderError::OperationError(err.to_string()),
        }
    }
}
