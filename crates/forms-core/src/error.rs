//! Error types for the forms core

use thiserror::Error;

/// Lookup failures in the form store.
///
/// The store itself never fails; these are produced by
/// [`Mutation::or_else`](crate::store::Mutation::or_else) for callers that
/// want an error channel instead of a silent no-op.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Form not found: {0}")]
    FormNotFound(String),

    #[error("Version not found: {0}")]
    VersionNotFound(String),

    #[error("Field not found: {0}")]
    FieldNotFound(String),

    #[error("Field index out of range: {from} -> {to} (buffer has {len} fields)")]
    IndexOutOfRange { from: usize, to: usize, len: usize },

    #[error("No form is being edited")]
    NotEditing,
}

/// Errors raised while applying user-supplied preview data
#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("Invalid JSON format: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Pre-fill data must be a JSON object")]
    NotAnObject,
}
