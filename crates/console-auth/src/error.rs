//! Error types for auth-service calls

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Auth service request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Auth service returned status {0}")]
    Status(u16),

    #[error("Auth service response missing {0}")]
    MissingField(&'static str),
}
