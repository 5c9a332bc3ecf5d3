//! Error types for Coffer core.

use thiserror::Error;

/// Core errors for record and token handling.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("malformed authority token: {0}")]
    MalformedToken(String),

    #[error("empty identifier: {0}")]
    EmptyIdentifier(&'static str),
}
