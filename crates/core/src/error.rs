//! Errors raised while building domain values from untrusted input.

use thiserror::Error;

pub type DomainResult<T> = Result<T, DomainError>;

/// Input that cannot become a domain value. Transport and storage failures
/// have their own error types in the crates that do IO.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("validation failed: {0}")]
    Validation(String),

    /// An id string did not parse; the message names the id type.
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(&'static str),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_the_detail() {
        assert_eq!(
            DomainError::validation("title must not be empty").to_string(),
            "validation failed: title must not be empty"
        );
        assert_eq!(
            DomainError::InvalidAmount("must not be negative").to_string(),
            "invalid amount: must not be negative"
        );
    }
}
