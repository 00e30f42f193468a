use thiserror::Error;

/// Input the cart refuses. State is left untouched whenever one is returned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CartError {
    #[error("invalid quantity {0}: expected a positive integer")]
    InvalidQuantity(i64),

    #[error("invalid cart snapshot: {0}")]
    InvalidSnapshot(String),
}
