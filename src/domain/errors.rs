use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("Cart is empty")]
    EmptyCart,
    #[error("{0}")]
    InvalidState(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Access denied")]
    Forbidden,
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Internal error: {0}")]
    Internal(String),
}
