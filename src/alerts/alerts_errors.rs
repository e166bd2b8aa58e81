use thiserror::Error;

/// Custom error type for alert-related operations
#[derive(Debug, Error)]
pub enum AlertError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("Illegal lifecycle transition: {0}")]
    IllegalTransition(String),
}
