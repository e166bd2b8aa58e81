use thiserror::Error;

/// Custom error type for position-related operations
#[derive(Debug, Error)]
pub enum PositionError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("Position for ticker '{0}' already exists in this portfolio")]
    DuplicateTicker(String),
}
