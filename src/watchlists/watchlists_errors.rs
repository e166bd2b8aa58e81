use thiserror::Error;

/// Custom error type for watchlist-related operations
#[derive(Debug, Error)]
pub enum WatchlistError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("Ticker '{0}' is already on this watchlist")]
    DuplicateTicker(String),
}
