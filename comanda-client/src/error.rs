//! Client error types

use thiserror::Error;

/// Cart business-rule violations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// Close was requested while unsent lines remain
    #[error("table has {count} unsent item(s), send or remove them first")]
    PendingItems { count: i32 },

    /// Send was requested with nothing to send
    #[error("no new items to send")]
    NothingToSend,
}

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Authentication required
    #[error("Authentication required")]
    Unauthorized,

    /// Server rejected the request
    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// Cart business rule violated
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Local storage error
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
