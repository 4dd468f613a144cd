//! Error types

use thiserror::Error;

/// Result type for connection operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by a [`Connection`](crate::Connection)
///
/// Transport failures are passed through as the underlying `reqwest` error.
#[derive(Debug, Error)]
pub enum Error {
    /// Failure reported by the HTTP transport
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// Host or relative path could not be turned into a URL
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Request parameters could not be encoded as JSON
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A resolved header value is not valid in an HTTP request
    #[error("Invalid header value for {0}")]
    InvalidHeader(String),

    /// JSON value is neither a number nor decimal text
    #[error("Not a quantity: {0}")]
    InvalidQuantity(String),

    /// Text could not be parsed as a decimal
    #[error("Decimal error: {0}")]
    Decimal(#[from] rust_decimal::Error),
}
