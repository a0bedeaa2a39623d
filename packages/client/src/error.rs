//! Error types for the chat client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server refused the join request (no membership was established)
    #[error("Server refused the connection: {0}")]
    Rejected(String),

    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),
}
