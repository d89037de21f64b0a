//! Error types for remote list operations.

use thiserror::Error;

/// Errors that can occur talking to the remote list store.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Network connectivity error (DNS, connection refused, etc.).
    #[error("Network error: {0}")]
    Network(String),

    /// Request exceeded deadline.
    #[error("Request timeout after {0}ms")]
    Timeout(u64),

    /// Store returned an error response (4xx, 5xx).
    #[error("Remote list error {status}: {message}")]
    Upstream { status: u16, message: String },

    /// Store response doesn't match the expected format.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// An operation was attempted without an established session.
    #[error("No active session; connect first")]
    NoSession,

    /// The store rejected the credentials during connect.
    #[error("Authentication to {site_url} failed: {message}")]
    Authentication { site_url: String, message: String },
}
