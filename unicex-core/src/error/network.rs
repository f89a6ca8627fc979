//! Transport-level failures.

use std::error::Error as StdError;
use thiserror::Error;

use super::ErrorKind;

/// Failures that happen before any response body is received.
///
/// No variant exposes `reqwest` types, so the HTTP stack can change without
/// breaking callers.
///
/// # Example
///
/// ```rust
/// use unicex_core::error::{ErrorKind, NetworkError};
///
/// let err = NetworkError::ConnectionFailed("connection refused".to_string());
/// assert_eq!(err.kind(), ErrorKind::NetworkError);
/// assert_eq!(NetworkError::Timeout.kind(), ErrorKind::RequestTimeout);
/// ```
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum NetworkError {
    /// Request timed out.
    #[error("Request timeout")]
    Timeout,

    /// Connection could not be established.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// The body could not be read to completion.
    #[error("Failed to read response body: {0}")]
    BodyRead(String),

    /// Opaque transport error for anything else.
    #[error("Transport error")]
    Transport(#[source] Box<dyn StdError + Send + Sync + 'static>),
}

impl NetworkError {
    /// Position of this failure in the taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            NetworkError::Timeout => ErrorKind::RequestTimeout,
            _ => ErrorKind::NetworkError,
        }
    }
}
