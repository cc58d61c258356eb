//! API error types.

use thiserror::Error;

/// Errors from a single HTTP exchange with the LubeLogger server.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No HTTP response was obtained (connection refused, DNS, timeout, ...).
    #[error("Server unreachable: {0}")]
    Unreachable(String),

    /// The server answered with a non-success status.
    #[error("HTTP error! status: {status} - {body}")]
    Rejected { status: u16, body: String },

    /// The server answered with success but the body could not be decoded.
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),

    /// The request could not be built (malformed server address).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// True when the request never reached the server.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, ApiError::Unreachable(_))
    }

    pub(crate) fn from_transport(e: reqwest::Error) -> Self {
        if e.is_builder() {
            ApiError::InvalidRequest(e.to_string())
        } else {
            ApiError::Unreachable(e.to_string())
        }
    }
}
