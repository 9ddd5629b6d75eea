//! Errors surfaced to callers of the gateway.
//!
//! Transport detail never crosses this boundary: callers get one of four
//! outcomes and a user-presentable message.

use thiserror::Error;

use crate::http::is_retriable_status;

const GENERIC_MESSAGE: &str = "An unexpected error occurred. Please try again.";

/// Normalized failure of a gateway request.
///
/// # Examples
///
/// ```
/// use anigate::GatewayError;
///
/// assert_eq!(GatewayError::from_status(Some(429)), GatewayError::RateLimited);
/// assert_eq!(GatewayError::from_status(Some(404)), GatewayError::NotFound);
/// assert!(GatewayError::from_status(Some(503)).is_transient());
/// assert_eq!(
///     GatewayError::from_status(None).to_string(),
///     "An unexpected error occurred. Please try again."
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// The service answered 429.
    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,

    /// The service answered 404.
    #[error("The requested resource was not found.")]
    NotFound,

    /// A retriable status outlived every retry.
    #[error("{}", GENERIC_MESSAGE)]
    Transient { status: u16 },

    /// A failure outside the retriable set, surfaced without retrying.
    /// `status` is `None` when no HTTP status applies (network, decoding).
    #[error("{}", GENERIC_MESSAGE)]
    NonRetriable { status: Option<u16> },
}

impl GatewayError {
    /// Normalizes the final status of a failed request.
    pub fn from_status(status: Option<u16>) -> Self {
        match status {
            Some(429) => Self::RateLimited,
            Some(404) => Self::NotFound,
            Some(code) if is_retriable_status(code) => Self::Transient { status: code },
            other => Self::NonRetriable { status: other },
        }
    }

    /// Returns the HTTP status behind this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RateLimited => Some(429),
            Self::NotFound => Some(404),
            Self::Transient { status } => Some(*status),
            Self::NonRetriable { status } => *status,
        }
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient { .. })
    }
}
