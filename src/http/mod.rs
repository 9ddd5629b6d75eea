//! HTTP boundary to the GraphQL service.
//!
//! This module provides the wire-level pieces the gateway client is built on:
//! [`StatusCode`] classification, the [`GraphQlRequest`] and
//! [`GraphQlResponse`] envelopes, and the [`Transport`] trait with its
//! `reqwest`-backed implementation.

use std::fmt;

pub mod request;
pub mod response;
pub mod transport;

pub use request::{GraphQlRequest, Variables};
pub use response::{GraphQlError, GraphQlResponse, ResponseError};
pub use transport::{ReqwestTransport, Transport, TransportError};

/// The HTTP status codes the gateway reasons about.
///
/// Only statuses that change the client's behavior are named; anything else
/// is carried around as a raw `u16` and treated as non-retriable.
///
/// # Examples
///
/// ```
/// use anigate::http::StatusCode;
///
/// let status = StatusCode::from_u16(503).unwrap();
/// assert_eq!(status, StatusCode::ServiceUnavailable);
/// assert!(status.is_retriable());
/// assert!(!StatusCode::BadRequest.is_retriable());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum StatusCode {
    // 4xx Client Error
    BadRequest = 400,
    NotFound = 404,
    RequestTimeout = 408,
    TooManyRequests = 429,

    // 5xx Server Error
    InternalServerError = 500,
    BadGateway = 502,
    ServiceUnavailable = 503,
    GatewayTimeout = 504,
}

impl StatusCode {
    /// Maps a raw status to a named one, or `None` if the gateway has no
    /// special handling for it.
    pub fn from_u16(code: u16) -> Option<Self> {
        Some(match code {
            400 => Self::BadRequest,
            404 => Self::NotFound,
            408 => Self::RequestTimeout,
            429 => Self::TooManyRequests,
            500 => Self::InternalServerError,
            502 => Self::BadGateway,
            503 => Self::ServiceUnavailable,
            504 => Self::GatewayTimeout,
            _ => return None,
        })
    }

    /// Returns the numeric status code as a `u16`.
    pub fn as_u16(self) -> u16 {
        self as u16
    }

    /// Returns `true` for statuses worth retrying: 408, 429, 500, 502, 503, 504.
    pub fn is_retriable(self) -> bool {
        matches!(
            self,
            Self::RequestTimeout
                | Self::TooManyRequests
                | Self::InternalServerError
                | Self::BadGateway
                | Self::ServiceUnavailable
                | Self::GatewayTimeout
        )
    }

    /// Returns the canonical reason phrase for this status code.
    pub fn canonical_reason(self) -> &'static str {
        match self {
            Self::BadRequest => "Bad Request",
            Self::NotFound => "Not Found",
            Self::RequestTimeout => "Request Timeout",
            Self::TooManyRequests => "Too Many Requests",
            Self::InternalServerError => "Internal Server Error",
            Self::BadGateway => "Bad Gateway",
            Self::ServiceUnavailable => "Service Unavailable",
            Self::GatewayTimeout => "Gateway Timeout",
        }
    }
}

/// Returns `true` if a raw status belongs to the retriable set.
pub fn is_retriable_status(code: u16) -> bool {
    StatusCode::from_u16(code).is_some_and(StatusCode::is_retriable)
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.as_u16(), self.canonical_reason())
    }
}

impl From<StatusCode> for u16 {
    fn from(code: StatusCode) -> u16 {
        code.as_u16()
    }
}
