//! Error types shared across the Bookwise client.

use thiserror::Error;

/// Errors produced by the REST boundary and the request cache.
///
/// The variants follow the failure taxonomy the UI actually distinguishes:
/// transport problems, authentication rejections, unexpected status codes,
/// and undecodable payloads. `Cancelled` is client-local: it is reported to
/// cache waiters whose entry was purged (logout) while their request was
/// still in flight.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// Network/transport failure (DNS, connection reset, fetch rejection).
    #[error("network error: {0}")]
    Network(String),

    /// Non-2xx response that is not a 401.
    #[error("request failed with status {code}: {detail}")]
    Status { code: u16, detail: String },

    /// 401 from a credentialed endpoint.
    #[error("not authenticated")]
    Unauthorized,

    /// 2xx response whose body did not match the expected shape.
    #[error("malformed response: {0}")]
    Decode(String),

    /// The cache entry backing this request was evicted mid-flight.
    #[error("request cancelled")]
    Cancelled,
}

impl ApiError {
    /// True when the error means the session cookie was missing or rejected.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }
}
