use thiserror::Error;

/// Classified failure of one authoritative-classifier call.
///
/// These are the only errors eligible for fallback degradation; operational
/// tooling distinguishes "slow" from "down" from "misbehaving" by the kind.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The endpoint did not answer within the configured bound.
    #[error("authoritative classifier timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// Transport-level failure: connection refused, DNS, TLS.
    #[error("authoritative classifier unreachable: {0}")]
    Unavailable(String),

    /// The endpoint answered with a non-success status.
    #[error("authoritative classifier returned HTTP {status}: {message}")]
    Protocol { status: u16, message: String },

    /// A success status whose body is not the expected structured object.
    #[error("authoritative classifier returned an invalid body: {0}")]
    InvalidResponse(String),

    /// Anything the taxonomy does not name.
    #[error("unexpected failure calling authoritative classifier: {0}")]
    Unknown(String),
}

impl RemoteError {
    /// Stable machine-readable kind for logs and error payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Timeout { .. } => "timeout",
            Self::Unavailable(_) => "unavailable",
            Self::Protocol { .. } => "protocol",
            Self::InvalidResponse(_) => "invalid_response",
            Self::Unknown(_) => "unknown",
        }
    }
}
