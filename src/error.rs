use thiserror::Error;

/// Errors raised by descriptor fetch wrappers.
///
/// These surface synchronously to their direct caller; the engine wraps them
/// in [`ResolveError::FetchFailed`] before delivering them through callbacks.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),

    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("request timed out")]
    Timeout,

    #[error("failed to decode descriptor: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if err.is_decode() {
            FetchError::Decode(err.to_string())
        } else {
            FetchError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Decode(err.to_string())
    }
}

/// Failure taxonomy delivered through the engine's error callbacks.
///
/// None of these cross the public resolve entry points as a return error;
/// callers always get an immediately usable placeholder or partial result.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// A required capability is missing in the host. Reported once per task,
    /// never retried.
    #[error("required capability unavailable: {0}")]
    DependencyUnavailable(&'static str),

    /// Descriptor retrieval failed. Recoverable; retried under the polling
    /// policy.
    #[error("descriptor fetch failed: {0}")]
    FetchFailed(#[from] FetchError),

    /// Artifact retrieval or decode failed. Recoverable; retried under the
    /// polling policy.
    #[error("failed to load artifact from '{url}': {reason}")]
    LoadFailed { url: String, reason: String },

    /// The polling ceiling was reached without success. Terminal.
    #[error("polling ceiling reached after {attempts} attempt(s)")]
    PollingExhausted { attempts: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_error_display() {
        let err = FetchError::Server {
            status: 503,
            message: "unavailable".into(),
        };
        assert!(err.to_string().contains("503"));
        assert!(FetchError::Timeout.to_string().contains("timed out"));
    }

    #[test]
    fn resolve_error_wraps_fetch_error() {
        let err: ResolveError = FetchError::Network("refused".into()).into();
        assert!(matches!(err, ResolveError::FetchFailed(_)));
        assert!(err.to_string().contains("refused"));
    }

    #[test]
    fn exhausted_reports_attempts() {
        let err = ResolveError::PollingExhausted { attempts: 3 };
        assert!(err.to_string().contains('3'));
    }
}
