use crate::parking_api::normalizer::NormalizeError;
use thiserror::Error;

/// Why a single fetch attempt failed. Every variant is terminal for that
/// attempt only; the next tick starts from scratch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// DNS failure, refused connection, timeout, broken body stream.
    #[error("Network error: {message}")]
    Network { message: String },

    /// The server answered with a non-2xx status.
    #[error("Server error: {status}")]
    Server { status: u16 },

    /// Body is not JSON, has no `success` flag, or reports `success=false`.
    #[error("{message}")]
    Protocol { message: String },

    /// A device record could not be normalized.
    #[error("Error parsing data: {message}")]
    Parse { message: String },
}

impl From<NormalizeError> for FetchError {
    fn from(e: NormalizeError) -> Self {
        FetchError::Parse {
            message: e.to_string(),
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        FetchError::Network {
            message: e.to_string(),
        }
    }
}
