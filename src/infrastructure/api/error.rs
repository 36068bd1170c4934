use std::error::Error;
use std::fmt;

/// Represents errors that can occur in backend API operations
#[derive(Debug)]
pub enum ApiClientError {
    /// Error from the HTTP transport
    RequestError(reqwest::Error),
    /// The API returned a non-success status
    ApiError(String),
    /// The response body could not be decoded
    ResponseError(String),
}

impl fmt::Display for ApiClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiClientError::RequestError(e) => write!(f, "Request error: {}", e),
            ApiClientError::ApiError(msg) => write!(f, "API error: {}", msg),
            ApiClientError::ResponseError(msg) => write!(f, "Response error: {}", msg),
        }
    }
}

impl Error for ApiClientError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ApiClientError::RequestError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiClientError {
    fn from(error: reqwest::Error) -> Self {
        ApiClientError::RequestError(error)
    }
}
