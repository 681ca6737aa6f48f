//! Error types for andv Lambda functions.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in andv Lambda functions.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed selector, body or sign-in parameters
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Missing or unusable caller identity
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Not found error
    #[error("Not found: {0}")]
    NotFound(String),

    /// Object store or identity provider failed, or returned something undecodable
    #[error("Upstream failure: {0}")]
    UpstreamFailure(String),

    /// Neither the authorization code nor the refresh token could be exchanged
    #[error("Authentication exhausted")]
    AuthExhausted,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Response construction error
    #[error("HTTP error: {0}")]
    Http(#[from] lambda_http::http::Error),
}

impl Error {
    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Error::InvalidInput(_) | Error::AuthExhausted => 400,
            Error::Unauthorized(_) => 401,
            Error::NotFound(_) => 404,
            Error::UpstreamFailure(_) => 502,
            _ => 500,
        }
    }

    /// Message safe to hand back to the caller. Server-side details stay in the logs.
    pub fn client_message(&self) -> String {
        match self.status_code() {
            500 => "Internal error".to_string(),
            502 => "Upstream service failure".to_string(),
            _ => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(Error::InvalidInput("x".into()).status_code(), 400);
        assert_eq!(Error::AuthExhausted.status_code(), 400);
        assert_eq!(Error::Unauthorized("x".into()).status_code(), 401);
        assert_eq!(Error::NotFound("x".into()).status_code(), 404);
        assert_eq!(Error::UpstreamFailure("x".into()).status_code(), 502);
        assert_eq!(Error::Config("x".into()).status_code(), 500);
    }

    #[test]
    fn test_upstream_details_are_not_exposed() {
        let err = Error::UpstreamFailure("s3://bucket/date-events/alice.json: access denied".into());
        assert_eq!(err.client_message(), "Upstream service failure");

        let err = Error::InvalidInput("currentMonth must look like YYYY-MM".into());
        assert_eq!(
            err.client_message(),
            "Invalid input: currentMonth must look like YYYY-MM"
        );
    }
}
