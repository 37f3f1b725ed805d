//! Error types for the rewrite API client.
//!
//! # Design
//! None of these reach callers of `RewriteServiceClient`: the facade turns
//! every one of them into a failure result. They stay typed for callers that
//! drive `ChimpClient` and a transport by hand.
//!
//! `ValidationError` messages are the exact text returned in a failure
//! result, so they name the missing field.

use thiserror::Error;

/// A required argument was missing. Raised before anything is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("AppID not set")]
    MissingAppId,

    #[error("No email specified")]
    MissingEmail,

    #[error("No API Key specified")]
    MissingApiKey,

    #[error("No text provided")]
    MissingText,
}

/// Errors returned by `ChimpClient` parse methods.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body did not match the expected JSON shape.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),
}

/// The request never produced a response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("{0}")]
    Request(String),
}

#[cfg(feature = "reqwest")]
impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else {
            TransportError::Request(err.to_string())
        }
    }
}

/// Invalid client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("application id is {len} characters long, at most {max} are accepted")]
    AppIdTooLong { len: usize, max: usize },

    #[error("invalid value for {var}: {message}")]
    InvalidEnv { var: &'static str, message: String },
}
