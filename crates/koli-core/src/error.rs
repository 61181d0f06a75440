//! Unified error handling for koli-core

use thiserror::Error;

/// Message shown when the server cannot be reached at all.
pub const CONNECT_FAILED_MSG: &str = "Network error: Unable to connect to server. \
Please check if the API URL is correct in settings.";

/// Message shown when the body is not JSON (usually an HTML error page from a wrong base URL).
pub const INVALID_RESPONSE_MSG: &str =
    "Server returned an invalid response. Please check if the API URL is correct.";

/// Errors raised by the remote call layer
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// No response reached us
    #[error("{0}")]
    Network(String),

    /// A response arrived with a non-2xx status; the body is never parsed
    #[error("Request failed with status {0}")]
    HttpStatus(u16),

    /// The body was not JSON or did not have the expected shape
    #[error("Server returned an invalid response. Please check if the API URL is correct.")]
    InvalidResponse(String),

    /// Well-formed JSON with `success != "true"`, carrying the server's message
    #[error("{0}")]
    Business(String),

    /// Nothing configured to send the request to
    #[error("API URL is not configured. Set it with 'koli config set api_base_url <url>'.")]
    MissingBaseUrl,

    /// The request body could not be serialized
    #[error("Failed to encode request: {0}")]
    Encode(String),
}

impl ApiError {
    pub fn business(msg: impl Into<String>) -> Self {
        ApiError::Business(msg.into())
    }

    /// HTTP status carried by this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::HttpStatus(code) => Some(*code),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Network("Network error: Request timed out".to_string())
        } else if err.is_connect() {
            ApiError::Network(CONNECT_FAILED_MSG.to_string())
        } else if let Some(status) = err.status() {
            ApiError::HttpStatus(status.as_u16())
        } else {
            ApiError::Network(format!("Network error: {}", err))
        }
    }
}

/// Core error type for koli-core
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Secure storage error: {0}")]
    SecureStore(#[from] keyring::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for koli-core
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Error::Storage(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(msg.into())
    }
}
