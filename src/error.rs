//! Error types for a DDNS update run.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Bad arguments or environment, raised before any network activity
    #[error("Configuration error: {0}")]
    Config(String),

    /// The API token was rejected or is not active
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("No zone named {zone} (available: {candidates:?})")]
    ZoneNotFound {
        zone: String,
        candidates: Vec<String>,
    },

    #[error("Multiple zones named {zone} (available: {candidates:?})")]
    AmbiguousZone {
        zone: String,
        candidates: Vec<String>,
    },

    /// Transport failure or non-success HTTP status
    #[error("Network error: {0}")]
    Network(String),

    /// The provider answered but reported `success: false`
    #[error("API request failed: {0}")]
    Api(String),

    #[error("Invalid IPv4 address: {0:?}")]
    InvalidAddress(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Auth(msg.into())
    }

    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    pub fn api(msg: impl Into<String>) -> Self {
        Self::Api(msg.into())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}
