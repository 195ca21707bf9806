use std::sync::Arc;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum LilError {
    #[error("I/O Error: {0}")]
    Io(#[from] Arc<std::io::Error>),

    #[error("HTTP Request Error: {0}")]
    Http(#[from] Arc<reqwest::Error>),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] Arc<serde_json::Error>),

    #[error("Semantic Versioning Error: {0}")]
    SemVer(#[from] Arc<semver::Error>),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("LINEAR_API_KEY environment variable not set")]
    MissingApiKey,

    #[error("API Error: {0}")]
    Api(String),

    #[error("GraphQL Error: {0}")]
    GraphQl(String),

    #[error("HttpError: {0}")]
    HttpError(String),

    #[error("Cache Error: {0}")]
    Cache(String),

    #[error("Validation Error: {0}")]
    ValidationError(String),

    #[error("Checksum Error: {0}")]
    ChecksumError(String),

    #[error("Parsing Error in {0}: {1}")]
    ParseError(&'static str, String),

    #[error("Failed to execute command: {0}")]
    CommandExecError(String),

    #[error("Resource Not Found: {0}")]
    NotFound(String),

    #[error("Generic Error: {0}")]
    Generic(String),
}

impl From<std::io::Error> for LilError {
    fn from(err: std::io::Error) -> Self {
        LilError::Io(Arc::new(err))
    }
}

impl From<reqwest::Error> for LilError {
    fn from(err: reqwest::Error) -> Self {
        LilError::Http(Arc::new(err))
    }
}

impl From<serde_json::Error> for LilError {
    fn from(err: serde_json::Error) -> Self {
        LilError::Json(Arc::new(err))
    }
}

impl From<semver::Error> for LilError {
    fn from(err: semver::Error) -> Self {
        LilError::SemVer(Arc::new(err))
    }
}

pub type Result<T> = std::result::Result<T, LilError>;
