// src/services/error.rs
use thiserror::Error;

/// Failure of an upstream fetch.
///
/// Whether a `FetchError` aborts the request or only blanks one field is decided
/// by the caller: the provider snapshot is fatal, the registry lookup is not.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("{0}")]
    Provider(String),

    #[error("upstream returned status {0}")]
    Status(u16),

    #[error("missing data: {0}")]
    MissingData(String),

    #[error("no registry identifier for ticker {0}")]
    UnknownIdentifier(String),

    #[error("could not parse page: {0}")]
    Parse(String),
}

pub type FetchResult<T> = std::result::Result<T, FetchError>;
