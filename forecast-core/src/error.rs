use std::{io, path::PathBuf};

use thiserror::Error;

/// Failure of a single upstream call.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("request to weather provider failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("weather provider returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode weather provider response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum ForecastError {
    #[error("failed to fetch forecast after {attempts} attempt(s)")]
    FetchFailed {
        attempts: u32,
        #[source]
        source: ProviderError,
    },

    #[error("failed to write diagnostic file {}", path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}
