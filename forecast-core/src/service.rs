use std::path::PathBuf;

use tracing::instrument;

use crate::{
    config::Config,
    diagnostic::DiagnosticWriter,
    error::ForecastError,
    format::format_forecast,
    model::{Coordinates, FetchOutcome},
    provider::{ForecastProvider, provider_from_config},
    retry::{RetryPolicy, fetch_with_retries},
};

/// The two operations exposed to callers: a readable forecast, and a saved
/// diagnostic snapshot of one.
#[derive(Debug)]
pub struct ForecastService {
    provider: Box<dyn ForecastProvider>,
    policy: RetryPolicy,
    writer: DiagnosticWriter,
}

impl ForecastService {
    pub fn new(
        provider: Box<dyn ForecastProvider>,
        policy: RetryPolicy,
        data_dir: impl Into<PathBuf>,
    ) -> Self {
        Self { provider, policy, writer: DiagnosticWriter::new(data_dir) }
    }

    pub fn from_config(config: &Config) -> Result<Self, ForecastError> {
        Ok(Self::new(provider_from_config(config)?, config.retry.policy(), &config.data_dir))
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn data_dir(&self) -> &std::path::Path {
        self.writer.dir()
    }

    pub async fn fetch(&self, coords: Coordinates) -> Result<FetchOutcome, ForecastError> {
        fetch_with_retries(self.provider.as_ref(), coords, &self.policy).await
    }

    /// Human-readable forecast for the location.
    #[instrument(skip(self))]
    pub async fn get_forecast(&self, latitude: f64, longitude: f64) -> Result<String, ForecastError> {
        let outcome = self.fetch(Coordinates::new(latitude, longitude)).await?;
        Ok(format_forecast(&outcome.response))
    }

    /// Fetch a forecast and save it with its attempt metadata; returns the file path.
    #[instrument(skip(self))]
    pub async fn save_raw_forecast(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<PathBuf, ForecastError> {
        let coords = Coordinates::new(latitude, longitude);
        let outcome = self.fetch(coords).await?;
        self.writer.write(coords, &outcome.response, &outcome.record)
    }
}
