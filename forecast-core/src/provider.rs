use crate::{
    Config, Coordinates, ForecastResponse,
    error::{ForecastError, ProviderError},
    provider::openmeteo::OpenMeteoProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openmeteo;

/// A single upstream call for one location. Retrying is the caller's business.
#[async_trait]
pub trait ForecastProvider: Send + Sync + Debug {
    async fn fetch_forecast(&self, coords: Coordinates) -> Result<ForecastResponse, ProviderError>;
}

/// Construct the configured provider.
pub fn provider_from_config(config: &Config) -> Result<Box<dyn ForecastProvider>, ForecastError> {
    let provider = OpenMeteoProvider::from_config(&config.provider)?;
    Ok(Box::new(provider))
}
