//! Core library for the `forecast` service.
//!
//! This crate defines:
//! - An Open-Meteo client behind the [`ForecastProvider`] seam
//! - A bounded retry loop for responses that come back without hourly data
//! - Text rendering of forecasts and diagnostic snapshot files
//! - Configuration handling
//!
//! [`ForecastService`] ties these together into the two public operations,
//! `get_forecast` and `save_raw_forecast`.

pub mod config;
pub mod diagnostic;
pub mod error;
pub mod format;
pub mod model;
pub mod provider;
pub mod retry;
pub mod service;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{Config, ProviderConfig, RetryConfig};
pub use diagnostic::DiagnosticWriter;
pub use error::{ForecastError, ProviderError};
pub use format::format_forecast;
pub use model::{
    AttemptRecord, Coordinates, CurrentConditions, DailyEntry, FetchOutcome, ForecastResponse,
    HourlyEntry, ProviderMetadata,
};
pub use provider::{ForecastProvider, openmeteo::OpenMeteoProvider};
pub use retry::{RetryPolicy, fetch_with_retries};
pub use service::ForecastService;
