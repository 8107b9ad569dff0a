//! Bounded retry loop around the upstream call.
//!
//! Open-Meteo occasionally answers without the hourly block. A response like
//! that is usable, but worth asking for again:
//! - attempt 1 fires immediately
//! - every further attempt waits twice as long as the previous wait
//! - the loop stops as soon as a response carries hourly data
//!
//! Transport and decode errors count as attempts too. They only surface when
//! no attempt produced a response at all.

use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::{
    error::{ForecastError, ProviderError},
    model::{AttemptRecord, Coordinates, FetchOutcome, ForecastResponse},
    provider::ForecastProvider,
};

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_INITIAL_DELAY)
    }
}

impl RetryPolicy {
    /// `max_attempts` below 1 is raised to 1.
    pub fn new(max_attempts: u32, initial_delay: Duration) -> Self {
        Self { max_attempts: max_attempts.max(1), initial_delay }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn initial_delay(&self) -> Duration {
        self.initial_delay
    }

    /// Wait that follows the given (1-based) attempt: `initial_delay * 2^(attempt - 1)`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }
        let factor = 2u32.saturating_pow(attempt - 1);
        self.initial_delay.saturating_mul(factor)
    }
}

fn has_hourly(outcome: &Result<ForecastResponse, ProviderError>) -> bool {
    matches!(outcome, Ok(response) if response.has_hourly())
}

/// Fetch a forecast, retrying while the hourly block is missing.
///
/// Returns the most recent successful response together with the number of
/// attempts made and whether that response carries hourly data.
pub async fn fetch_with_retries(
    provider: &dyn ForecastProvider,
    coords: Coordinates,
    policy: &RetryPolicy,
) -> Result<FetchOutcome, ForecastError> {
    let mut attempts = 1;
    let mut outcome = provider.fetch_forecast(coords).await;

    while !has_hourly(&outcome) && attempts < policy.max_attempts() {
        let delay = policy.delay_for_attempt(attempts);
        match &outcome {
            Ok(_) => warn!(attempt = attempts, ?delay, "forecast has no hourly block, retrying"),
            Err(e) => warn!(attempt = attempts, ?delay, error = %e, "forecast request failed, retrying"),
        }
        tokio::time::sleep(delay).await;

        attempts += 1;
        let next = provider.fetch_forecast(coords).await;
        outcome = match (outcome, next) {
            // Keep an earlier usable response over a fresh failure.
            (Ok(previous), Err(e)) => {
                debug!(attempt = attempts, error = %e, "keeping previous response");
                Ok(previous)
            }
            (_, next) => next,
        };
    }

    match outcome {
        Ok(response) => {
            let hourly_present = response.has_hourly();
            info!(attempts, hourly_present, %coords, "forecast fetched");
            Ok(FetchOutcome {
                response,
                record: AttemptRecord { attempts, hourly_present, completed_at: Utc::now() },
            })
        }
        Err(source) => {
            warn!(attempts, error = %source, %coords, "giving up on forecast");
            Err(ForecastError::FetchFailed { attempts, source })
        }
    }
}
