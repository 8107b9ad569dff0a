//! Shared helpers for unit tests.

use std::{
    collections::VecDeque,
    sync::{
        Mutex,
        atomic::{AtomicU32, Ordering},
    },
};

use async_trait::async_trait;

use crate::{
    error::ProviderError,
    model::{Coordinates, ForecastResponse},
    provider::ForecastProvider,
};

/// Provider that replays a fixed sequence of results, one per call.
#[derive(Debug, Default)]
pub struct ScriptedProvider {
    script: Mutex<VecDeque<Result<ForecastResponse, ProviderError>>>,
    calls: AtomicU32,
}

impl ScriptedProvider {
    pub fn new(script: impl IntoIterator<Item = Result<ForecastResponse, ProviderError>>) -> Self {
        Self { script: Mutex::new(script.into_iter().collect()), calls: AtomicU32::new(0) }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ForecastProvider for ScriptedProvider {
    async fn fetch_forecast(&self, _coords: Coordinates) -> Result<ForecastResponse, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("script exhausted after {} call(s)", self.calls()))
    }
}

pub fn server_error() -> Result<ForecastResponse, ProviderError> {
    Err(ProviderError::Status { status: 500, body: "upstream unavailable".to_string() })
}

pub mod fixtures {
    use crate::model::*;

    /// 2021-01-01T00:00:00Z
    pub const JAN_1_2021: i64 = 1_609_459_200;

    pub fn metadata() -> ProviderMetadata {
        ProviderMetadata {
            model: "best_match".to_string(),
            generation_time_ms: Some(0.5),
            timezone: "GMT".to_string(),
            utc_offset_seconds: 0,
            latitude: 49.48,
            longitude: 8.44,
            elevation: Some(97.0),
        }
    }

    pub fn daily() -> Vec<DailyEntry> {
        [(6.0, 0.0, 0.0), (7.0, -1.0, 1.2), (5.5, -2.0, 0.0)]
            .into_iter()
            .enumerate()
            .map(|(i, (max, min, precip))| DailyEntry {
                time: JAN_1_2021 + i as i64 * 86_400,
                temperature_max_c: Some(max),
                temperature_min_c: Some(min),
                precipitation_mm: Some(precip),
            })
            .collect()
    }

    pub fn hourly(count: usize) -> Vec<HourlyEntry> {
        (0..count)
            .map(|i| HourlyEntry {
                time: JAN_1_2021 + i as i64 * 3_600,
                temperature_c: Some(1.0),
                precipitation_mm: Some(0.0),
                wind_speed_kmh: Some(3.0),
            })
            .collect()
    }

    pub fn response(with_hourly: bool) -> ForecastResponse {
        ForecastResponse {
            current: Some(CurrentConditions {
                temperature_c: Some(5.0),
                wind_speed_kmh: Some(10.0),
                wind_direction_deg: Some(90.0),
                weather_code: Some(1),
                time: Some(JAN_1_2021),
            }),
            daily: daily(),
            hourly: with_hourly.then(|| hourly(48)),
            metadata: metadata(),
        }
    }
}
