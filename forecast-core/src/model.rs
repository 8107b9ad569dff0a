use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.latitude, self.longitude)
    }
}

/// Conditions reported for "now" by the provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temperature_c: Option<f64>,
    pub wind_speed_kmh: Option<f64>,
    pub wind_direction_deg: Option<f64>,
    /// WMO weather interpretation code.
    pub weather_code: Option<u16>,
    pub time: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyEntry {
    /// Unix time of the start of the day (GMT+0, the UTC offset is applied when rendering).
    pub time: i64,
    pub temperature_max_c: Option<f64>,
    pub temperature_min_c: Option<f64>,
    pub precipitation_mm: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyEntry {
    pub time: i64,
    pub temperature_c: Option<f64>,
    pub precipitation_mm: Option<f64>,
    pub wind_speed_kmh: Option<f64>,
}

/// Details about how the provider produced a response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderMetadata {
    pub model: String,
    pub generation_time_ms: Option<f64>,
    pub timezone: String,
    pub utc_offset_seconds: i32,
    /// Grid-cell coordinates the provider actually used.
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResponse {
    pub current: Option<CurrentConditions>,
    pub daily: Vec<DailyEntry>,
    /// `None` when the provider left the hourly block out of this response.
    pub hourly: Option<Vec<HourlyEntry>>,
    pub metadata: ProviderMetadata,
}

impl ForecastResponse {
    pub fn has_hourly(&self) -> bool {
        self.hourly.as_ref().is_some_and(|hours| !hours.is_empty())
    }
}

/// What the retry loop went through to obtain a response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptRecord {
    pub attempts: u32,
    pub hourly_present: bool,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchOutcome {
    pub response: ForecastResponse,
    pub record: AttemptRecord,
}
