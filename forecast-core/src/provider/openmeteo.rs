use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::{
    config::ProviderConfig,
    error::{ForecastError, ProviderError},
    model::{
        Coordinates, CurrentConditions, DailyEntry, ForecastResponse, HourlyEntry,
        ProviderMetadata,
    },
};

use super::ForecastProvider;

/// Model name Open-Meteo uses when no explicit model is requested.
pub const DEFAULT_MODEL: &str = "best_match";

const DAILY_VARIABLES: &str = "temperature_2m_max,temperature_2m_min,precipitation_sum";
const HOURLY_VARIABLES: &str = "temperature_2m,precipitation,wind_speed_10m";

#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    base_url: String,
    model: Option<String>,
    http: Client,
}

impl OpenMeteoProvider {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), model: None, http: Client::new() }
    }

    pub fn from_config(config: &ProviderConfig) -> Result<Self, ForecastError> {
        let http = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self { base_url: config.base_url.clone(), model: config.model.clone(), http })
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    fn query(&self, coords: Coordinates) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("latitude", coords.latitude.to_string()),
            ("longitude", coords.longitude.to_string()),
            ("current_weather", "true".to_string()),
            ("daily", DAILY_VARIABLES.to_string()),
            ("hourly", HOURLY_VARIABLES.to_string()),
            ("timezone", "auto".to_string()),
            ("timeformat", "unixtime".to_string()),
        ];
        if let Some(model) = &self.model {
            query.push(("models", model.clone()));
        }
        query
    }

    fn model_name(&self) -> String {
        self.model.clone().unwrap_or_else(|| DEFAULT_MODEL.to_string())
    }
}

#[async_trait]
impl ForecastProvider for OpenMeteoProvider {
    #[instrument(skip(self, coords), fields(lat = coords.latitude, lon = coords.longitude))]
    async fn fetch_forecast(&self, coords: Coordinates) -> Result<ForecastResponse, ProviderError> {
        debug!(url = %self.base_url, "requesting Open-Meteo forecast");

        let res = self.http.get(&self.base_url).query(&self.query(coords)).send().await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let parsed: OmResponse = serde_json::from_str(&body)?;
        let response = parsed.into_forecast(self.model_name());

        debug!(
            daily = response.daily.len(),
            hourly = response.hourly.as_ref().map_or(0, Vec::len),
            "decoded Open-Meteo forecast"
        );

        Ok(response)
    }
}

#[derive(Debug, Deserialize)]
struct OmCurrentWeather {
    time: Option<i64>,
    temperature: Option<f64>,
    windspeed: Option<f64>,
    winddirection: Option<f64>,
    weathercode: Option<u16>,
}

#[derive(Debug, Deserialize)]
struct OmDaily {
    #[serde(default)]
    time: Vec<i64>,
    #[serde(default)]
    temperature_2m_max: Vec<Option<f64>>,
    #[serde(default)]
    temperature_2m_min: Vec<Option<f64>>,
    #[serde(default)]
    precipitation_sum: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct OmHourly {
    #[serde(default)]
    time: Vec<i64>,
    #[serde(default)]
    temperature_2m: Vec<Option<f64>>,
    #[serde(default)]
    precipitation: Vec<Option<f64>>,
    #[serde(default)]
    wind_speed_10m: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct OmResponse {
    latitude: f64,
    longitude: f64,
    generationtime_ms: Option<f64>,
    #[serde(default)]
    utc_offset_seconds: i32,
    #[serde(default)]
    timezone: String,
    elevation: Option<f64>,
    current_weather: Option<OmCurrentWeather>,
    daily: Option<OmDaily>,
    hourly: Option<OmHourly>,
}

impl OmResponse {
    fn into_forecast(self, model: String) -> ForecastResponse {
        let current = self.current_weather.map(|c| CurrentConditions {
            temperature_c: c.temperature,
            wind_speed_kmh: c.windspeed,
            wind_direction_deg: c.winddirection,
            weather_code: c.weathercode,
            time: c.time,
        });

        let daily = self
            .daily
            .map(|d| {
                d.time
                    .iter()
                    .enumerate()
                    .map(|(i, &time)| DailyEntry {
                        time,
                        temperature_max_c: value_at(&d.temperature_2m_max, i),
                        temperature_min_c: value_at(&d.temperature_2m_min, i),
                        precipitation_mm: value_at(&d.precipitation_sum, i),
                    })
                    .collect()
            })
            .unwrap_or_default();

        // An hourly block with no timestamps is as good as no block at all.
        let hourly = self.hourly.filter(|h| !h.time.is_empty()).map(|h| {
            h.time
                .iter()
                .enumerate()
                .map(|(i, &time)| HourlyEntry {
                    time,
                    temperature_c: value_at(&h.temperature_2m, i),
                    precipitation_mm: value_at(&h.precipitation, i),
                    wind_speed_kmh: value_at(&h.wind_speed_10m, i),
                })
                .collect()
        });

        ForecastResponse {
            current,
            daily,
            hourly,
            metadata: ProviderMetadata {
                model,
                generation_time_ms: self.generationtime_ms,
                timezone: self.timezone,
                utc_offset_seconds: self.utc_offset_seconds,
                latitude: self.latitude,
                longitude: self.longitude,
                elevation: self.elevation,
            },
        }
    }
}

fn value_at(values: &[Option<f64>], i: usize) -> Option<f64> {
    values.get(i).copied().flatten()
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
