//! Diagnostic snapshots: a metadata header describing how a forecast was
//! obtained, followed by the formatted forecast itself.
//!
//! Files are named `forecast_<lat>_<lon>_<YYYYMMDD_HHMMSS>.txt`, with `.`
//! written as `p` and `-` as `m` in the coordinates.

use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::info;

use crate::{
    error::ForecastError,
    format::format_forecast,
    model::{AttemptRecord, Coordinates, ForecastResponse},
};

pub const FILE_PREFIX: &str = "forecast_";
pub const FILE_EXTENSION: &str = ".txt";
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

#[derive(Debug, Clone)]
pub struct DiagnosticWriter {
    dir: PathBuf,
}

impl DiagnosticWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write a snapshot stamped with the current UTC time.
    pub fn write(
        &self,
        coords: Coordinates,
        response: &ForecastResponse,
        record: &AttemptRecord,
    ) -> Result<PathBuf, ForecastError> {
        self.write_at(coords, response, record, Utc::now())
    }

    pub fn write_at(
        &self,
        coords: Coordinates,
        response: &ForecastResponse,
        record: &AttemptRecord,
        at: DateTime<Utc>,
    ) -> Result<PathBuf, ForecastError> {
        fs::create_dir_all(&self.dir)
            .map_err(|source| ForecastError::WriteFailed { path: self.dir.clone(), source })?;

        let path = self.dir.join(diagnostic_file_name(coords, at));
        fs::write(&path, render_diagnostic(response, record))
            .map_err(|source| ForecastError::WriteFailed { path: path.clone(), source })?;

        info!(path = %path.display(), attempts = record.attempts, "wrote diagnostic forecast");
        Ok(path)
    }
}

/// Header block, blank line, formatted forecast.
pub fn render_diagnostic(response: &ForecastResponse, record: &AttemptRecord) -> String {
    let meta = &response.metadata;
    let header = [
        "Metadata:".to_string(),
        format!("Timestamp: {}", record.completed_at.to_rfc3339()),
        format!("Attempts: {}", record.attempts),
        format!("Hourly present: {}", if record.hourly_present { "True" } else { "False" }),
        format!("Model: {}", meta.model),
        format!("GenerationTimeMs: {}", or_none(meta.generation_time_ms)),
        format!("Timezone: {}", meta.timezone),
        format!("UTC offset: {}", meta.utc_offset_seconds),
        format!("Latitude: {}", meta.latitude),
        format!("Longitude: {}", meta.longitude),
        format!("Elevation: {}", or_none(meta.elevation)),
    ];

    format!("{}\n\n{}\n", header.join("\n"), format_forecast(response))
}

pub fn diagnostic_file_name(coords: Coordinates, at: DateTime<Utc>) -> String {
    format!(
        "{FILE_PREFIX}{}_{}_{}{FILE_EXTENSION}",
        encode_coordinate(coords.latitude),
        encode_coordinate(coords.longitude),
        at.format(TIMESTAMP_FORMAT),
    )
}

/// Recover the coordinates and timestamp from a name built by [`diagnostic_file_name`].
pub fn parse_diagnostic_file_name(name: &str) -> Option<(Coordinates, DateTime<Utc>)> {
    let stem = name.strip_prefix(FILE_PREFIX)?.strip_suffix(FILE_EXTENSION)?;

    let mut parts = stem.splitn(3, '_');
    let latitude = decode_coordinate(parts.next()?)?;
    let longitude = decode_coordinate(parts.next()?)?;
    let at = NaiveDateTime::parse_from_str(parts.next()?, TIMESTAMP_FORMAT).ok()?.and_utc();

    Some((Coordinates::new(latitude, longitude), at))
}

fn encode_coordinate(value: f64) -> String {
    // Debug keeps the trailing ".0" on whole numbers.
    format!("{value:?}").replace('.', "p").replace('-', "m")
}

fn decode_coordinate(text: &str) -> Option<f64> {
    text.replace('p', ".").replace('m', "-").parse().ok()
}

fn or_none(value: Option<f64>) -> String {
    value.map_or_else(|| "None".to_string(), |v| v.to_string())
}
