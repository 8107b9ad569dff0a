//! Human-readable rendering of a [`ForecastResponse`].
//!
//! Output is three sections separated by `---` lines: current conditions,
//! the next few days, and the next 24 hours (or a note that the provider
//! left the hourly block out).

use chrono::DateTime;

use crate::model::{CurrentConditions, DailyEntry, ForecastResponse, HourlyEntry};

pub const DAILY_ENTRIES: usize = 3;
pub const HOURLY_ENTRIES: usize = 24;

pub const SECTION_SEPARATOR: &str = "\n---\n";
pub const CURRENT_UNAVAILABLE: &str = "Current weather: not available.";
pub const DAILY_UNAVAILABLE: &str = "Daily forecast: not available.";
pub const HOURLY_UNAVAILABLE: &str = "Hourly forecast: not available.";

/// Map a WMO weather interpretation code to a short description.
pub fn describe_weather_code(code: Option<u16>) -> String {
    let Some(code) = code else {
        return "Unknown".to_string();
    };

    let text = match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Fog",
        48 => "Depositing rime fog",
        51 => "Drizzle: Light",
        53 => "Drizzle: Moderate",
        55 => "Drizzle: Dense",
        61 => "Rain: Slight",
        63 => "Rain: Moderate",
        65 => "Rain: Heavy",
        71 => "Snow: Slight",
        73 => "Snow: Moderate",
        75 => "Snow: Heavy",
        77 => "Snow grains",
        80 => "Rain showers: Slight",
        81 => "Rain showers: Moderate",
        82 => "Rain showers: Violent",
        95 => "Thunderstorm: Slight or moderate",
        96 => "Thunderstorm with slight hail",
        99 => "Thunderstorm with heavy hail",
        other => return format!("Code {other}"),
    };
    text.to_string()
}

/// Render the forecast. Pure: the same response always yields the same text.
pub fn format_forecast(response: &ForecastResponse) -> String {
    let offset = response.metadata.utc_offset_seconds;

    [
        format_current(response.current.as_ref()),
        format_daily(&response.daily, offset),
        format_hourly(response.hourly.as_deref(), offset),
    ]
    .join(SECTION_SEPARATOR)
}

fn format_current(current: Option<&CurrentConditions>) -> String {
    let Some(current) = current else {
        return CURRENT_UNAVAILABLE.to_string();
    };

    let mut lines = vec![
        "Now:".to_string(),
        format!("Temperature: {}°C", value(current.temperature_c)),
    ];
    if let Some(speed) = current.wind_speed_kmh {
        let direction = current
            .wind_direction_deg
            .map_or_else(|| "N/A".to_string(), |deg| format!("{deg:.0}"));
        lines.push(format!("Wind: {speed:.1} km/h at {direction}°"));
    }
    lines.push(format!("Conditions: {}", describe_weather_code(current.weather_code)));

    lines.join("\n")
}

fn format_daily(daily: &[DailyEntry], offset: i32) -> String {
    if daily.is_empty() {
        return DAILY_UNAVAILABLE.to_string();
    }

    let lines: Vec<String> = daily
        .iter()
        .take(DAILY_ENTRIES)
        .map(|day| {
            format!(
                "{}: High {}°C, Low {}°C, Precipitation: {} mm",
                local_time(day.time, offset, "%Y-%m-%d"),
                value(day.temperature_max_c),
                value(day.temperature_min_c),
                value(day.precipitation_mm),
            )
        })
        .collect();

    format!("Daily Forecast:\n{}", lines.join("\n"))
}

fn format_hourly(hourly: Option<&[HourlyEntry]>, offset: i32) -> String {
    let hours = match hourly {
        Some(hours) if !hours.is_empty() => hours,
        _ => return HOURLY_UNAVAILABLE.to_string(),
    };

    let lines: Vec<String> = hours
        .iter()
        .take(HOURLY_ENTRIES)
        .map(|hour| {
            format!(
                "{}: {}°C, Precip: {} mm, Wind: {} km/h",
                local_time(hour.time, offset, "%Y-%m-%d %H:%M"),
                value(hour.temperature_c),
                value(hour.precipitation_mm),
                value(hour.wind_speed_kmh),
            )
        })
        .collect();

    format!("Hourly Forecast (next 24h):\n{}", lines.join("\n"))
}

fn value(v: Option<f64>) -> String {
    v.map_or_else(|| "N/A".to_string(), |v| format!("{v:.1}"))
}

/// Format a unix timestamp as wall-clock time at the location.
fn local_time(unix: i64, utc_offset_seconds: i32, pattern: &str) -> String {
    DateTime::from_timestamp(unix + i64::from(utc_offset_seconds), 0)
        .map(|dt| dt.format(pattern).to_string())
        .unwrap_or_else(|| unix.to_string())
}
