//! Integration tests for the Open-Meteo provider and the service using wiremock.

use std::time::Duration;

use forecast_core::{
    Coordinates, ForecastError, ForecastProvider, ForecastService, OpenMeteoProvider,
    ProviderError, RetryPolicy,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Open-Meteo body with `timeformat=unixtime`, optionally without the hourly block.
fn forecast_body(with_hourly: bool) -> serde_json::Value {
    let mut body = serde_json::json!({
        "latitude": 49.5,
        "longitude": 8.44,
        "generationtime_ms": 0.084,
        "utc_offset_seconds": 3600,
        "timezone": "Europe/Berlin",
        "timezone_abbreviation": "CET",
        "elevation": 97.0,
        "current_weather": {
            "time": 1609459200,
            "interval": 900,
            "temperature": 5.0,
            "windspeed": 10.0,
            "winddirection": 90,
            "is_day": 0,
            "weathercode": 3
        },
        "daily": {
            "time": [1609455600, 1609542000, 1609628400, 1609714800],
            "temperature_2m_max": [6.0, 7.0, 5.5, 4.0],
            "temperature_2m_min": [0.0, -1.0, -2.0, -3.0],
            "precipitation_sum": [0.0, 1.2, 0.0, 0.4]
        }
    });

    if with_hourly {
        let times: Vec<i64> = (0..48).map(|i| 1_609_455_600 + i * 3600).collect();
        body["hourly"] = serde_json::json!({
            "time": times,
            "temperature_2m": vec![1.0; 48],
            "precipitation": vec![0.0; 48],
            "wind_speed_10m": vec![3.0; 48]
        });
    }

    body
}

fn fast_policy() -> RetryPolicy {
    RetryPolicy::new(3, Duration::from_millis(5))
}

fn service(server: &MockServer, dir: &std::path::Path) -> ForecastService {
    let provider = OpenMeteoProvider::new(format!("{}/v1/forecast", server.uri()));
    ForecastService::new(Box::new(provider), fast_policy(), dir)
}

#[tokio::test]
async fn provider_sends_expected_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("latitude", "49.48"))
        .and(query_param("longitude", "8.446"))
        .and(query_param("current_weather", "true"))
        .and(query_param("timezone", "auto"))
        .and(query_param("timeformat", "unixtime"))
        .and(query_param("models", "icon_seamless"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(true)))
        .expect(1)
        .mount(&server)
        .await;

    let provider = OpenMeteoProvider::new(format!("{}/v1/forecast", server.uri()))
        .with_model("icon_seamless");
    let resp = provider.fetch_forecast(Coordinates::new(49.48, 8.446)).await.unwrap();

    assert!(resp.has_hourly());
    assert_eq!(resp.daily.len(), 4);
    assert_eq!(resp.metadata.model, "icon_seamless");
    assert_eq!(resp.metadata.timezone, "Europe/Berlin");
}

#[tokio::test]
async fn provider_reports_error_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_string(r#"{"error":true,"reason":"Latitude must be in range"}"#),
        )
        .mount(&server)
        .await;

    let provider = OpenMeteoProvider::new(format!("{}/v1/forecast", server.uri()));
    let err = provider.fetch_forecast(Coordinates::new(123.0, 0.0)).await.unwrap_err();

    match err {
        ProviderError::Status { status, body } => {
            assert_eq!(status, 400);
            assert!(body.contains("Latitude must be in range"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn provider_reports_undecodable_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let provider = OpenMeteoProvider::new(server.uri());
    let err = provider.fetch_forecast(Coordinates::new(0.0, 0.0)).await.unwrap_err();

    assert!(matches!(err, ProviderError::Decode(_)));
}

#[tokio::test]
async fn get_forecast_with_hourly_makes_one_request() {
    let server = MockServer::start().await;
    let tmp = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(true)))
        .expect(1)
        .mount(&server)
        .await;

    let text = service(&server, tmp.path()).get_forecast(49.48, 8.446).await.unwrap();

    assert!(text.starts_with("Now:\nTemperature: 5.0°C\nWind: 10.0 km/h at 90°\nConditions: Overcast"));
    assert!(text.contains("2021-01-01: High 6.0°C, Low 0.0°C, Precipitation: 0.0 mm"));
    assert!(!text.contains("2021-01-04"));
    assert!(text.contains("Hourly Forecast (next 24h):\n2021-01-01 00:00: 1.0°C"));
}

#[tokio::test]
async fn save_retries_until_hourly_arrives() {
    let server = MockServer::start().await;
    let tmp = tempfile::tempdir().unwrap();

    // First two calls come back without hourly data, the third one has it.
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(false)))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(true)))
        .expect(1)
        .mount(&server)
        .await;

    let path = service(&server, tmp.path()).save_raw_forecast(49.48, 8.446).await.unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.starts_with("Metadata:\nTimestamp: "));
    assert!(contents.contains("Attempts: 3\nHourly present: True\n"));
    assert!(contents.contains("Model: best_match\n"));
    assert!(contents.contains("Timezone: Europe/Berlin\nUTC offset: 3600\n"));
    assert!(contents.contains("Latitude: 49.5\nLongitude: 8.44\nElevation: 97\n\nNow:\n"));
}

#[tokio::test]
async fn save_without_hourly_after_all_attempts() {
    let server = MockServer::start().await;
    let tmp = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(false)))
        .expect(3)
        .mount(&server)
        .await;

    let path = service(&server, tmp.path()).save_raw_forecast(-33.9, 18.4).await.unwrap();

    let name = path.file_name().unwrap().to_str().unwrap();
    assert!(name.starts_with("forecast_m33p9_18p4_"), "{name}");

    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.contains("Attempts: 3\nHourly present: False\n"));
    assert!(contents.ends_with("Hourly forecast: not available.\n"));
}

#[tokio::test]
async fn server_errors_exhaust_retries() {
    let server = MockServer::start().await;
    let tmp = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .expect(3)
        .mount(&server)
        .await;

    let err = service(&server, tmp.path()).get_forecast(1.0, 2.0).await.unwrap_err();

    match err {
        ForecastError::FetchFailed { attempts, source } => {
            assert_eq!(attempts, 3);
            assert!(matches!(source, ProviderError::Status { status: 503, .. }));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
