use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::query::RequestSpec;
use crate::series::{to_series, Series, SeriesError};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Forecast response from the Open-Meteo API, trimmed to the variables we
/// request. Exactly one of `hourly`/`daily` is expected; the upstream may
/// omit whole arrays or null individual entries.
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastResponse {
    pub hourly: Option<HourlyData>,
    pub daily: Option<DailyData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HourlyData {
    pub time: Option<Vec<String>>,
    #[serde(rename = "temperature_2m")]
    pub temperature: Option<Vec<Option<f64>>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DailyData {
    pub time: Option<Vec<String>>,
    #[serde(rename = "temperature_2m_max")]
    pub temperature_max: Option<Vec<Option<f64>>>,
    #[serde(rename = "temperature_2m_min")]
    pub temperature_min: Option<Vec<Option<f64>>>,
    #[serde(rename = "temperature_2m_mean")]
    pub temperature_mean: Option<Vec<Option<f64>>>,
}

/// What actually went wrong. The user always sees the same generic
/// message; the kind only reaches the log.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,
    #[error("network error")]
    Network(#[source] reqwest::Error),
    #[error("upstream answered {0}")]
    Status(reqwest::StatusCode),
    #[error("malformed response body")]
    Body(#[source] reqwest::Error),
    #[error(transparent)]
    Shape(#[from] SeriesError),
    #[error("fetch worker went away without answering")]
    Aborted,
}

impl FetchError {
    pub fn user_message(&self) -> &'static str {
        "Failed to fetch data. Please check your inputs."
    }
}

pub type FetchOutcome = Result<Option<Series>, FetchError>;

/// Runs the request on a worker thread and hands the derived series back
/// through a channel. Dropping the receiver (because a newer query replaced
/// it) silently discards the stale answer.
pub fn spawn(ctx: egui::Context, spec: RequestSpec) -> Receiver<FetchOutcome> {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let outcome = fetch_forecast(&spec).and_then(|response| Ok(to_series(&response)?));
        if let Err(err) = &outcome {
            log::warn!("fetch failed: {err}");
        }
        let _ = tx.send(outcome);
        ctx.request_repaint();
    });
    rx
}

fn fetch_forecast(spec: &RequestSpec) -> Result<ForecastResponse, FetchError> {
    let url = spec.url();
    log::debug!("requesting {url}");

    let client = reqwest::blocking::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(FetchError::Network)?;
    let response = client.get(&url).send().map_err(classify)?;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status));
    }
    response.json().map_err(FetchError::Body)
}

fn classify(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::Network(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_an_hourly_payload() {
        let response: ForecastResponse = serde_json::from_str(
            r#"{
                "latitude": 51.5,
                "longitude": -0.12,
                "timezone": "Europe/London",
                "hourly": {
                    "time": ["2024-01-01T00:00"],
                    "temperature_2m": [5.0]
                }
            }"#,
        )
        .unwrap();
        assert!(response.daily.is_none());
        let hourly = response.hourly.expect("hourly shape present");
        assert_eq!(hourly.temperature, Some(vec![Some(5.0)]));
    }

    #[test]
    fn deserializes_a_shape_without_its_time_array() {
        // The upstream omitting `time` must not surface as a body error;
        // the series derivation turns it into "no data".
        let response: ForecastResponse =
            serde_json::from_str(r#"{"hourly": {"temperature_2m": [5.0]}}"#).unwrap();
        let hourly = response.hourly.expect("hourly shape present");
        assert!(hourly.time.is_none());
        assert_eq!(hourly.temperature, Some(vec![Some(5.0)]));
    }

    #[test]
    fn deserializes_a_daily_payload_with_nulls() {
        let response: ForecastResponse = serde_json::from_str(
            r#"{
                "daily": {
                    "time": ["2024-01-01", "2024-01-02"],
                    "temperature_2m_max": [10.0, null],
                    "temperature_2m_min": [0.5, 1.5],
                    "temperature_2m_mean": [5.0, 6.0]
                }
            }"#,
        )
        .unwrap();
        let daily = response.daily.expect("daily shape present");
        assert_eq!(daily.temperature_max, Some(vec![Some(10.0), None]));
        assert_eq!(daily.time.as_ref().map(Vec::len), Some(2));
    }

    #[test]
    fn every_failure_collapses_to_the_same_user_message() {
        let errors = [
            FetchError::Timeout,
            FetchError::Status(reqwest::StatusCode::BAD_REQUEST),
            FetchError::Aborted,
        ];
        for err in errors {
            assert_eq!(err.user_message(), "Failed to fetch data. Please check your inputs.");
        }
    }
}
