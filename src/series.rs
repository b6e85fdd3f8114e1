use thiserror::Error;
use time::format_description::FormatItem;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime};

use crate::fetch::{DailyData, ForecastResponse, HourlyData};
use crate::query::Mode;
use crate::DATE_FORMAT;

const HOURLY_STAMP: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]");
const HOURLY_LABEL: &[FormatItem<'static>] = format_description!("[hour]:[minute]");
const DAILY_LABEL: &[FormatItem<'static>] = format_description!("[month repr:short] [day], [year]");

/// A payload that parsed as JSON but breaks the parallel-array contract.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SeriesError {
    #[error("`{field}` holds {got} values but `time` holds {expected}")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("unparseable timestamp `{0}` in response")]
    Timestamp(String),
}

/// One chart/table row. Hourly responses carry a single measurement, which
/// is reused for all three fields.
#[derive(Debug, Clone, PartialEq)]
pub struct TempRow {
    pub stamp: OffsetDateTime,
    pub label: String,
    pub max: Option<f64>,
    pub min: Option<f64>,
    pub mean: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub mode: Mode,
    pub rows: Vec<TempRow>,
}

/// Flattens the upstream payload into rows. The same derivation feeds the
/// chart and the table. `Ok(None)` means "no data": neither shape present,
/// or a shape present without its expected inner arrays (`time` included).
/// Parallel arrays of unequal length fail loudly instead of being zipped
/// short.
pub fn to_series(response: &ForecastResponse) -> Result<Option<Series>, SeriesError> {
    if let Some(hourly) = &response.hourly {
        return hourly_series(hourly);
    }
    if let Some(daily) = &response.daily {
        return daily_series(daily);
    }
    Ok(None)
}

fn hourly_series(hourly: &HourlyData) -> Result<Option<Series>, SeriesError> {
    let (Some(time), Some(temperature)) = (&hourly.time, &hourly.temperature) else {
        return Ok(None);
    };
    check_len("temperature_2m", time.len(), temperature.len())?;

    let rows = time
        .iter()
        .zip(temperature)
        .map(|(time, &temp)| {
            let stamp = PrimitiveDateTime::parse(time, HOURLY_STAMP)
                .map_err(|_| SeriesError::Timestamp(time.clone()))?
                .assume_utc();
            Ok(TempRow {
                stamp,
                label: format_stamp(stamp, HOURLY_LABEL),
                max: temp,
                min: temp,
                mean: temp,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Some(Series {
        mode: Mode::Hourly,
        rows,
    }))
}

fn daily_series(daily: &DailyData) -> Result<Option<Series>, SeriesError> {
    let (Some(time), Some(max), Some(min), Some(mean)) = (
        &daily.time,
        &daily.temperature_max,
        &daily.temperature_min,
        &daily.temperature_mean,
    ) else {
        return Ok(None);
    };
    check_len("temperature_2m_max", time.len(), max.len())?;
    check_len("temperature_2m_min", time.len(), min.len())?;
    check_len("temperature_2m_mean", time.len(), mean.len())?;

    let rows = (0..time.len())
        .map(|i| {
            let day = &time[i];
            let date = Date::parse(day, DATE_FORMAT)
                .map_err(|_| SeriesError::Timestamp(day.clone()))?;
            // Anchor daily values at midday so they sit in the middle of
            // their day on the chart.
            let stamp = date.with_hms(12, 0, 0).unwrap().assume_utc();
            Ok(TempRow {
                stamp,
                label: format_stamp(stamp, DAILY_LABEL),
                max: max[i],
                min: min[i],
                mean: mean[i],
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Some(Series {
        mode: Mode::Daily,
        rows,
    }))
}

fn check_len(field: &'static str, expected: usize, got: usize) -> Result<(), SeriesError> {
    if expected == got {
        Ok(())
    } else {
        Err(SeriesError::LengthMismatch {
            field,
            expected,
            got,
        })
    }
}

fn format_stamp(stamp: OffsetDateTime, format: &[FormatItem<'_>]) -> String {
    stamp.format(format).unwrap_or_default()
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Averages {
    pub max: Option<f64>,
    pub min: Option<f64>,
    pub mean: Option<f64>,
}

/// Arithmetic mean per field over the rows where the field is present,
/// rounded to one decimal. Empty input yields empty averages rather than a
/// division by zero.
pub fn compute_averages(rows: &[TempRow]) -> Averages {
    Averages {
        max: field_average(rows, |row| row.max),
        min: field_average(rows, |row| row.min),
        mean: field_average(rows, |row| row.mean),
    }
}

fn field_average(rows: &[TempRow], field: impl Fn(&TempRow) -> Option<f64>) -> Option<f64> {
    let values: Vec<f64> = rows.iter().filter_map(field).collect();
    if values.is_empty() {
        return None;
    }
    let sum: f64 = values.iter().sum();
    Some(round_one_decimal(sum / values.len() as f64))
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> ForecastResponse {
        serde_json::from_str(json).expect("fixture must deserialize")
    }

    #[test]
    fn hourly_rows_reuse_the_single_measurement() {
        let response = parse(
            r#"{
                "hourly": {
                    "time": ["2024-01-01T00:00", "2024-01-01T01:00"],
                    "temperature_2m": [5.0, 6.0]
                }
            }"#,
        );
        let series = to_series(&response).unwrap().expect("hourly data present");
        assert_eq!(series.mode, Mode::Hourly);
        assert_eq!(series.rows.len(), 2);
        for row in &series.rows {
            assert_eq!(row.max, row.min);
            assert_eq!(row.max, row.mean);
        }
        assert_eq!(series.rows[0].label, "00:00");
        assert_eq!(series.rows[1].mean, Some(6.0));

        let averages = compute_averages(&series.rows);
        assert_eq!(averages, Averages { max: Some(5.5), min: Some(5.5), mean: Some(5.5) });
    }

    #[test]
    fn daily_rows_preserve_each_aggregate_per_index() {
        let response = parse(
            r#"{
                "daily": {
                    "time": ["2024-01-01", "2024-01-02", "2024-01-03"],
                    "temperature_2m_max": [10.0, 12.0, 14.0],
                    "temperature_2m_min": [1.0, null, 3.0],
                    "temperature_2m_mean": [1.0, 2.0, 3.0]
                }
            }"#,
        );
        let series = to_series(&response).unwrap().expect("daily data present");
        assert_eq!(series.mode, Mode::Daily);
        assert_eq!(series.rows.len(), 3);
        assert_eq!(series.rows[0].label, "Jan 01, 2024");
        assert_eq!(series.rows[1].max, Some(12.0));
        assert_eq!(series.rows[1].min, None);
        assert_eq!(series.rows[2].mean, Some(3.0));

        let averages = compute_averages(&series.rows);
        assert_eq!(averages.mean, Some(2.0));
        assert_eq!(averages.max, Some(12.0));
        // The null min is skipped, not counted as zero.
        assert_eq!(averages.min, Some(2.0));
    }

    #[test]
    fn neither_shape_means_no_data() {
        assert_eq!(to_series(&parse("{}")).unwrap(), None);
    }

    #[test]
    fn shape_without_value_arrays_means_no_data() {
        let response = parse(r#"{"hourly": {"time": ["2024-01-01T00:00"]}}"#);
        assert_eq!(to_series(&response).unwrap(), None);
        let response = parse(
            r#"{
                "daily": {
                    "time": ["2024-01-01"],
                    "temperature_2m_max": [1.0]
                }
            }"#,
        );
        assert_eq!(to_series(&response).unwrap(), None);
    }

    #[test]
    fn shape_without_a_time_array_means_no_data() {
        let response = parse(r#"{"hourly": {"temperature_2m": [5.0]}}"#);
        assert_eq!(to_series(&response).unwrap(), None);
        let response = parse(
            r#"{
                "daily": {
                    "temperature_2m_max": [1.0],
                    "temperature_2m_min": [1.0],
                    "temperature_2m_mean": [1.0]
                }
            }"#,
        );
        assert_eq!(to_series(&response).unwrap(), None);
    }

    #[test]
    fn mismatched_parallel_arrays_fail_loudly() {
        let response = parse(
            r#"{
                "hourly": {
                    "time": ["2024-01-01T00:00", "2024-01-01T01:00"],
                    "temperature_2m": [5.0]
                }
            }"#,
        );
        assert_eq!(
            to_series(&response).unwrap_err(),
            SeriesError::LengthMismatch {
                field: "temperature_2m",
                expected: 2,
                got: 1
            }
        );
    }

    #[test]
    fn unparseable_timestamps_fail_loudly() {
        let response = parse(
            r#"{
                "daily": {
                    "time": ["yesterday"],
                    "temperature_2m_max": [1.0],
                    "temperature_2m_min": [1.0],
                    "temperature_2m_mean": [1.0]
                }
            }"#,
        );
        assert_eq!(
            to_series(&response).unwrap_err(),
            SeriesError::Timestamp("yesterday".to_string())
        );
    }

    #[test]
    fn averages_of_nothing_are_empty() {
        assert_eq!(compute_averages(&[]), Averages::default());
    }

    #[test]
    fn averages_of_a_constant_series_are_that_constant() {
        let row = TempRow {
            stamp: OffsetDateTime::UNIX_EPOCH,
            label: String::new(),
            max: Some(7.0),
            min: Some(7.0),
            mean: Some(7.0),
        };
        let rows = vec![row.clone(), row.clone(), row];
        let averages = compute_averages(&rows);
        assert_eq!(averages, Averages { max: Some(7.0), min: Some(7.0), mean: Some(7.0) });
    }

    #[test]
    fn averages_round_to_one_decimal() {
        let rows: Vec<TempRow> = [1.0, 2.0, 2.05]
            .into_iter()
            .map(|value| TempRow {
                stamp: OffsetDateTime::UNIX_EPOCH,
                label: String::new(),
                max: Some(value),
                min: None,
                mean: None,
            })
            .collect();
        // 5.05 / 3 = 1.6833... -> 1.7
        assert_eq!(compute_averages(&rows).max, Some(1.7));
        assert_eq!(compute_averages(&rows).min, None);
    }
}
