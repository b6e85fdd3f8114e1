use time::Date;

use crate::DATE_FORMAT;

pub const FORECAST_ENDPOINT: &str = "https://api.open-meteo.com/v1/forecast";

/// Raw form state, exactly as typed by the user.
#[derive(Debug, Default, Clone)]
pub struct QueryForm {
    pub latitude: String,
    pub longitude: String,
    pub start_date: String,
    pub end_date: String,
}

/// Field-scoped validation messages. All fields are checked on every
/// submit, so several can be set at once.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FieldErrors {
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub dates: Option<String>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.latitude.is_none() && self.longitude.is_none() && self.dates.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Hourly,
    Daily,
}

/// A validated query: finite coordinates in range and a non-future,
/// correctly ordered date pair.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryParams {
    pub latitude: f64,
    pub longitude: f64,
    pub start: Date,
    pub end: Date,
}

impl QueryParams {
    /// A single-day range gets hourly resolution, anything longer daily.
    pub fn mode(&self) -> Mode {
        if self.start == self.end {
            Mode::Hourly
        } else {
            Mode::Daily
        }
    }

    pub fn to_request(&self) -> RequestSpec {
        RequestSpec {
            latitude: self.latitude,
            longitude: self.longitude,
            start_date: format_date(self.start),
            end_date: format_date(self.end),
            mode: self.mode(),
        }
    }
}

/// The upstream request, held as plain fields so tests can inspect it
/// before it ever turns into a URL.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    pub latitude: f64,
    pub longitude: f64,
    pub start_date: String,
    pub end_date: String,
    pub mode: Mode,
}

impl RequestSpec {
    pub fn url(&self) -> String {
        let mut url = format!(
            "{FORECAST_ENDPOINT}?latitude={}&longitude={}&start_date={}&end_date={}&timezone=auto",
            self.latitude, self.longitude, self.start_date, self.end_date,
        );
        match self.mode {
            Mode::Hourly => url.push_str("&hourly=temperature_2m"),
            Mode::Daily => {
                url.push_str("&daily=temperature_2m_max,temperature_2m_min,temperature_2m_mean")
            }
        }
        url
    }
}

/// Checks every field and collects every failure before deciding; a fetch
/// must never be issued while any of these messages is set.
pub fn validate(form: &QueryForm, today: Date) -> Result<QueryParams, FieldErrors> {
    let mut errors = FieldErrors::default();

    let latitude = parse_coordinate(&form.latitude, 90.0);
    if latitude.is_none() {
        errors.latitude = Some("Latitude must be a number between -90 and 90.".to_string());
    }

    let longitude = parse_coordinate(&form.longitude, 180.0);
    if longitude.is_none() {
        errors.longitude = Some("Longitude must be a number between -180 and 180.".to_string());
    }

    let dates = parse_date_range(form, today, &mut errors);

    match (latitude, longitude, dates) {
        (Some(latitude), Some(longitude), Some((start, end))) => Ok(QueryParams {
            latitude,
            longitude,
            start,
            end,
        }),
        _ => Err(errors),
    }
}

fn parse_coordinate(text: &str, bound: f64) -> Option<f64> {
    let value: f64 = text.trim().parse().ok()?;
    // `parse` happily accepts "NaN" and "inf"; the range check rejects both.
    (value.is_finite() && (-bound..=bound).contains(&value)).then_some(value)
}

fn parse_date_range(form: &QueryForm, today: Date, errors: &mut FieldErrors) -> Option<(Date, Date)> {
    let start = form.start_date.trim();
    let end = form.end_date.trim();
    if start.is_empty() || end.is_empty() {
        errors.dates = Some("Both start and end dates are required.".to_string());
        return None;
    }
    let (Ok(start), Ok(end)) = (
        Date::parse(start, DATE_FORMAT),
        Date::parse(end, DATE_FORMAT),
    ) else {
        errors.dates = Some("Dates must use the YYYY-MM-DD format.".to_string());
        return None;
    };
    if start > today || end > today {
        errors.dates = Some("Dates cannot be in the future.".to_string());
        return None;
    }
    if start > end {
        errors.dates = Some("Start date must be before or equal to end date.".to_string());
        return None;
    }
    Some((start, end))
}

fn format_date(date: Date) -> String {
    date.format(DATE_FORMAT).unwrap_or_default()
}
