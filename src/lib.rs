#![warn(clippy::all, rust_2018_idioms)]

mod app;
mod chart;
mod fetch;
mod plot;
mod query;
mod series;
mod table;
pub use app::WeatherApp;
use time::format_description::FormatItem;
use time::macros::format_description;
use time::OffsetDateTime;

/// The `yyyy-MM-dd` format used for typed dates and the upstream request.
pub(crate) const DATE_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

fn date_to_chart(date: OffsetDateTime) -> f64 {
    date.unix_timestamp() as f64
}

fn date_from_chart(axis: f64) -> Option<OffsetDateTime> {
    let unix_timestamp: i64 = axis as i64;
    OffsetDateTime::from_unix_timestamp(unix_timestamp).ok()
}
