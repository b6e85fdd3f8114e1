use std::{ops::RangeInclusive, sync::Arc};

use egui_plot::{AxisHints, CoordinatesFormatter, GridInput, GridMark, Legend, Plot, PlotPoint};
use time::format_description::FormatItem;
use time::macros::format_description;
use time::Duration;

use crate::query::Mode;
use crate::{date_from_chart, date_to_chart};

/// Aligns vertical grid lines with calendar boundaries: days when the
/// visible span covers more than two of them, hours otherwise.
fn x_grid(input: GridInput) -> Vec<GridMark> {
    let (start, end) = input.bounds;
    let Some((start, end)) = date_from_chart(start).zip(date_from_chart(end)) else {
        return vec![];
    };

    let span = end - start;
    let step = if span.whole_days() > 365 * 3 {
        Duration::days(365)
    } else if span.whole_days() > 90 {
        Duration::days(30)
    } else if span.whole_hours() > 48 {
        Duration::DAY
    } else {
        Duration::HOUR
    };
    let step_secs = step.whole_seconds();
    let step_size = date_to_chart(time::OffsetDateTime::UNIX_EPOCH + step);

    let mut marks = vec![];
    let mut stamp = start.unix_timestamp().div_euclid(step_secs) * step_secs;
    if stamp < start.unix_timestamp() {
        stamp += step_secs;
    }
    while stamp <= end.unix_timestamp() {
        marks.push(GridMark {
            value: stamp as f64,
            step_size,
        });
        stamp += step_secs;
    }

    marks
}

/// Builds the temperature plot: x is unix seconds, axis labels and hover
/// text follow the resolution of the displayed series.
pub fn temperature_plot(name: &str, mode: Mode) -> Plot {
    let (axis_label, axis_format, point_format): (_, &[FormatItem<'static>], &[FormatItem<'static>]) =
        match mode {
            Mode::Hourly => (
                "Time",
                format_description!("[hour]:[minute]"),
                format_description!("[day]/[month]/[year] - [hour]:[minute]"),
            ),
            Mode::Daily => (
                "Date",
                format_description!("[month repr:short] [day]"),
                format_description!("[day]/[month]/[year]"),
            ),
        };

    let time_formatter = move |mark: GridMark, _max_chars: usize, _range: &RangeInclusive<f64>| {
        date_from_chart(mark.value)
            .and_then(|date| date.format(axis_format).ok())
            .unwrap_or_default()
    };

    let format_plot_point = Arc::new(move |point: &PlotPoint| {
        let date = date_from_chart(point.x)
            .and_then(|date| date.format(point_format).ok())
            .unwrap_or_default();
        format!("{}\n{:.1}°C", date, point.y)
    });

    let fmt = format_plot_point.clone();

    Plot::new(name)
        .legend(Legend::default())
        .coordinates_formatter(
            egui_plot::Corner::LeftBottom,
            CoordinatesFormatter::new(move |point, _| fmt(point)),
        )
        .custom_x_axes(vec![AxisHints::new_x()
            .label(axis_label)
            .formatter(time_formatter)])
        .custom_y_axes(vec![AxisHints::new_y().label("Temperature in °C")])
        .x_grid_spacer(x_grid)
        .label_formatter(move |_, point| format_plot_point(point))
}
