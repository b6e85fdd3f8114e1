use egui::{Color32, RichText, Ui};
use egui_plot::Line;

use crate::date_to_chart;
use crate::plot::temperature_plot;
use crate::query::Mode;
use crate::series::{compute_averages, Averages, Series, TempRow};

/// The three selectable temperature series. Hourly data feeds the same
/// measurement to all three, so switching is a no-op visually there; the
/// selector stays enabled to match the original behavior.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub enum TempSeries {
    Max,
    Min,
    #[default]
    Mean,
}

impl TempSeries {
    const ALL: [TempSeries; 3] = [TempSeries::Max, TempSeries::Min, TempSeries::Mean];

    fn label(self) -> &'static str {
        match self {
            TempSeries::Max => "Max Temperature",
            TempSeries::Min => "Min Temperature",
            TempSeries::Mean => "Mean Temperature",
        }
    }

    fn color(self) -> Color32 {
        match self {
            TempSeries::Max => Color32::RED,
            TempSeries::Min => Color32::LIGHT_BLUE,
            TempSeries::Mean => Color32::GREEN,
        }
    }

    fn of(self, row: &TempRow) -> Option<f64> {
        match self {
            TempSeries::Max => row.max,
            TempSeries::Min => row.min,
            TempSeries::Mean => row.mean,
        }
    }

    fn average(self, averages: &Averages) -> Option<f64> {
        match self {
            TempSeries::Max => averages.max,
            TempSeries::Min => averages.min,
            TempSeries::Mean => averages.mean,
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct ChartView {
    selected: TempSeries,
}

impl ChartView {
    /// Renders the header (title, row count, average badges doubling as the
    /// series selector) and the line plot. Callers skip this entirely when
    /// there is no data; an empty series draws nothing.
    pub fn ui(&mut self, series: &Series, ui: &mut Ui) {
        if series.rows.is_empty() {
            return;
        }

        let averages = compute_averages(&series.rows);

        ui.horizontal(|ui| {
            ui.vertical(|ui| {
                match series.mode {
                    Mode::Hourly => {
                        ui.heading("Hourly Temperature");
                        ui.label("Hourly temperature data for the selected day");
                    }
                    Mode::Daily => {
                        ui.heading("Daily Temperature");
                        ui.label(format!(
                            "Daily temperature data for {} days",
                            series.rows.len()
                        ));
                    }
                }
            });
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                // Reverse order so Max ends up leftmost in a right-to-left layout.
                for temp_series in TempSeries::ALL.iter().rev() {
                    let badge = format!(
                        "{}\n{}",
                        temp_series.label(),
                        format_average(temp_series.average(&averages))
                    );
                    let selected = self.selected == *temp_series;
                    if ui
                        .selectable_label(selected, RichText::new(badge).strong())
                        .clicked()
                    {
                        self.selected = *temp_series;
                    }
                }
            });
        });
        ui.add_space(4.0);

        let selected = self.selected;
        let points: Vec<[f64; 2]> = series
            .rows
            .iter()
            .filter_map(|row| selected.of(row).map(|value| [date_to_chart(row.stamp), value]))
            .collect();

        temperature_plot("temperature", series.mode)
            .height(300.0)
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new(points)
                        .color(selected.color())
                        .name(selected.label()),
                );
            });
    }
}

fn format_average(value: Option<f64>) -> String {
    match value {
        Some(value) => format!("{value:.1}°C"),
        None => "N/A".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_series_reads_its_own_field() {
        let row = TempRow {
            stamp: time::OffsetDateTime::UNIX_EPOCH,
            label: String::new(),
            max: Some(3.0),
            min: Some(1.0),
            mean: Some(2.0),
        };
        assert_eq!(TempSeries::Max.of(&row), Some(3.0));
        assert_eq!(TempSeries::Min.of(&row), Some(1.0));
        assert_eq!(TempSeries::Mean.of(&row), Some(2.0));
    }

    #[test]
    fn badges_format_missing_averages_as_na() {
        assert_eq!(format_average(Some(5.5)), "5.5°C");
        assert_eq!(format_average(None), "N/A");
    }
}
