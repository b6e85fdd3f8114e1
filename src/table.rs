use egui::{Button, ComboBox, Ui};

use crate::query::Mode;
use crate::series::Series;

pub const PAGE_SIZES: [usize; 5] = [5, 10, 15, 20, 50];
const DEFAULT_PAGE_SIZE: usize = 10;
const MAX_VISIBLE_PAGES: usize = 5;

/// One slot in the pagination strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Page(usize),
    Ellipsis,
}

/// Clamps `page` into `[1, totalPages]` and returns that page's rows plus
/// the page count (at least 1, so an empty input still has a "page").
pub fn paginate<T>(rows: &[T], page: usize, page_size: usize) -> (&[T], usize) {
    let total_pages = rows.len().div_ceil(page_size).max(1);
    let page = page.clamp(1, total_pages);
    let start = (page - 1) * page_size;
    let end = (start + page_size).min(rows.len());
    (&rows[start..end], total_pages)
}

/// At most five visible page controls: all pages when they fit, otherwise
/// a window around the current page with ellipses towards the far ends.
pub fn page_window(total_pages: usize, page: usize) -> Vec<PageItem> {
    let mut items = vec![];
    if total_pages <= MAX_VISIBLE_PAGES {
        items.extend((1..=total_pages).map(PageItem::Page));
    } else if page <= 3 {
        items.extend((1..=4).map(PageItem::Page));
        items.push(PageItem::Ellipsis);
        items.push(PageItem::Page(total_pages));
    } else if page >= total_pages - 2 {
        items.push(PageItem::Page(1));
        items.push(PageItem::Ellipsis);
        items.extend((total_pages - 3..=total_pages).map(PageItem::Page));
    } else {
        items.push(PageItem::Page(1));
        items.push(PageItem::Ellipsis);
        items.extend((page - 1..=page + 1).map(PageItem::Page));
        items.push(PageItem::Ellipsis);
        items.push(PageItem::Page(total_pages));
    }
    items
}

/// Pagination chrome (page links and the rows-per-page selector) only
/// appears when there is more than one page, as in the original dashboard.
fn controls_visible(total_pages: usize) -> bool {
    total_pages > 1
}

fn format_temperature(value: Option<f64>) -> String {
    match value {
        Some(value) => format!("{value:.1}"),
        None => "N/A".to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct TableView {
    page: usize,
    page_size: usize,
}

impl Default for TableView {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl TableView {
    /// Back to page 1; called when a new result arrives.
    pub fn reset(&mut self) {
        self.page = 1;
    }

    pub fn ui(&mut self, series: Option<&Series>, ui: &mut Ui) {
        let Some(series) = series.filter(|series| !series.rows.is_empty()) else {
            ui.label("No weather data available");
            return;
        };

        let (page_rows, total_pages) = paginate(&series.rows, self.page, self.page_size);
        self.page = self.page.clamp(1, total_pages);

        egui::Grid::new("weather_table")
            .striped(true)
            .min_col_width(110.0)
            .show(ui, |ui| {
                match series.mode {
                    Mode::Hourly => {
                        ui.strong("Time");
                        ui.strong("Temperature (°C)");
                    }
                    Mode::Daily => {
                        ui.strong("Date");
                        ui.strong("Max Temperature (°C)");
                        ui.strong("Min Temperature (°C)");
                        ui.strong("Mean Temperature (°C)");
                    }
                }
                ui.end_row();

                for row in page_rows {
                    ui.label(&row.label);
                    match series.mode {
                        // The hourly shape has one measurement; the three
                        // fields are identical, show it once.
                        Mode::Hourly => {
                            ui.label(format_temperature(row.mean));
                        }
                        Mode::Daily => {
                            ui.label(format_temperature(row.max));
                            ui.label(format_temperature(row.min));
                            ui.label(format_temperature(row.mean));
                        }
                    }
                    ui.end_row();
                }
            });

        ui.add_space(4.0);
        ui.horizontal(|ui| {
            ui.label(format!("Page {} of {}", self.page, total_pages));
            if !controls_visible(total_pages) {
                return;
            }
            ui.separator();
            if ui
                .add_enabled(self.page > 1, Button::new("Previous"))
                .clicked()
            {
                self.page -= 1;
            }
            for item in page_window(total_pages, self.page) {
                match item {
                    PageItem::Ellipsis => {
                        ui.label("…");
                    }
                    PageItem::Page(page) => {
                        if ui
                            .selectable_label(page == self.page, page.to_string())
                            .clicked()
                        {
                            self.page = page;
                        }
                    }
                }
            }
            if ui
                .add_enabled(self.page < total_pages, Button::new("Next"))
                .clicked()
            {
                self.page += 1;
            }

            ui.separator();
            ui.label("Rows per page:");
            let previous_size = self.page_size;
            ComboBox::from_id_source("rows_per_page")
                .selected_text(self.page_size.to_string())
                .show_ui(ui, |ui| {
                    for size in PAGE_SIZES {
                        ui.selectable_value(&mut self.page_size, size, size.to_string());
                    }
                });
            if self.page_size != previous_size {
                self.page = 1;
            }
        });
    }
}
