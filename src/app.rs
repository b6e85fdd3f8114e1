use std::sync::mpsc::{Receiver, TryRecvError};

use egui::{Color32, TextEdit, Visuals};
use time::OffsetDateTime;

use crate::chart::ChartView;
use crate::fetch::{self, FetchError, FetchOutcome};
use crate::query::{validate, FieldErrors, QueryForm};
use crate::series::Series;
use crate::table::TableView;

pub struct WeatherApp {
    form: QueryForm,
    errors: FieldErrors,
    dark_mode: bool,
    state: FetchState,
    chart: ChartView,
    table: TableView,
}

enum FetchState {
    Idle,
    /// A worker thread owns the request; replacing this receiver discards
    /// whatever answer the old worker eventually produces.
    Loading(Receiver<FetchOutcome>),
    Loaded(Option<Series>),
    Failed(FetchError),
}

impl WeatherApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        // Dark is the default theme.
        cc.egui_ctx.set_visuals(Visuals::dark());
        WeatherApp {
            form: QueryForm::default(),
            errors: FieldErrors::default(),
            dark_mode: true,
            state: FetchState::Idle,
            chart: ChartView::default(),
            table: TableView::default(),
        }
    }

    fn loading(&self) -> bool {
        matches!(self.state, FetchState::Loading(_))
    }

    /// Validation runs to completion first; a fetch is only dispatched when
    /// no field error remains.
    fn submit(&mut self, ctx: &egui::Context) {
        let today = OffsetDateTime::now_utc().date();
        match validate(&self.form, today) {
            Ok(params) => {
                self.errors = FieldErrors::default();
                self.state = FetchState::Loading(fetch::spawn(ctx.clone(), params.to_request()));
            }
            Err(errors) => self.errors = errors,
        }
    }

    fn poll_fetch(&mut self) {
        let FetchState::Loading(rx) = &self.state else {
            return;
        };
        match rx.try_recv() {
            Ok(Ok(series)) => {
                self.table.reset();
                self.state = FetchState::Loaded(series);
            }
            Ok(Err(err)) => self.state = FetchState::Failed(err),
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                log::warn!("fetch worker disconnected without an answer");
                self.state = FetchState::Failed(FetchError::Aborted);
            }
        }
    }

    fn toggle_theme(&mut self, ctx: &egui::Context) {
        self.dark_mode = !self.dark_mode;
        ctx.set_visuals(if self.dark_mode {
            Visuals::dark()
        } else {
            Visuals::light()
        });
    }

    fn form_ui(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        let mut submitted = false;
        ui.horizontal_wrapped(|ui| {
            ui.vertical(|ui| {
                ui.add(
                    TextEdit::singleline(&mut self.form.latitude)
                        .hint_text("Latitude")
                        .desired_width(120.0),
                );
                if let Some(error) = &self.errors.latitude {
                    ui.colored_label(Color32::RED, error);
                }
            });
            ui.vertical(|ui| {
                ui.add(
                    TextEdit::singleline(&mut self.form.longitude)
                        .hint_text("Longitude")
                        .desired_width(120.0),
                );
                if let Some(error) = &self.errors.longitude {
                    ui.colored_label(Color32::RED, error);
                }
            });
            ui.add(
                TextEdit::singleline(&mut self.form.start_date)
                    .hint_text("Start date (YYYY-MM-DD)")
                    .desired_width(170.0),
            );
            ui.add(
                TextEdit::singleline(&mut self.form.end_date)
                    .hint_text("End date (YYYY-MM-DD)")
                    .desired_width(170.0),
            );
            submitted = ui
                .add_enabled(!self.loading(), egui::Button::new("Fetch Weather"))
                .clicked();
            if self.loading() {
                ui.spinner();
            }
        });
        if let Some(error) = &self.errors.dates {
            ui.colored_label(Color32::RED, error);
        }
        if submitted {
            self.submit(ctx);
        }
    }
}

impl eframe::App for WeatherApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_fetch();

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.heading("Weather Dashboard");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let label = if self.dark_mode {
                        "Switch to Light Mode"
                    } else {
                        "Switch to Dark Mode"
                    };
                    if ui.button(label).clicked() {
                        self.toggle_theme(ctx);
                    }
                });
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.form_ui(ctx, ui);
            ui.separator();

            let Self {
                state,
                chart,
                table,
                ..
            } = &mut *self;
            match state {
                FetchState::Idle | FetchState::Loading(_) => {}
                FetchState::Failed(err) => {
                    ui.colored_label(Color32::RED, err.user_message());
                }
                FetchState::Loaded(series) => {
                    egui::ScrollArea::vertical().show(ui, |ui| {
                        if let Some(series) = series.as_ref() {
                            chart.ui(series, ui);
                            ui.add_space(12.0);
                        }
                        table.ui(series.as_ref(), ui);
                    });
                }
            }
        });
    }
}
