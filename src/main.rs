#![warn(clippy::all, rust_2018_idioms)]
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

use anyhow::Context;

fn main() -> anyhow::Result<()> {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 760.0])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Weather Dashboard",
        native_options,
        Box::new(|cc| Box::new(weather_dashboard::WeatherApp::new(cc))),
    )
    .map_err(|err| anyhow::anyhow!("{err}"))
    .context("failed to start the native window")?;

    Ok(())
}
