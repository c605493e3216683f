mod app;
mod color;
mod config;
mod data;
mod export;
mod state;
mod ui;

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use app::TrashDayApp;
use clap::Parser;
use config::Settings;
use data::model::DaySelection;
use eframe::egui;
use state::AppState;

/// Trash pickup schedule dashboard.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Schedule table to open (.csv, .json, .parquet)
    data: Option<PathBuf>,

    /// JSON settings file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the dashboard as JSON to this file and exit without a window
    #[arg(long)]
    export: Option<PathBuf>,

    /// Initial day filter
    #[arg(long, value_enum, default_value_t = DaySelection::All)]
    day: DaySelection,

    /// Neighborhood to select (repeatable; default: all)
    #[arg(long = "neighborhood")]
    neighborhoods: Vec<String>,

    /// Dot size, 1-20
    #[arg(long)]
    dot_size: Option<u32>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };

    let mut state = AppState::new(settings);
    if let Some(path) = &cli.data {
        // A bad startup file is fatal: never open a window on it.
        state.open(path)?;
        state.filters.day = cli.day;
        if !cli.neighborhoods.is_empty() {
            state.filters.neighborhoods = cli.neighborhoods.iter().cloned().collect();
        }
        if let Some(dot_size) = cli.dot_size {
            state.set_dot_size(dot_size);
        }
        state.refilter();
    }

    if let Some(out) = &cli.export {
        let dashboard = state
            .dashboard
            .as_ref()
            .context("--export needs a data file")?;
        return export::write_dashboard(out, dashboard);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 900.0])
            .with_min_inner_size([700.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Trash Day Checker",
        options,
        Box::new(|_cc| Ok(Box::new(TrashDayApp::new(state)))),
    )
    .map_err(|e| anyhow!("running the UI: {e}"))
}
