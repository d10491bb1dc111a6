//! Traffic Dashboard - Regional Traffic Accident Statistics Viewer
//!
//! Loads the per-district accident table once and shows aggregate charts
//! selected from a sidebar menu.

mod charts;
mod config;
mod data;
mod fonts;
mod gui;
mod report;
mod stats;
mod views;

use anyhow::Context;
use config::{DashboardConfig, DEFAULT_CONFIG_PATH};
use data::{DataLoader, DataProcessor};
use eframe::egui;
use gui::DashboardApp;
use std::path::PathBuf;
use tracing::{error, info};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let config = DashboardConfig::load(&config_path)?;

    // The dataset must be fully loaded before any view renders
    let table = DataLoader::load(&config.data_path, &config.encoding)
        .inspect_err(|e| error!(error = %e, "Cannot load accident statistics"))
        .with_context(|| format!("Loading {}", config.data_path.display()))?;
    let regions = DataProcessor::regions(&table)?;
    info!(regions = regions.len(), "Dashboard ready");

    let font = fonts::load(&config.font_path);

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size([1000.0, 650.0])
            .with_title("교통사고 데이터 분석"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Traffic Dashboard",
        options,
        Box::new(move |cc| {
            Ok(Box::new(DashboardApp::new(
                cc, &config, table, regions, font,
            )))
        }),
    )
    .map_err(|e| anyhow::anyhow!("UI error: {e}"))
}
