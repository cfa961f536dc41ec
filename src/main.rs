//! Indicator Dash - Country Indicator Dashboard & Interactive Scatter Viewer
//!
//! Loads two country-indicator files, reconciles them into one unified
//! table, and serves an interactive scatter view over pure filter and pivot
//! functions.

mod charts;
mod data;
mod gui;

use anyhow::Result;
use eframe::egui;
use gui::DashboardApp;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 800.0])
            .with_min_inner_size([1100.0, 650.0])
            .with_title("Indicator Dash"),
        ..Default::default()
    };

    eframe::run_native(
        "Indicator Dash",
        options,
        Box::new(|cc| Ok(Box::new(DashboardApp::new(cc)))),
    )
    .map_err(|e| anyhow::anyhow!("{}", e))?;

    Ok(())
}
