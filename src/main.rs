mod app;
mod color;
mod state;
mod ui;

use std::path::PathBuf;

use anyhow::Context;
use app::DemandDashApp;
use demand_dash::config::DashboardConfig;
use eframe::egui;
use state::AppState;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = DashboardConfig::load(config_path.as_deref())
        .context("Failed to load dashboard config")?;

    let mut state = AppState::new(config);
    state.load_all();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(state.config.window_size)
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Demand Dash – Forecast Analytics",
        options,
        Box::new(|_cc| Ok(Box::new(DemandDashApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("eframe failed: {e}"))
}
