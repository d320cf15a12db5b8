mod analytics;
mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use std::path::Path;

use app::DashboardApp;
use config::{DashboardConfig, CONFIG_FILE};
use eframe::egui;
use state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    let config = DashboardConfig::load_or_default(Path::new(CONFIG_FILE));

    let app = match data::cache::SESSION.get_or_load(&config.workbook) {
        Ok(dataset) => {
            if dataset.is_empty() {
                log::warn!("{} has no transactions", config.workbook.display());
            }
            DashboardApp::Ready(Box::new(AppState::new(dataset, config.rating_range())))
        }
        Err(e) => {
            log::error!("Failed to load {}: {e}", config.workbook.display());
            DashboardApp::Failed(e.to_string())
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        ui::WINDOW_TITLE,
        options,
        Box::new(|_cc| Ok(Box::new(app))),
    )
}
