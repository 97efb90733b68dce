use eframe::egui;
use anyhow::Result;
use log::{error, info, warn};

mod app;
mod config;
mod core;
mod messaging;
mod ui;
mod utils;

use config::PianoConfig;

fn main() -> Result<()> {
    env_logger::init();
    info!("Starting Virtual Piano");

    let config = PianoConfig::load().unwrap_or_else(|e| {
        warn!("Using default settings: {:#}", e);
        PianoConfig::default()
    });

    // Without an audio sink there is nothing to play, so give up before opening a window
    let app = match app::PianoApp::new(config) {
        Ok(app) => app,
        Err(e) => {
            error!("Failed to set up audio: {:#}", e);
            std::process::exit(1);
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 360.0])
            .with_title("Virtual Piano"),
        ..Default::default()
    };

    eframe::run_native(
        "Virtual Piano",
        options,
        Box::new(|_cc| Ok(Box::new(app))),
    ).map_err(|e| anyhow::anyhow!("Application error: {}", e))
}
