// src/main.rs
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]
mod config;
mod gui;
mod session;
mod signal;
mod types;
use eframe::egui;
use config::PipelineConfig;
fn load_config() -> PipelineConfig {
    let path = PipelineConfig::config_path();
    match PipelineConfig::load(&path) {
        Ok(config) => config,
        Err(err) => {
            log::error!("ignoring {}: {err}", path.display());
            PipelineConfig::default()
        }
    }
}
// 入口函数
fn main() -> eframe::Result<()> {
    env_logger::init();
    let config = load_config();
    if let Ok(json) = config.to_json() {
        log::debug!("pipeline config: {json}");
    }
    let app = gui::NvcViewerApp::new(config).or_else(|err| {
        log::error!("{err:#}; falling back to defaults");
        gui::NvcViewerApp::new(PipelineConfig::default())
    });
    let app = match app {
        Ok(app) => app,
        Err(err) => {
            log::error!("{err:#}");
            return Ok(());
        }
    };
    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([1280.0, 860.0])
        .with_min_inner_size([900.0, 600.0])
        .with_title("NVC Analysis");
    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };
    eframe::run_native("NVC Analysis", options, Box::new(|_cc| Box::new(app)))
}
