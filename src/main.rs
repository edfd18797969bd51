#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use env_logger::Env;
use funnel_timeline::app::FunnelApp;

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .filter_module("egui", log::LevelFilter::Warn)
        .filter_module("eframe", log::LevelFilter::Warn)
        .init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 760.0])
            .with_min_inner_size([800.0, 420.0])
            .with_title("Funnel Timeline"),
        ..Default::default()
    };

    eframe::run_native(
        "Funnel Timeline",
        options,
        Box::new(|cc| Ok(Box::new(FunnelApp::new(cc)))),
    )
}
