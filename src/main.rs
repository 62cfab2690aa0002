mod app;
mod config;
mod state;
mod ui;

use app::SkillMatrixApp;
use clap::Parser;
use config::Cli;
use eframe::egui;

fn main() -> eframe::Result {
    let cli = Cli::parse();
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(cli.default_log_level()),
    )
    .init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Employee Skill Matrix",
        options,
        Box::new(move |_cc| Ok(Box::new(SkillMatrixApp::new(&cli)))),
    )
}
