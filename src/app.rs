use eframe::egui;

use crate::config::Cli;
use crate::state::AppState;
use crate::ui::{panels, report};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct SkillMatrixApp {
    pub state: AppState,
}

impl SkillMatrixApp {
    pub fn new(cli: &Cli) -> Self {
        Self {
            state: AppState::new(cli.data_dir.clone(), &cli.sheet),
        }
    }
}

impl eframe::App for SkillMatrixApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: file + filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(280.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: report ----
        egui::CentralPanel::default().show(ctx, |ui| {
            report::report_panel(ui, &mut self.state);
        });
    }
}
