use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use skill_matrix::data::filter::{CompositionMode, MAX_SCORE, MIN_SCORE};
use skill_matrix::data::loader::SUPPORTED_EXTENSIONS;

use crate::state::{AppState, Status};

// ---------------------------------------------------------------------------
// Left side panel – file selection and filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Select Data File");
    file_selector(ui, state);
    ui.separator();

    let Some(matrix) = state.matrix.clone() else {
        ui.label("No skill sheet loaded.");
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Category multi-select ----
            ui.strong("Select Categories");
            for category in matrix.categories.categories() {
                let mut checked = state.selection.is_category_selected(category);
                if ui.checkbox(&mut checked, category).changed() {
                    state.selection.toggle_category(category);
                }
            }
            ui.separator();

            // ---- Subcategories + minimum score per selected category ----
            let selected = state.selection.categories.clone();
            for category in &selected {
                let Some(subcategories) = matrix.categories.subcategories(category) else {
                    continue;
                };
                egui::CollapsingHeader::new(RichText::new(category).strong())
                    .id_salt(("subs", category))
                    .default_open(true)
                    .show(ui, |ui: &mut Ui| {
                        for sub in subcategories {
                            let mut checked =
                                state.selection.is_subcategory_selected(category, sub);
                            if ui.checkbox(&mut checked, sub).changed() {
                                state.selection.toggle_subcategory(category, sub);
                            }
                            if checked {
                                let minimum = state.selection.minimum_mut(category, sub);
                                ui.add(
                                    egui::Slider::new(minimum, MIN_SCORE..=MAX_SCORE)
                                        .step_by(1.0)
                                        .text(format!("Minimum Score for {sub}")),
                                );
                            }
                        }
                    });
            }
            ui.separator();

            // ---- AND / OR ----
            ui.strong("Filter Type");
            for mode in CompositionMode::ALL_MODES {
                ui.radio_value(&mut state.mode, mode, mode.label());
            }
            ui.add_space(8.0);

            if ui.button("Apply Filters").clicked() {
                state.apply_filters();
            }
        });
}

fn file_selector(ui: &mut Ui, state: &mut AppState) {
    let current = state
        .selected_file
        .as_ref()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let mut picked = None;
    egui::ComboBox::from_id_salt("data_file")
        .selected_text(current)
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            for path in &state.available_files {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| path.display().to_string());
                let is_current = state.selected_file.as_ref() == Some(path);
                if ui.selectable_label(is_current, name).clicked() && !is_current {
                    picked = Some(path.clone());
                }
            }
        });

    if let Some(path) = picked {
        state.select_file(path);
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Refresh folder").clicked() {
                state.refresh_files();
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(matrix) = &state.matrix {
            ui.label(format!(
                "{} employees, {} categories",
                matrix.len(),
                matrix.categories.len()
            ));
        }

        ui.separator();

        match &state.status {
            Some(Status::Info(msg)) => {
                ui.label(msg);
            }
            Some(Status::Warning(msg)) => {
                ui.label(RichText::new(msg).color(Color32::from_rgb(230, 160, 0)));
            }
            Some(Status::Error(msg)) => {
                ui.label(RichText::new(msg).color(Color32::RED));
            }
            None => {}
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open skill matrix")
        .set_directory(&state.data_dir)
        .add_filter("Supported files", SUPPORTED_EXTENSIONS)
        .add_filter("Excel", &["xlsx", "xlsm", "xls"])
        .add_filter("OpenDocument", &["ods"])
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.select_file(path);
    }
}
