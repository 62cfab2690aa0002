use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};
use skill_matrix::data::export::EXPORT_FILE_NAME;
use skill_matrix::data::report::{DisplayTable, ReportOutcome};

use super::to_color32;
use crate::state::{AppState, Status, NO_FILE_MESSAGE, NO_MATCH_MESSAGE};

const ROW_HEIGHT: f32 = 26.0;

// ---------------------------------------------------------------------------
// Report (central panel)
// ---------------------------------------------------------------------------

/// Render the filtered report in the central panel.
pub fn report_panel(ui: &mut Ui, state: &mut AppState) {
    if state.matrix.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading(NO_FILE_MESSAGE);
        });
        return;
    }

    let display = match &state.outcome {
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Choose categories and subcategories, then press Apply Filters");
            });
            return;
        }
        Some(ReportOutcome::NoMatches) => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading(RichText::new(NO_MATCH_MESSAGE).color(Color32::from_rgb(230, 160, 0)));
            });
            return;
        }
        Some(ReportOutcome::Ready(report)) => &report.display,
    };

    ui.heading("Filtered Employee Report");
    ui.add_space(4.0);

    let download = ui.button("Download Filtered Report").clicked();
    ui.add_space(4.0);

    egui::ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
        report_table(ui, display);
    });

    if download {
        save_report(state);
    }
}

fn report_table(ui: &mut Ui, display: &DisplayTable) {
    TableBuilder::new(ui)
        .striped(true)
        .column(Column::auto().at_least(32.0))
        .column(Column::auto().at_least(140.0))
        .columns(Column::auto().at_least(90.0), display.labels.len())
        .header(ROW_HEIGHT, |mut header| {
            header.col(|ui| {
                ui.strong("#");
            });
            header.col(|ui| {
                ui.strong(&display.identifier_label);
            });
            for label in &display.labels {
                header.col(|ui| {
                    ui.strong(label);
                });
            }
        })
        .body(|mut body| {
            for row in &display.rows {
                body.row(ROW_HEIGHT, |mut table_row| {
                    table_row.col(|ui| {
                        ui.label(row.index.to_string());
                    });
                    table_row.col(|ui| {
                        ui.label(&row.identifier);
                    });
                    for cell in &row.cells {
                        table_row.col(|ui| {
                            let background = to_color32(cell.color.background);
                            ui.painter().rect_filled(ui.max_rect(), 0.0, background);
                            ui.label(
                                RichText::new(&cell.text)
                                    .color(to_color32(cell.color.foreground.rgb()))
                                    .strong()
                                    .size(16.0),
                            );
                        });
                    }
                });
            }
        });
}

fn save_report(state: &mut AppState) {
    let Some(path) = rfd::FileDialog::new()
        .set_title("Save filtered report")
        .set_file_name(EXPORT_FILE_NAME)
        .add_filter("CSV", &["csv"])
        .save_file()
    else {
        return;
    };

    match state.export_report(&path) {
        Ok(()) => {
            state.status = Some(Status::Info(format!("Saved {}", path.display())));
        }
        Err(e) => {
            log::error!("Failed to export report: {e:#}");
            state.status = Some(Status::Error(format!("Error: {e:#}")));
        }
    }
}
