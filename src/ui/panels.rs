use eframe::egui::{self, Color32, RichText, Ui};

use crate::state::AppState;

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
        });

        ui.separator();

        if let Some(path) = &state.source {
            ui.label(path.display().to_string());
            ui.separator();
        }

        let mut window = state.window;
        let slider = egui::Slider::new(&mut window, 1..=state.max_window()).text("window");
        if ui.add_enabled(state.table.is_some(), slider).changed() {
            state.set_window(window);
        }

        if let Some(smoothed) = &state.smoothed {
            ui.separator();
            ui.label(format!("{} series", smoothed.columns.len()));
            if !smoothed.dropped.is_empty() {
                let names: Vec<String> = smoothed
                    .dropped
                    .iter()
                    .map(|d| format!("{} ('{}')", d.name, d.offending))
                    .collect();
                ui.label(
                    RichText::new(format!("{} non-numeric dropped", smoothed.dropped.len()))
                        .color(Color32::YELLOW),
                )
                .on_hover_text(names.join("\n"));
            }
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open metrics CSV")
        .add_filter("CSV", &["csv", "txt"])
        .pick_file();

    if let Some(path) = file {
        match crate::data::loader::load(&path) {
            Ok(table) => {
                log::info!("Loaded series {:?}", table.column_names());
                state.set_table(&path, table);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
