use eframe::egui;

use crate::ui::state::AppState;

/// Connection status line. Returns true when "Refresh" was clicked.
pub fn render(ui: &mut egui::Ui, state: &AppState) -> bool {
    let mut refresh = false;
    ui.horizontal(|ui| {
        ui.label(format!("Signed in as {}", state.display_name));
        ui.separator();
        ui.label(format!("cursor {}", state.cursor));
        ui.separator();

        match (&state.last_error, state.last_update) {
            (Some(reason), _) => {
                ui.colored_label(egui::Color32::RED, format!("offline: {reason}"));
            }
            (None, Some(at)) => {
                ui.label(egui::RichText::new(format!("synced {}", at.format("%H:%M:%S"))).weak());
            }
            (None, None) => {
                ui.label(egui::RichText::new("connecting...").weak());
            }
        }

        if ui.button("Refresh").clicked() {
            refresh = true;
        }
    });
    refresh
}
