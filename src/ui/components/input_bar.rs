use eframe::egui;

/// Text field plus Send button. Returns the trimmed message once submitted.
pub fn render(ui: &mut egui::Ui, input_text: &mut String) -> Option<String> {
    let mut submitted = false;
    ui.horizontal(|ui| {
        let response = ui.add(
            egui::TextEdit::singleline(input_text)
                .hint_text("Say something...")
                .desired_width(ui.available_width() - 60.0),
        );
        if ui.button("Send").clicked() {
            submitted = true;
        }

        if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
            submitted = true;
            response.request_focus();
        }
    });

    let message = input_text.trim();
    if !submitted || message.is_empty() {
        return None;
    }

    let message = message.to_string();
    input_text.clear();
    Some(message)
}
