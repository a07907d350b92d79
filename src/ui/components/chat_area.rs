use eframe::egui;

use crate::common::ChatLine;
use crate::protocol::wire::CONSOLE_USER;

pub fn render(ui: &mut egui::Ui, messages: &[ChatLine]) {
    egui::ScrollArea::vertical()
        .stick_to_bottom(true)
        .auto_shrink([false, false])
        .max_height(ui.available_height() - 40.0)
        .show(ui, |ui| {
            for message in messages {
                let text = format!("{}: {}", message.user, message.msg);
                if message.user == CONSOLE_USER {
                    ui.label(egui::RichText::new(text).italics().weak());
                } else {
                    ui.label(text);
                }
            }
        });
}
