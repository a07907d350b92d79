use std::time::Duration;

use eframe::egui;
use tokio::sync::mpsc;

use crate::common::{ClientCommand, ClientEvent};

use super::components::{chat_area, input_bar, status_bar};
use super::state::AppState;

pub struct ChatApp {
    state: AppState,
    command_sender: mpsc::Sender<ClientCommand>,
    event_receiver: mpsc::Receiver<ClientEvent>,
}

impl ChatApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        display_name: String,
        command_sender: mpsc::Sender<ClientCommand>,
        event_receiver: mpsc::Receiver<ClientEvent>,
    ) -> Self {
        Self {
            state: AppState::new(display_name),
            command_sender,
            event_receiver,
        }
    }

    fn handle_poller_events(&mut self) {
        while let Ok(event) = self.event_receiver.try_recv() {
            self.state.apply(event);
        }
    }

    fn send_command(&mut self, command: ClientCommand) {
        if let Err(err) = self.command_sender.try_send(command) {
            log::warn!("Failed to send command to poller: {err}");
        }
    }
}

impl eframe::App for ChatApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_poller_events();

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            if status_bar::render(ui, &self.state) {
                self.send_command(ClientCommand::PollNow);
            }
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("A3P Chat");
            ui.separator();
            chat_area::render(ui, &self.state.messages);

            ui.separator();
            if let Some(content) = input_bar::render(ui, &mut self.state.input_text) {
                self.send_command(ClientCommand::SendMessage(content));
            }
        });

        // Poller events arrive off-frame; wake up to drain them.
        ctx.request_repaint_after(Duration::from_millis(250));
    }
}
