use chrono::{DateTime, Utc};

use crate::common::{ChatLine, ClientEvent};
use crate::protocol::wire::CONSOLE_USER;

/// Giữ tối đa 500 dòng chat để không chiếm quá nhiều bộ nhớ
const MAX_MESSAGES: usize = 500;

/// Trạng thái cục bộ của UI.
pub struct AppState {
    pub messages: Vec<ChatLine>,
    pub input_text: String,
    pub display_name: String,
    pub cursor: i64,
    /// Reason of the latest failed poll, cleared by the next success.
    pub last_error: Option<String>,
    pub last_update: Option<DateTime<Utc>>,
}

impl AppState {
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            messages: Vec::new(),
            input_text: String::new(),
            display_name: display_name.into(),
            cursor: 0,
            last_error: None,
            last_update: None,
        }
    }

    pub fn apply(&mut self, event: ClientEvent) {
        match event {
            ClientEvent::MessagesReceived(lines) => self.push_messages(lines),
            ClientEvent::Welcome(text) => self.push_messages(vec![ChatLine {
                user: CONSOLE_USER.to_string(),
                msg: text,
            }]),
            ClientEvent::CursorAdvanced(cursor) => {
                self.cursor = cursor;
                self.mark_healthy();
            }
            ClientEvent::PollFailed(reason) => self.last_error = Some(reason),
        }
    }

    fn push_messages(&mut self, mut lines: Vec<ChatLine>) {
        self.messages.append(&mut lines);
        if self.messages.len() > MAX_MESSAGES {
            let excess = self.messages.len() - MAX_MESSAGES;
            self.messages.drain(..excess);
        }
        self.mark_healthy();
    }

    fn mark_healthy(&mut self) {
        self.last_error = None;
        self.last_update = Some(Utc::now());
    }
}
