use super::types::ChatLine;

/// Sự kiện từ poller gửi lên UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    /// New messages, oldest first.
    MessagesReceived(Vec<ChatLine>),
    /// Welcome banner of the first successful poll.
    Welcome(String),
    /// A poll or post failed; the cursor was left as it was.
    PollFailed(String),
    /// Cursor after a successful poll.
    CursorAdvanced(i64),
}
