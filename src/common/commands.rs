/// Lệnh UI gửi xuống poller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientCommand {
    /// Post a message under the poller's display name, then poll.
    SendMessage(String),
    /// Poll right away instead of waiting for the next tick.
    PollNow,
}
