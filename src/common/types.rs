use std::fmt;

use serde::{Deserialize, Serialize};

/// Domain model đại diện một tin nhắn chat.
///
/// `id` is assigned by the store and grows with insertion order; `time` is
/// Unix epoch seconds stamped at insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: i64,
    pub user: String,
    pub msg: String,
    pub time: i64,
}

/// One displayable chat entry as received by a client.
///
/// The text wire format carries only the sender and body, so this is what
/// every client-side consumer works with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatLine {
    pub user: String,
    pub msg: String,
}

impl From<ChatMessage> for ChatLine {
    fn from(message: ChatMessage) -> Self {
        Self {
            user: message.user,
            msg: message.msg,
        }
    }
}

/// Last message id the client has seen. Polling resumes strictly after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Cursor(i64);

impl Cursor {
    /// Value sent by a client that has not seen anything yet.
    pub const BOOTSTRAP: Cursor = Cursor(0);

    pub fn new(value: i64) -> Option<Self> {
        (value >= 0).then_some(Self(value))
    }

    /// Parse the textual form carried in requests.
    ///
    /// Only a plain non-negative integer is accepted (a leading `+` is
    /// tolerated). Anything else returns `None` and must never reach the
    /// store.
    pub fn parse(raw: &str) -> Option<Self> {
        let digits = raw.strip_prefix('+').unwrap_or(raw);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse::<i64>().ok().and_then(Self::new)
    }

    pub fn value(self) -> i64 {
        self.0
    }

    pub fn is_bootstrap(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Time of the newest message in a sync batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LastSent {
    Never,
    At(i64),
}

impl LastSent {
    pub fn timestamp(self) -> Option<i64> {
        match self {
            LastSent::Never => None,
            LastSent::At(ts) => Some(ts),
        }
    }
}

/// Result of one sync call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncBatch {
    /// Cursor the client should send next.
    pub cursor: Cursor,
    /// Oldest first.
    pub messages: Vec<ChatMessage>,
    pub first_poll: bool,
    pub last_sent: LastSent,
    /// Welcome line, present only on the first poll.
    pub welcome: Option<String>,
}

/// Display name used to attribute posted messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatIdentity {
    pub display_name: String,
}

impl ChatIdentity {
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
        }
    }
}
