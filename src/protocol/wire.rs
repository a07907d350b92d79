//! Sync payload codecs.
//!
//! Two encodings of the same [`SyncBatch`]:
//! - the legacy text stream served at `/chat/get.php` (cursor line, then one
//!   `user\tmsg` line per message, then an optional `Console` banner after
//!   a blank line);
//! - a versioned JSON envelope served at `/api/chat/sync`.

use serde::{Deserialize, Serialize};

use crate::common::{ChatLine, ChatMessage, Cursor, SyncBatch};

pub const JSON_VERSION: u32 = 1;

/// Sender shown for the welcome banner.
pub const CONSOLE_USER: &str = "Console";

#[derive(Debug, thiserror::Error)]
pub enum WireError {
    #[error("missing cursor line")]
    MissingCursor,

    #[error("invalid cursor `{0}`")]
    BadCursor(String),

    #[error("invalid message id `{0}`")]
    BadId(String),

    #[error("malformed chat line `{0}`")]
    BadLine(String),

    #[error("unsupported protocol version {0}")]
    UnsupportedVersion(u32),

    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),
}

/// Sync result as seen by a client, independent of the wire encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedBatch {
    pub cursor: Cursor,
    /// Oldest first.
    pub lines: Vec<ChatLine>,
    pub welcome: Option<String>,
}

pub fn encode_text(batch: &SyncBatch) -> String {
    let mut out = format!("{}\n", batch.cursor);
    for message in &batch.messages {
        out.push_str(&message.user);
        out.push('\t');
        out.push_str(&message.msg);
        out.push('\n');
    }
    if let Some(welcome) = &batch.welcome {
        out.push('\n');
        out.push_str(CONSOLE_USER);
        out.push('\t');
        out.push_str(welcome);
    }
    out
}

/// Decode a text body. An empty body is the server's no-op answer and
/// decodes to `None`.
pub fn decode_text(body: &str) -> Result<Option<ReceivedBatch>, WireError> {
    if body.is_empty() {
        return Ok(None);
    }

    let mut lines = body.split('\n');
    let first = lines.next().ok_or(WireError::MissingCursor)?;
    let cursor = Cursor::parse(first).ok_or_else(|| WireError::BadCursor(first.to_string()))?;

    let mut chat_lines = Vec::new();
    let mut welcome = None;
    while let Some(line) = lines.next() {
        if line.is_empty() {
            // Blank line ends the batch; only the banner may follow it.
            if let Some(banner) = lines.find(|line| !line.is_empty()) {
                let (_, text) = banner
                    .split_once('\t')
                    .ok_or_else(|| WireError::BadLine(banner.to_string()))?;
                welcome = Some(text.to_string());
            }
            break;
        }

        let (user, msg) = line
            .split_once('\t')
            .ok_or_else(|| WireError::BadLine(line.to_string()))?;
        chat_lines.push(ChatLine {
            user: user.to_string(),
            msg: msg.to_string(),
        });
    }

    Ok(Some(ReceivedBatch {
        cursor,
        lines: chat_lines,
        welcome,
    }))
}

/// JSON envelope of a sync response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncEnvelope {
    pub version: u32,
    pub cursor: i64,
    pub first_poll: bool,
    pub last_sent: Option<i64>,
    pub welcome: Option<String>,
    pub messages: Vec<ChatMessage>,
}

impl From<&SyncBatch> for SyncEnvelope {
    fn from(batch: &SyncBatch) -> Self {
        Self {
            version: JSON_VERSION,
            cursor: batch.cursor.value(),
            first_poll: batch.first_poll,
            last_sent: batch.last_sent.timestamp(),
            welcome: batch.welcome.clone(),
            messages: batch.messages.clone(),
        }
    }
}

impl TryFrom<SyncEnvelope> for ReceivedBatch {
    type Error = WireError;

    fn try_from(envelope: SyncEnvelope) -> Result<Self, Self::Error> {
        if envelope.version != JSON_VERSION {
            return Err(WireError::UnsupportedVersion(envelope.version));
        }
        let cursor = Cursor::new(envelope.cursor)
            .ok_or_else(|| WireError::BadCursor(envelope.cursor.to_string()))?;

        Ok(Self {
            cursor,
            lines: envelope.messages.into_iter().map(ChatLine::from).collect(),
            welcome: envelope.welcome,
        })
    }
}

pub fn decode_json(body: &[u8]) -> Result<ReceivedBatch, WireError> {
    serde_json::from_slice::<SyncEnvelope>(body)?.try_into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::LastSent;

    fn message(id: i64, user: &str, msg: &str) -> ChatMessage {
        ChatMessage {
            id,
            user: user.to_string(),
            msg: msg.to_string(),
            time: 1_700_000_000 + id,
        }
    }

    fn batch(cursor: i64, messages: Vec<ChatMessage>, welcome: Option<&str>) -> SyncBatch {
        let last_sent = messages
            .last()
            .map_or(LastSent::Never, |m| LastSent::At(m.time));
        SyncBatch {
            cursor: Cursor::new(cursor).unwrap(),
            messages,
            first_poll: welcome.is_some(),
            last_sent,
            welcome: welcome.map(str::to_string),
        }
    }

    #[test]
    fn text_lists_oldest_first() {
        let body = encode_text(&batch(
            8,
            vec![message(7, "ann", "hi"), message(8, "bob", "yo")],
            None,
        ));
        assert_eq!(body, "8\nann\thi\nbob\tyo\n");
    }

    #[test]
    fn text_banner_follows_a_blank_line() {
        let body = encode_text(&batch(
            1,
            vec![message(1, "ann", "hi")],
            Some("Welcome to A3P. Last message sent less than a minute ago."),
        ));
        assert_eq!(
            body,
            "1\nann\thi\n\nConsole\tWelcome to A3P. Last message sent less than a minute ago."
        );
    }

    #[test]
    fn text_empty_log_on_first_poll() {
        let body = encode_text(&batch(0, vec![], Some("Welcome to A3P. Last message sent NEVER")));
        assert_eq!(body, "0\n\nConsole\tWelcome to A3P. Last message sent NEVER");
    }

    #[test]
    fn decode_text_reads_banner_and_lines() {
        let decoded = decode_text("2\nann\thi\nbob\tyo\n\nConsole\tWelcome")
            .unwrap()
            .unwrap();
        assert_eq!(decoded.cursor.value(), 2);
        assert_eq!(decoded.lines.len(), 2);
        assert_eq!(decoded.lines[1].user, "bob");
        assert_eq!(decoded.welcome.as_deref(), Some("Welcome"));
    }

    #[test]
    fn decode_text_without_messages() {
        let decoded = decode_text("25\n").unwrap().unwrap();
        assert_eq!(decoded.cursor.value(), 25);
        assert!(decoded.lines.is_empty());
        assert!(decoded.welcome.is_none());
    }

    #[test]
    fn decode_text_empty_body_is_noop() {
        assert!(decode_text("").unwrap().is_none());
    }

    #[test]
    fn decode_text_rejects_garbage() {
        assert!(matches!(decode_text("x\n"), Err(WireError::BadCursor(_))));
        assert!(matches!(
            decode_text("3\nno tab here\n"),
            Err(WireError::BadLine(_))
        ));
    }

    #[test]
    fn json_envelope_carries_metadata() {
        let sync = batch(3, vec![message(3, "ann", "hi")], None);
        let envelope = SyncEnvelope::from(&sync);
        assert_eq!(envelope.version, JSON_VERSION);
        assert_eq!(envelope.last_sent, Some(1_700_000_003));

        let bytes = serde_json::to_vec(&envelope).unwrap();
        let received = decode_json(&bytes).unwrap();
        assert_eq!(received.cursor.value(), 3);
        assert_eq!(received.lines[0].msg, "hi");
    }

    #[test]
    fn json_rejects_unknown_version() {
        let body = br#"{"version":2,"cursor":0,"first_poll":true,"last_sent":null,"welcome":null,"messages":[]}"#;
        assert!(matches!(
            decode_json(body),
            Err(WireError::UnsupportedVersion(2))
        ));
    }
}
