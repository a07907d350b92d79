pub mod chat_db;
pub mod database;
pub mod models;

pub use chat_db::ChatDatabase;
pub use models::NewChatMessage;

use std::fs;
use std::path::Path;

use crate::common::ChatMessage;

/// Storage error types.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("rejected: {0}")]
    Rejected(String),
}

/// Read/append access to the chat log.
pub trait MessageStore: Send + Sync {
    /// Messages with `id > cursor`, newest first, at most `limit` rows.
    fn latest_after(&self, cursor: i64, limit: usize) -> Result<Vec<ChatMessage>, StoreError>;

    /// Append a message; the store assigns `id` and `time`.
    fn insert_message(&self, message: &NewChatMessage) -> Result<ChatMessage, StoreError>;
}

/// Ensure the parent directory of a database file exists
pub fn ensure_data_dir(db_path: &str) -> std::io::Result<()> {
    if let Some(parent) = Path::new(db_path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
