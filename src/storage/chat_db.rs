use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use rusqlite::{Result as SqlResult, params};

use super::database::Database;
use super::models::NewChatMessage;
use super::{MessageStore, StoreError};
use crate::common::ChatMessage;

/// SQLite-backed chat log (the `chats` table)
pub struct ChatDatabase {
    db: Mutex<Database>,
}

impl ChatDatabase {
    /// Initialize chat database at custom path
    pub fn with_path<P: AsRef<Path>>(path: P) -> SqlResult<Self> {
        Self::from_database(Database::new(path)?)
    }

    pub fn in_memory() -> SqlResult<Self> {
        Self::from_database(Database::in_memory()?)
    }

    fn from_database(db: Database) -> SqlResult<Self> {
        init_schema(&db)?;
        Ok(Self { db: Mutex::new(db) })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Database>, StoreError> {
        self.db
            .lock()
            .map_err(|_| StoreError::Unavailable("connection lock poisoned".to_string()))
    }

    /// Insert a message stamped with an explicit time.
    pub fn insert_message_at(
        &self,
        message: &NewChatMessage,
        time: i64,
    ) -> Result<ChatMessage, StoreError> {
        let db = self.lock()?;
        let conn = db.connection();
        conn.execute(
            "INSERT INTO chats (user, msg, time) VALUES (?1, ?2, ?3)",
            params![message.user(), message.msg(), time],
        )?;

        Ok(ChatMessage {
            id: conn.last_insert_rowid(),
            user: message.user().to_string(),
            msg: message.msg().to_string(),
            time,
        })
    }

    /// Get message count
    pub fn message_count(&self) -> Result<usize, StoreError> {
        let db = self.lock()?;
        let count: i64 =
            db.connection()
                .query_row("SELECT COUNT(*) FROM chats", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

fn init_schema(db: &Database) -> SqlResult<()> {
    let conn = db.connection();
    // AUTOINCREMENT: ids are never reused, so a cursor never skips a row.
    conn.execute(
        "CREATE TABLE IF NOT EXISTS chats (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user TEXT NOT NULL,
            msg TEXT NOT NULL,
            time INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
        )",
        [],
    )?;
    Ok(())
}

impl MessageStore for ChatDatabase {
    fn latest_after(&self, cursor: i64, limit: usize) -> Result<Vec<ChatMessage>, StoreError> {
        let db = self.lock()?;
        let mut stmt = db.connection().prepare_cached(
            "SELECT id, user, msg, time
             FROM chats
             WHERE id > ?1
             ORDER BY id DESC
             LIMIT ?2",
        )?;

        let messages = stmt
            .query_map(params![cursor, limit as i64], |row| {
                Ok(ChatMessage {
                    id: row.get(0)?,
                    user: row.get(1)?,
                    msg: row.get(2)?,
                    time: row.get(3)?,
                })
            })?
            .collect::<SqlResult<Vec<_>>>()?;

        Ok(messages)
    }

    fn insert_message(&self, message: &NewChatMessage) -> Result<ChatMessage, StoreError> {
        self.insert_message_at(message, Utc::now().timestamp())
    }
}
