use std::sync::Arc;

use chrono::Utc;

use super::relative_time;
use crate::common::{ChatMessage, Cursor, LastSent, SyncBatch};
use crate::storage::{MessageStore, NewChatMessage, StoreError};

/// Maximum number of messages in one sync answer.
pub const PAGE_SIZE: usize = 20;

/// Server side of the chat protocol: cursor sync and posting.
#[derive(Clone)]
pub struct ChatService {
    store: Arc<dyn MessageStore>,
    game_title: String,
}

impl ChatService {
    pub fn new(store: Arc<dyn MessageStore>, game_title: impl Into<String>) -> Self {
        Self {
            store,
            game_title: game_title.into(),
        }
    }

    pub fn sync(&self, cursor: Cursor) -> Result<SyncBatch, StoreError> {
        self.sync_at(cursor, Utc::now().timestamp())
    }

    /// Sync against an explicit clock (`now` in epoch seconds).
    pub fn sync_at(&self, cursor: Cursor, now: i64) -> Result<SyncBatch, StoreError> {
        let mut messages = self.store.latest_after(cursor.value(), PAGE_SIZE)?;

        let (next, last_sent) = match messages.first() {
            Some(newest) => (
                Cursor::new(newest.id).unwrap_or(cursor),
                LastSent::At(newest.time),
            ),
            None => (cursor, LastSent::Never),
        };

        // The store answers newest first; clients display oldest first.
        messages.reverse();

        let first_poll = cursor.is_bootstrap();
        let welcome = first_poll.then(|| {
            format!(
                "Welcome to {}. Last message sent {}",
                self.game_title,
                relative_time::phrase(last_sent, now)
            )
        });

        Ok(SyncBatch {
            cursor: next,
            messages,
            first_poll,
            last_sent,
            welcome,
        })
    }

    pub fn post(&self, user: &str, msg: &str) -> Result<ChatMessage, StoreError> {
        let message = NewChatMessage::new(user, msg)?;
        let stored = self.store.insert_message(&message)?;
        log::debug!("Stored chat message {} from {}", stored.id, stored.user);
        Ok(stored)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::storage::ChatDatabase;

    const NOW: i64 = 1_700_000_000;

    /// Failure detail that must never reach a client.
    pub(crate) const SECRET_DETAIL: &str = "connection refused by db-host:3306";

    /// Store wrapper counting reads, optionally failing every call.
    pub(crate) struct ProbeStore {
        pub inner: ChatDatabase,
        pub reads: AtomicUsize,
        pub broken: bool,
    }

    impl ProbeStore {
        pub fn new(broken: bool) -> Self {
            Self {
                inner: ChatDatabase::in_memory().expect("open test db"),
                reads: AtomicUsize::new(0),
                broken,
            }
        }
    }

    impl MessageStore for ProbeStore {
        fn latest_after(&self, cursor: i64, limit: usize) -> Result<Vec<ChatMessage>, StoreError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            if self.broken {
                return Err(StoreError::Unavailable(SECRET_DETAIL.to_string()));
            }
            self.inner.latest_after(cursor, limit)
        }

        fn insert_message(&self, message: &NewChatMessage) -> Result<ChatMessage, StoreError> {
            if self.broken {
                return Err(StoreError::Unavailable(SECRET_DETAIL.to_string()));
            }
            self.inner.insert_message(message)
        }
    }

    fn service_with(count: i64, time_of: impl Fn(i64) -> i64) -> ChatService {
        let db = ChatDatabase::in_memory().unwrap();
        for id in 1..=count {
            let message = NewChatMessage::new(&format!("u{id}"), &format!("m{id}")).unwrap();
            db.insert_message_at(&message, time_of(id)).unwrap();
        }
        ChatService::new(Arc::new(db), "A3P")
    }

    fn cursor(value: i64) -> Cursor {
        Cursor::new(value).unwrap()
    }

    fn ids(batch: &SyncBatch) -> Vec<i64> {
        batch.messages.iter().map(|m| m.id).collect()
    }

    #[test]
    fn first_page_is_capped_and_oldest_first() {
        let service = service_with(25, |id| NOW - 100 + id);
        let batch = service.sync_at(Cursor::BOOTSTRAP, NOW).unwrap();

        assert_eq!(ids(&batch), (6..=25).collect::<Vec<_>>());
        assert_eq!(batch.cursor.value(), 25);
        assert!(batch.first_poll);
        assert_eq!(batch.last_sent, LastSent::At(NOW - 75));
        assert_eq!(
            batch.welcome.as_deref(),
            Some("Welcome to A3P. Last message sent about a minute ago.")
        );

        let next = service.sync_at(batch.cursor, NOW).unwrap();
        assert!(next.messages.is_empty());
        assert_eq!(next.cursor.value(), 25);
        assert!(!next.first_poll);
        assert_eq!(next.welcome, None);
        assert_eq!(next.last_sent, LastSent::Never);
    }

    #[test]
    fn only_newer_messages_are_returned() {
        let service = service_with(10, |id| NOW - id);
        for c in 0..=10 {
            let batch = service.sync_at(cursor(c), NOW).unwrap();
            assert!(batch.messages.iter().all(|m| m.id > c));
            assert_eq!(batch.messages.len() as i64, 10 - c);
            let max = batch.messages.iter().map(|m| m.id).max().unwrap_or(c);
            assert_eq!(batch.cursor.value(), max);
        }
    }

    #[test]
    fn following_the_cursor_never_repeats_a_message() {
        let service = service_with(5, |_| NOW);
        let mut seen = Vec::new();

        let first = service.sync_at(Cursor::BOOTSTRAP, NOW).unwrap();
        seen.extend(ids(&first));
        for n in 0..3 {
            service.post("late", &format!("late {n}")).unwrap();
        }
        let second = service.sync_at(first.cursor, NOW).unwrap();
        seen.extend(ids(&second));
        let third = service.sync_at(second.cursor, NOW).unwrap();
        seen.extend(ids(&third));

        assert_eq!(seen, (1..=8).collect::<Vec<_>>());
        assert_eq!(third.cursor.value(), 8);
    }

    #[test]
    fn first_poll_flag_tracks_bootstrap_cursor() {
        let service = service_with(3, |_| NOW);
        assert!(service.sync_at(Cursor::BOOTSTRAP, NOW).unwrap().first_poll);
        for c in 1..5 {
            let batch = service.sync_at(cursor(c), NOW).unwrap();
            assert!(!batch.first_poll);
            assert!(batch.welcome.is_none());
        }
    }

    #[test]
    fn empty_log_reports_never() {
        let service = service_with(0, |_| NOW);
        let batch = service.sync_at(Cursor::BOOTSTRAP, NOW).unwrap();
        assert_eq!(batch.cursor, Cursor::BOOTSTRAP);
        assert_eq!(batch.last_sent, LastSent::Never);
        assert_eq!(
            batch.welcome.as_deref(),
            Some("Welcome to A3P. Last message sent NEVER")
        );
    }

    #[test]
    fn welcome_uses_newest_message_age() {
        let service = service_with(2, |id| NOW - 200_000 + id);
        let batch = service.sync_at(Cursor::BOOTSTRAP, NOW).unwrap();
        assert_eq!(
            batch.welcome.as_deref(),
            Some("Welcome to A3P. Last message sent 2 days ago.")
        );
    }

    #[test]
    fn sync_is_idempotent() {
        let service = service_with(7, |id| NOW - id * 60);
        for c in [0, 3, 7] {
            let a = service.sync_at(cursor(c), NOW).unwrap();
            let b = service.sync_at(cursor(c), NOW).unwrap();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn store_failure_is_an_error_not_a_partial_batch() {
        let service = ChatService::new(Arc::new(ProbeStore::new(true)), "A3P");
        assert!(matches!(
            service.sync_at(Cursor::BOOTSTRAP, NOW),
            Err(StoreError::Unavailable(_))
        ));
    }

    #[test]
    fn post_sanitizes_before_storing() {
        let service = service_with(0, |_| NOW);
        let stored = service.post("ev\til", "line one\nline two").unwrap();
        assert_eq!(stored.user, "ev il");
        assert_eq!(stored.msg, "line one line two");

        let batch = service.sync(Cursor::BOOTSTRAP).unwrap();
        assert_eq!(batch.messages, vec![stored]);
    }

    #[test]
    fn post_rejects_empty_message() {
        let service = service_with(0, |_| NOW);
        assert!(matches!(service.post("ann", "\n"), Err(StoreError::Rejected(_))));
    }
}
