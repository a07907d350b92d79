pub mod commands;
pub mod events;
pub mod types;

pub use commands::ClientCommand;
pub use events::ClientEvent;
pub use types::{ChatIdentity, ChatLine, ChatMessage, Cursor, LastSent, SyncBatch};
