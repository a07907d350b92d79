pub mod error;
pub mod handlers;
pub mod routes;

use std::error::Error;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::signal;

use crate::config::AppConfig;
use crate::protocol::ChatService;
use crate::storage::{self, ChatDatabase};

pub use handlers::ServerState;
pub use routes::create_router;

/// Open the chat log and serve the sync endpoint until ctrl-c.
pub async fn run(config: &AppConfig) -> Result<(), Box<dyn Error>> {
    storage::ensure_data_dir(&config.database_path)?;
    let db = ChatDatabase::with_path(&config.database_path)?;
    log::info!(
        "Chat log {} opened with {} message(s)",
        config.database_path,
        db.message_count()?
    );

    let state = Arc::new(ServerState {
        chat: ChatService::new(Arc::new(db), config.game_title.clone()),
    });

    let listener = TcpListener::bind(&config.bind_address).await?;
    log::info!("Chat sync endpoint listening on {}", listener.local_addr()?);

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(async {
            if signal::ctrl_c().await.is_ok() {
                log::info!("Received shutdown signal, stopping chat server...");
            }
        })
        .await?;

    Ok(())
}
