use std::sync::Arc;

use axum::extract::rejection::FormRejection;
use axum::extract::{Form, Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use super::error::AppError;
use crate::common::{Cursor, SyncBatch};
use crate::protocol::ChatService;
use crate::protocol::wire::{self, SyncEnvelope};

/// Shared state behind every handler
pub struct ServerState {
    pub chat: ChatService,
}

pub type SharedState = Arc<ServerState>;

/// Form body of the legacy sync request (`i` = cursor)
#[derive(Debug, Default, Deserialize)]
pub struct SyncForm {
    #[serde(default)]
    pub i: Option<String>,
}

impl SyncForm {
    pub fn cursor(&self) -> Option<Cursor> {
        self.i.as_deref().and_then(Cursor::parse)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SyncQuery {
    #[serde(default)]
    pub cursor: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PostForm {
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub msg: Option<String>,
}

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Legacy text sync. A missing or non-numeric cursor is answered with an
/// empty body and never reaches the store.
pub async fn sync_text(
    State(state): State<SharedState>,
    form: Result<Form<SyncForm>, FormRejection>,
) -> Result<impl IntoResponse, AppError> {
    let cursor = match form {
        Ok(Form(form)) => form.cursor(),
        Err(rejection) => {
            log::debug!("Unreadable sync form: {rejection}");
            None
        }
    };

    let body = match cursor {
        Some(cursor) => wire::encode_text(&run_sync(&state, cursor).await?),
        None => String::new(),
    };

    Ok(([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], body))
}

/// Versioned JSON sync.
pub async fn sync_json(
    State(state): State<SharedState>,
    Query(query): Query<SyncQuery>,
) -> Result<Json<SyncEnvelope>, AppError> {
    let cursor = query
        .cursor
        .as_deref()
        .and_then(Cursor::parse)
        .ok_or_else(|| AppError::BadRequest("invalid cursor".to_string()))?;

    let batch = run_sync(&state, cursor).await?;
    Ok(Json(SyncEnvelope::from(&batch)))
}

/// Append a message; answers the new id.
pub async fn post_message(
    State(state): State<SharedState>,
    Form(form): Form<PostForm>,
) -> Result<String, AppError> {
    let chat = state.chat.clone();
    let user = form.user.unwrap_or_default();
    let msg = form.msg.unwrap_or_default();

    let stored = tokio::task::spawn_blocking(move || chat.post(&user, &msg)).await??;
    log::info!("Message {} posted by {}", stored.id, stored.user);
    Ok(stored.id.to_string())
}

async fn run_sync(state: &SharedState, cursor: Cursor) -> Result<SyncBatch, AppError> {
    let chat = state.chat.clone();
    let batch = tokio::task::spawn_blocking(move || chat.sync(cursor)).await??;
    log::debug!(
        "Sync from {cursor}: {} message(s), next cursor {}",
        batch.messages.len(),
        batch.cursor
    );
    Ok(batch)
}
