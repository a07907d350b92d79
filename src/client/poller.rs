use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{MissedTickBehavior, interval};

use super::transport::{ClientError, SyncTransport};
use crate::common::{ChatIdentity, ClientCommand, ClientEvent, Cursor};
use crate::protocol::ReceivedBatch;

/// Client side of the chat protocol.
///
/// Owns the cursor; polls one request at a time, so a slow answer delays
/// the next tick instead of overlapping with it.
pub struct ChatPoller<T> {
    transport: T,
    identity: ChatIdentity,
    poll_interval: Duration,
    last_seen: Cursor,
    welcomed: bool,
    event_sender: mpsc::Sender<ClientEvent>,
    command_receiver: mpsc::Receiver<ClientCommand>,
}

impl<T: SyncTransport> ChatPoller<T> {
    pub fn new(
        transport: T,
        identity: ChatIdentity,
        poll_interval: Duration,
        event_sender: mpsc::Sender<ClientEvent>,
        command_receiver: mpsc::Receiver<ClientCommand>,
    ) -> Self {
        Self {
            transport,
            identity,
            poll_interval,
            last_seen: Cursor::BOOTSTRAP,
            welcomed: false,
            event_sender,
            command_receiver,
        }
    }

    pub fn last_seen(&self) -> Cursor {
        self.last_seen
    }

    /// Poll until the command channel closes.
    pub async fn run(mut self) {
        let mut ticker = interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        log::info!(
            "Chat poller started as {} every {:?}",
            self.identity.display_name,
            self.poll_interval
        );

        loop {
            tokio::select! {
                command = self.command_receiver.recv() => {
                    match command {
                        Some(command) => self.handle_command(command).await,
                        None => break,
                    }
                }
                _ = ticker.tick() => {
                    // Failures are reported as events; the next tick retries.
                    let _ = self.poll_once().await;
                }
            }
        }

        log::info!("Chat poller stopped at cursor {}", self.last_seen);
    }

    async fn handle_command(&mut self, command: ClientCommand) {
        match command {
            ClientCommand::SendMessage(text) => {
                let posted = self.transport.post(&self.identity.display_name, &text).await;
                match posted {
                    Ok(id) => {
                        log::debug!("Posted message {id}");
                        let _ = self.poll_once().await;
                    }
                    Err(err) => {
                        log::warn!("Failed to post message: {err}");
                        self.emit(ClientEvent::PollFailed(format!("send failed: {err}")))
                            .await;
                    }
                }
            }
            ClientCommand::PollNow => {
                let _ = self.poll_once().await;
            }
        }
    }

    /// Run one sync round trip. The cursor only moves on success.
    pub async fn poll_once(&mut self) -> Result<(), ClientError> {
        let answer = self.transport.sync(self.last_seen).await;
        match answer {
            Ok(Some(batch)) => {
                self.apply(batch).await;
                Ok(())
            }
            Ok(None) => {
                log::warn!("Server ignored cursor {}", self.last_seen);
                Ok(())
            }
            Err(err) => {
                log::warn!("Poll from cursor {} failed: {err}", self.last_seen);
                self.emit(ClientEvent::PollFailed(err.to_string())).await;
                Err(err)
            }
        }
    }

    async fn apply(&mut self, batch: ReceivedBatch) {
        if !batch.lines.is_empty() {
            self.emit(ClientEvent::MessagesReceived(batch.lines)).await;
        }

        // The banner repeats for as long as the cursor stays at 0.
        if let Some(welcome) = batch.welcome {
            if !self.welcomed {
                self.welcomed = true;
                self.emit(ClientEvent::Welcome(welcome)).await;
            }
        }

        if batch.cursor != self.last_seen {
            self.last_seen = batch.cursor;
            self.emit(ClientEvent::CursorAdvanced(batch.cursor.value()))
                .await;
        }
    }

    async fn emit(&mut self, event: ClientEvent) {
        if let Err(err) = self.event_sender.send(event).await {
            log::warn!("Failed to notify UI: {err}");
        }
    }
}
