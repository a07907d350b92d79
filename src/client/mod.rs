pub mod poller;
pub mod transport;

pub use poller::ChatPoller;
pub use transport::{ClientError, HttpTransport};

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::common::{ChatIdentity, ClientCommand, ClientEvent};
use crate::config::AppConfig;
use crate::protocol::wire::CONSOLE_USER;

/// Channels linking a UI to a running poller.
pub struct PollerHandle {
    pub commands: mpsc::Sender<ClientCommand>,
    pub events: mpsc::Receiver<ClientEvent>,
    pub task: JoinHandle<()>,
}

/// Start an HTTP poller in the background.
pub fn spawn_poller(config: &AppConfig, identity: ChatIdentity) -> Result<PollerHandle, ClientError> {
    // UI -> Poller
    let (cmd_tx, cmd_rx) = mpsc::channel(100);
    // Poller -> UI
    let (event_tx, event_rx) = mpsc::channel(100);

    let transport = HttpTransport::new(&config.server_url, config.wire_format)?;
    let poller = ChatPoller::new(transport, identity, config.poll_interval(), event_tx, cmd_rx);
    log::info!("Polling {} ({:?})", config.server_url, config.wire_format);

    Ok(PollerHandle {
        commands: cmd_tx,
        events: event_rx,
        task: tokio::spawn(poller.run()),
    })
}

/// Headless client: prints chat lines to stdout and posts stdin lines.
pub async fn run_tail(config: &AppConfig, identity: ChatIdentity) -> Result<(), ClientError> {
    let PollerHandle {
        commands,
        mut events,
        task,
    } = spawn_poller(config, identity)?;
    let mut stdin = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = stdin.next_line() => {
                match line {
                    Ok(Some(text)) if !text.trim().is_empty() => {
                        if commands.send(ClientCommand::SendMessage(text)).await.is_err() {
                            break;
                        }
                    }
                    Ok(Some(_)) => {}
                    Ok(None) => break,
                    Err(err) => {
                        log::warn!("Failed to read stdin: {err}");
                        break;
                    }
                }
            }
            event = events.recv() => {
                match event {
                    Some(event) => print_event(&event),
                    None => break,
                }
            }
        }
    }

    drop(commands);
    if let Err(err) = task.await {
        log::error!("Chat poller terminated: {err}");
    }
    Ok(())
}

fn print_event(event: &ClientEvent) {
    match event {
        ClientEvent::MessagesReceived(lines) => {
            for line in lines {
                println!("{}: {}", line.user, line.msg);
            }
        }
        ClientEvent::Welcome(text) => println!("{CONSOLE_USER}: {text}"),
        ClientEvent::PollFailed(reason) => eprintln!("(chat unavailable: {reason})"),
        ClientEvent::CursorAdvanced(_) => {}
    }
}
