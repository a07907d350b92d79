mod client;
mod common;
mod config;
mod protocol;
mod server;
mod storage;
mod ui;

use std::error::Error;

use clap::{Parser, Subcommand};
use dotenvy::dotenv;

use common::ChatIdentity;
use config::AppConfig;
use ui::ChatApp;

#[derive(Parser)]
#[command(
    name = "a3p-chat",
    version,
    about = "A3P launcher chat: sync endpoint and polling client"
)]
struct Cli {
    /// Path to JSON config file
    #[arg(long, default_value = config::DEFAULT_CONFIG_PATH, value_name = "FILE")]
    config: String,
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Subcommand, Clone, PartialEq, Eq)]
enum Mode {
    /// Serve the chat sync endpoint
    Serve,
    /// Desktop chat window (default)
    Client {
        /// Display name, overrides the config file
        #[arg(long)]
        name: Option<String>,
    },
    /// Print chat to stdout, post lines read from stdin
    Tail {
        #[arg(long)]
        name: Option<String>,
    },
    /// Write the effective config back to --config
    InitConfig,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();
    // Khởi tạo Logger để debug
    env_logger::init();

    let cli = Cli::parse();
    let app_config = config::load_config(&cli.config);

    match cli.mode.unwrap_or(Mode::Client { name: None }) {
        Mode::Serve => server::run(&app_config).await,
        Mode::Client { name } => run_full_client(&app_config, identity(&app_config, name)),
        Mode::Tail { name } => {
            client::run_tail(&app_config, identity(&app_config, name)).await?;
            Ok(())
        }
        Mode::InitConfig => {
            config::save_config(&cli.config, &app_config)?;
            log::info!("Wrote config to {}", cli.config);
            Ok(())
        }
    }
}

fn identity(config: &AppConfig, name: Option<String>) -> ChatIdentity {
    ChatIdentity::new(name.unwrap_or_else(|| config.display_name.clone()))
}

fn run_full_client(config: &AppConfig, identity: ChatIdentity) -> Result<(), Box<dyn Error>> {
    // 1. Khởi chạy poller (chạy ngầm)
    let display_name = identity.display_name.clone();
    let handle = client::spawn_poller(config, identity)?;

    // 2. Khởi chạy UI (chạy trên main thread)
    let options = eframe::NativeOptions::default();
    let mut event_rx = Some(handle.events);
    let cmd_tx = handle.commands;

    eframe::run_native(
        "A3P Chat",
        options,
        Box::new(move |cc| {
            let event_receiver = event_rx
                .take()
                .ok_or("ChatApp should only be initialized once")?;

            log::info!("Chat window opened for {display_name}");
            Ok(Box::new(ChatApp::new(
                cc,
                display_name.clone(),
                cmd_tx.clone(),
                event_receiver,
            )))
        }),
    )
    .map_err(|err| err.to_string())?;

    Ok(())
}
