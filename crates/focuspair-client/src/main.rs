//! focuspair: pair up with someone (or go solo) and keep each other focused.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tokio::io::BufReader;

use focuspair_client::{App, Command, TerminalPresenter};

#[derive(Parser)]
#[command(name = "focuspair", about = "Two-person focus sessions from the terminal")]
struct Args {
    /// Path to a TOML config file (default: ./focuspair.toml if present).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Relay WebSocket URL. Overrides the config file.
    #[arg(short, long)]
    url: Option<String>,

    #[command(subcommand)]
    start: Option<Start>,
}

/// Start right away instead of waiting for a command.
#[derive(Subcommand)]
enum Start {
    /// Create a room and wait for a peer.
    Create,
    /// Join a peer's room.
    Join { code: String },
    /// Focus on your own.
    Solo,
}

impl From<Start> for Command {
    fn from(start: Start) -> Self {
        match start {
            Start::Create => Command::Create,
            Start::Join { code } => Command::Join(code),
            Start::Solo => Command::Solo,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "focuspair_client=warn".into()),
        )
        .init();

    let args = Args::parse();
    let mut config = focuspair_config::load_config(args.config.as_deref())?;
    if let Some(url) = args.url {
        config.client.server_url = url;
    }

    let presenter = TerminalPresenter::new(std::io::stdout());
    let app = App::new(&config, presenter);
    app.run(BufReader::new(tokio::io::stdin()), args.start.map(Command::from))
        .await?;
    Ok(())
}
