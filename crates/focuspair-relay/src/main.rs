//! focuspair-relay: WebSocket pairing relay plus the static browser client.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;

use focuspair_relay::{net, router, serve, RoomStore};

#[derive(Parser)]
#[command(name = "focuspair-relay", about = "Pairing relay for two-person focus sessions")]
struct Args {
    /// Path to a TOML config file (default: ./focuspair.toml if present).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on. Overrides the config file and PORT.
    #[arg(short, long)]
    port: Option<u16>,

    /// Directory holding the browser client.
    #[arg(long)]
    public_dir: Option<PathBuf>,

    /// Directory served under /assets.
    #[arg(long)]
    assets_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "focuspair_relay=info".into()),
        )
        .init();

    let args = Args::parse();
    let mut config = focuspair_config::load_config(args.config.as_deref())?;
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(dir) = args.public_dir {
        config.server.public_dir = dir;
    }
    if let Some(dir) = args.assets_dir {
        config.server.assets_dir = dir;
    }

    let addr = config.server.listen_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    let port = listener.local_addr()?.port();

    tracing::info!("focuspair-relay listening on {}", addr);
    match net::lan_address() {
        Some(ip) => tracing::info!(
            "To connect with your phone, visit: {}",
            net::access_url(ip, port)
        ),
        None => tracing::info!("No LAN address found, use http://localhost:{port}"),
    }

    let store = RoomStore::new();
    serve(listener, router(store, &config)).await
}
