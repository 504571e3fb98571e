//! clipsync-client - Syncs the local clipboard with the relay server

use std::path::PathBuf;
use std::process;

use clap::Parser;
use tokio_util::sync::CancellationToken;

use clipsync_lib::config::Settings;

#[derive(Parser, Debug)]
#[command(name = "clipsync-client", version, about = "Clipboard relay client")]
struct Args {
    /// Relay endpoint (default ws://localhost:8080/ws)
    #[arg(long)]
    server: Option<String>,

    /// Clipboard polling interval in milliseconds (default 1000)
    #[arg(long)]
    interval_ms: Option<u64>,

    /// JSON settings file
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    clipsync_lib::init_logging();
    let args = Args::parse();

    let mut settings = match Settings::load(args.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            log::error!("{}", e);
            process::exit(2);
        }
    };
    if let Some(server) = args.server {
        settings.client.server_url = server;
    }
    if let Some(interval_ms) = args.interval_ms {
        settings.client.poll_interval_ms = interval_ms;
    }
    if let Err(e) = settings.client.validate() {
        log::error!("{}", e);
        process::exit(2);
    }

    let shutdown = CancellationToken::new();
    let on_signal = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::info!("Interrupted, closing relay connection");
            on_signal.cancel();
        }
    });

    if let Err(e) = clipsync_lib::run_client(&settings.client, shutdown).await {
        log::error!("{}", e);
        process::exit(1);
    }
}
