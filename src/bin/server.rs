//! clipsync-server - HTTP read/write surface and relay endpoint

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process;

use clap::Parser;

use clipsync_lib::config::Settings;

#[derive(Parser, Debug)]
#[command(name = "clipsync-server", version, about = "Clipboard relay server")]
struct Args {
    /// Listen address (default 0.0.0.0:8080)
    #[arg(long)]
    listen: Option<SocketAddr>,

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
    if let Some(listen) = args.listen {
        settings.server.listen_addr = listen;
    }

    log::info!("clipsync-server starting on {}", settings.server.listen_addr);

    if let Err(e) = clipsync_lib::run_server(&settings.server).await {
        log::error!("server: {}", e);
        process::exit(1);
    }
}
