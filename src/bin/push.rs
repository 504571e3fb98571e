//! clipsync-push - One-shot write (or read) against the HTTP surface

use std::path::PathBuf;
use std::process;

use clap::Parser;

use clipsync_lib::client::HttpClient;
use clipsync_lib::clipboard::ClipboardValue;
use clipsync_lib::config::Settings;

#[derive(Parser, Debug)]
#[command(name = "clipsync-push", version, about = "Push a value to the clipboard relay server")]
struct Args {
    /// Server base URL (default http://localhost:8080)
    #[arg(long)]
    base_url: Option<String>,

    /// JSON settings file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Read the current value instead of writing
    #[arg(long)]
    read: bool,

    /// Content to write
    #[arg(default_value = "value")]
    content: String,
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
    if let Some(base_url) = args.base_url {
        settings.http.base_url = base_url;
    }
    if let Err(e) = settings.http.validate() {
        log::error!("{}", e);
        process::exit(2);
    }

    let client = HttpClient::new(settings.http.base_url);

    if args.read {
        match client.read().await {
            Ok(value) => log::info!("content: {:?}", value.as_str()),
            Err(e) => {
                log::error!("{}", e);
                process::exit(1);
            }
        }
        return;
    }

    match client.write(&ClipboardValue::from(args.content)).await {
        Ok(response) => {
            log::info!("response Status: {}", response.status);
            log::info!("response Headers: {:?}", response.headers);
            log::info!("response Body: {}", response.body);
            if !response.is_success() {
                process::exit(1);
            }
        }
        Err(e) => {
            log::error!("{}", e);
            process::exit(1);
        }
    }
}
