use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use eyre::Result;
use log::info;

mod cli;

use cli::Cli;
use ytkit::config::Config;
use ytkit::llm::ChatClient;
use ytkit::server::{self, AppState};
use ytkit::youtube::YouTubeClient;

fn setup_logging(verbose: bool) -> Result<PathBuf> {
    let log_dir = log_dir();
    std::fs::create_dir_all(&log_dir)?;
    let log_file = log_dir.join("ytkit.log");

    let target = Box::new(std::fs::OpenOptions::new().create(true).append(true).open(&log_file)?);

    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized: {}", log_file.display());
    Ok(log_file)
}

fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ytkit")
        .join("logs")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_file = setup_logging(cli.verbose)?;

    let settings = Config::load(cli.config.as_deref())?.resolve(cli.host, cli.port);
    info!("Settings: {settings:?}");

    let client = reqwest::Client::new();
    let videos = Arc::new(YouTubeClient::new(client.clone(), settings.lang.clone()));
    let llm = Arc::new(ChatClient::new(
        client,
        settings.completion_url.clone(),
        settings.api_key_env.clone(),
    ));

    eprintln!(
        "ytkit listening on http://{}:{} (logs: {})",
        settings.host,
        settings.port,
        log_file.display()
    );

    server::serve(AppState::new(videos, llm, settings)).await
}
