use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "ytkit",
    about = "YouTube transcript, summary, SEO and thumbnail service",
    version
)]
pub struct Cli {
    /// Address to bind (overrides config)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (overrides config)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Config file (default: ~/.config/ytkit/config.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,
}
