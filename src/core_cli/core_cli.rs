use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "rouilleftpc", about = "An interactive FTP client written in Rust.")]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Server to connect to on startup (host, host:port or ftp:// URL)
    #[arg(short, long)]
    pub server: Option<String>,

    /// User to log in with after connecting
    #[arg(short, long, requires = "server")]
    pub user: Option<String>,

    /// Password for --user
    #[arg(short, long, requires = "user")]
    pub password: Option<String>,

    /// Enable verbose mode
    #[arg(short, long)]
    pub verbose: bool,
}
