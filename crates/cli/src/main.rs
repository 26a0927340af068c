//! Autoscan CLI - autoscan command

use anyhow::Result;
use clap::Parser;
use cli_lib::config::{self, Overrides};
use cli_lib::daemon::{self, WatchTarget};
use cli_lib::logging;
use std::path::PathBuf;

/// Autoscan - OCR every JPEG dropped into a folder
#[derive(Parser)]
#[command(name = "autoscan")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Folder to watch for new images
    inbox: PathBuf,

    /// Folder for processed images (default: current directory)
    outbox: Option<PathBuf>,

    /// Config file (default: <config dir>/autoscan/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Accepted file extension, repeatable (default: jpg, jpeg)
    #[arg(short = 'e', long = "extension")]
    extensions: Vec<String>,

    /// OCR executable (default: tesseract)
    #[arg(long)]
    ocr_command: Option<String>,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let _log_guard = logging::init(cli.log_file.as_deref())?;

    let mut config = config::load(cli.config.as_deref())?;
    config.apply(Overrides {
        extensions: cli.extensions,
        ocr_command: cli.ocr_command,
    })?;

    let target = WatchTarget::resolve(cli.inbox, cli.outbox)?;
    daemon::run(target, config).await
}
