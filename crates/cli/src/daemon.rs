//! Watch loop lifecycle
//!
//! The loop itself is blocking and runs on its own thread; the async side
//! only waits for it to fail or for Ctrl-C.

use crate::config::Config;
use crate::processor::OcrProcessor;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};
use std::thread;
use tokio::sync::oneshot;
use tracing::{error, info};
use watcher::{ExtensionFilter, NotifySource, PathTracker};

/// Resolved directories for one run
#[derive(Debug, Clone)]
pub struct WatchTarget {
    /// Directory watched for new images
    pub inbox: PathBuf,
    /// Directory receiving PDFs and processed images
    pub outbox: PathBuf,
}

impl WatchTarget {
    /// Resolve the outbox (current directory if omitted) and check both exist
    pub fn resolve(inbox: PathBuf, outbox: Option<PathBuf>) -> Result<Self> {
        let outbox = match outbox {
            Some(outbox) => outbox,
            None => std::env::current_dir().context("Failed to get current directory")?,
        };

        ensure_dir(&inbox, "Inbox")?;
        ensure_dir(&outbox, "Outbox")?;

        Ok(Self { inbox, outbox })
    }
}

fn ensure_dir(path: &Path, what: &str) -> Result<()> {
    if !path.is_dir() {
        anyhow::bail!("{} is not a directory: {}", what, path.display());
    }
    Ok(())
}

/// Run until the event source fails or the process is interrupted
pub async fn run(target: WatchTarget, config: Config) -> Result<()> {
    println!(
        "Watching {} for files; sending results to {}",
        target.inbox.display().cyan(),
        target.outbox.display().cyan()
    );

    let (done_tx, done_rx) = oneshot::channel();
    thread::Builder::new()
        .name("autoscan-watch".to_string())
        .spawn(move || {
            let _ = done_tx.send(watch_blocking(&target, &config));
        })
        .context("Failed to spawn watch thread")?;

    tokio::select! {
        result = done_rx => {
            let result = result.context("Watch thread exited unexpectedly")?;
            if let Err(ref e) = result {
                error!("Watching stopped: {:#}", e);
            }
            result
        }
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for Ctrl-C")?;
            info!("Interrupted, shutting down");
            Ok(())
        }
    }
}

/// Blocking watch loop: notify source -> tracker -> OCR processor
pub fn watch_blocking(target: &WatchTarget, config: &Config) -> Result<()> {
    let source = NotifySource::watch(&target.inbox)
        .with_context(|| format!("Failed to watch {}", target.inbox.display()))?;
    let filter = ExtensionFilter::new(source.root(), &config.watch)?;

    info!(
        "Tracking *.{{{}}} in {}",
        filter.extensions().join(","),
        source.root().display()
    );

    let processor = OcrProcessor::new(&target.outbox, config.ocr.clone());
    let mut tracker = PathTracker::new(filter, processor);

    let result = watcher::run(source, &mut tracker);

    let stats = tracker.stats();
    info!(
        "Processed {} file(s), {} failed, {} closed unwritten",
        stats.fired, stats.callback_failures, stats.dropped_unwritten
    );

    result.context("File watching failed")
}
