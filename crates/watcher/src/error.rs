//! Error types for the watcher crate

use std::path::PathBuf;
use thiserror::Error;

/// Failures of the event source or of watch setup
///
/// Tracker transitions never fail; everything here is fatal to the watch loop.
#[derive(Debug, Error)]
pub enum WatchError {
    #[error("watch target is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[cfg(not(target_os = "linux"))]
    #[error("file system notification error: {0}")]
    Notify(#[from] notify::Error),

    #[error("watch target was removed: {}", .0.display())]
    TargetRemoved(PathBuf),

    #[error("event source disconnected")]
    Disconnected,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid exclude pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: ignore::Error,
    },
}

pub type Result<T> = std::result::Result<T, WatchError>;
