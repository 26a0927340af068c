//! Live event source for a single directory
//!
//! Watches one directory (non-recursive) and yields one [`WatchEvent`] per
//! path per raw notification. Iteration blocks until the next event. Linux
//! reads inotify directly; other platforms go through `notify`.

use crate::error::{Result, WatchError};
use crate::event::WatchEvent;
use crossbeam_channel::{Receiver, RecvTimeoutError};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "linux")]
pub use linux::tags_for;
#[cfg(target_os = "linux")]
use linux::{spawn, Backend};

#[cfg(not(target_os = "linux"))]
mod portable;
#[cfg(not(target_os = "linux"))]
pub use portable::tag_for;
#[cfg(not(target_os = "linux"))]
use portable::{spawn, Backend};

/// Blocking stream of events for one directory
pub struct NotifySource {
    /// Canonical watched directory
    root: PathBuf,

    /// Per-path events and source failures from the backend
    rx: Receiver<Result<WatchEvent>>,

    /// Keeps the OS watch alive; `None` when fed from a bare channel
    _backend: Option<Backend>,
}

impl NotifySource {
    /// Start watching `dir`
    pub fn watch(dir: &Path) -> Result<Self> {
        let root = dir.canonicalize()?;
        if !root.is_dir() {
            return Err(WatchError::NotADirectory(root));
        }

        let (tx, rx) = crossbeam_channel::unbounded();
        let backend = spawn(&root, tx)?;

        debug!("Watching {}", root.display());

        Ok(Self {
            root,
            rx,
            _backend: Some(backend),
        })
    }

    #[cfg(test)]
    fn from_channel(root: impl Into<PathBuf>, rx: Receiver<Result<WatchEvent>>) -> Self {
        Self {
            root: root.into(),
            rx,
            _backend: None,
        }
    }

    /// Directory being watched
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Wait at most `timeout` for the next event
    ///
    /// Returns `None` if nothing arrived in time.
    pub fn recv_timeout(&mut self, timeout: Duration) -> Option<Result<WatchEvent>> {
        match self.rx.recv_timeout(timeout) {
            Ok(event) => Some(event),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => Some(Err(WatchError::Disconnected)),
        }
    }
}

impl Iterator for NotifySource {
    type Item = Result<WatchEvent>;

    /// Never ends: a dead backend shows up as [`WatchError::Disconnected`]
    fn next(&mut self) -> Option<Self::Item> {
        Some(self.rx.recv().unwrap_or(Err(WatchError::Disconnected)))
    }
}
