//! File write-completion watching for autoscan
//!
//! This crate turns raw file system notifications into one "ready" signal
//! per completed write:
//! - Event model with a closed set of tags
//! - Admission filter (extension + exclude patterns)
//! - Per-path lifecycle tracker
//! - Live source for a single directory (inotify on Linux, `notify` elsewhere)

pub mod error;
pub mod event;
pub mod filter;
pub mod source;
pub mod tracker;

pub use error::{Result, WatchError};
pub use event::{EventKinds, EventTag, WatchEvent};
pub use filter::{ExtensionFilter, FilterConfig, PathFilter};
pub use source::NotifySource;
pub use tracker::{CompletionHandler, LifecycleState, PathTracker, TrackerStats};

use tracing::debug;

/// Feed every event through `tracker` until the source ends or fails
///
/// The first source error stops the loop and is returned. Handler errors
/// never reach this level.
pub fn run<I, F, H>(events: I, tracker: &mut PathTracker<F, H>) -> Result<()>
where
    I: IntoIterator<Item = Result<WatchEvent>>,
    F: PathFilter,
    H: CompletionHandler,
{
    for event in events {
        let event = event?;
        tracker.handle_event(&event);
    }

    debug!("Event source ended with {} path(s) still tracked", tracker.tracked_count());
    Ok(())
}
