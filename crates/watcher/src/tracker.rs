//! Per-path write lifecycle tracking
//!
//! Turns the noisy create/open/modify/close stream into a single
//! "file fully written" signal per write cycle:
//!
//! ```text
//! Untracked --create|open (filter accepts)--> Created
//! Created   --modify-->                       Modified
//! Modified  --close-->                        Untracked, handler fires
//! Created   --close-->                        Untracked, nothing fires
//! ```
//!
//! The three checks run in that order for every event, so one event carrying
//! several tags can move a path through more than one transition.

use crate::event::{EventKinds, EventTag};
use crate::filter::PathFilter;
use ahash::AHashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

const ADMIT_TAGS: &[EventTag] = &[EventTag::Create, EventTag::Open];

/// Action invoked once a tracked path has been fully written
///
/// Errors are logged by the tracker and otherwise ignored.
pub trait CompletionHandler {
    fn on_ready(&mut self, path: &Path) -> anyhow::Result<()>;
}

impl<F> CompletionHandler for F
where
    F: FnMut(&Path) -> anyhow::Result<()>,
{
    fn on_ready(&mut self, path: &Path) -> anyhow::Result<()> {
        self(path)
    }
}

/// Lifecycle of a tracked path
///
/// There is no closed state: a close always removes the path from tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Created or opened, no write observed yet
    Created,
    /// At least one write observed since creation
    Modified,
}

/// Counters for the lifetime of a tracker
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrackerStats {
    /// Completed write cycles handed to the handler
    pub fired: u64,
    /// Paths closed before any write was observed
    pub dropped_unwritten: u64,
    /// Handler invocations that returned an error
    pub callback_failures: u64,
}

/// Per-path state machine
pub struct PathTracker<F, H> {
    /// Paths currently in a write cycle
    files: AHashMap<PathBuf, LifecycleState>,

    /// Admission gate for create/open events
    filter: F,

    /// Invoked with each fully written path
    handler: H,

    stats: TrackerStats,
}

impl<F, H> PathTracker<F, H>
where
    F: PathFilter,
    H: CompletionHandler,
{
    pub fn new(filter: F, handler: H) -> Self {
        Self {
            files: AHashMap::new(),
            filter,
            handler,
            stats: TrackerStats::default(),
        }
    }

    /// Apply one event to the state of `path`
    ///
    /// Never fails. Tags irrelevant to the current state are ignored.
    pub fn handle(&mut self, kinds: &EventKinds, path: &Path) {
        if kinds.intersects(ADMIT_TAGS)
            && !self.files.contains_key(path)
            && self.filter.accepts(path)
        {
            debug!("Tracking {} ({})", path.display(), kinds);
            self.files.insert(path.to_path_buf(), LifecycleState::Created);
        }

        if kinds.contains(EventTag::Modify) {
            if let Some(state) = self.files.get_mut(path) {
                if *state == LifecycleState::Created {
                    debug!("Write observed for {}", path.display());
                    *state = LifecycleState::Modified;
                }
            }
        }

        if kinds.iter().any(EventTag::is_close) {
            // Removed before the handler runs, whatever the handler does
            match self.files.remove(path) {
                Some(LifecycleState::Modified) => self.fire(path),
                Some(LifecycleState::Created) => {
                    self.stats.dropped_unwritten += 1;
                    debug!("Closed without writes, dropping {}", path.display());
                }
                None => {}
            }
        }
    }

    /// Convenience for sources that yield owned events
    pub fn handle_event(&mut self, event: &crate::WatchEvent) {
        self.handle(&event.kinds, &event.path);
    }

    fn fire(&mut self, path: &Path) {
        self.stats.fired += 1;
        info!("File ready: {}", path.display());

        if let Err(e) = self.handler.on_ready(path) {
            self.stats.callback_failures += 1;
            error!("Failed to process {}: {:#}", path.display(), e);
        }
    }

    /// Current state of `path`, `None` if untracked
    pub fn state(&self, path: &Path) -> Option<LifecycleState> {
        self.files.get(path).copied()
    }

    pub fn is_tracked(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    /// Number of paths in an unfinished write cycle
    pub fn tracked_count(&self) -> usize {
        self.files.len()
    }

    pub fn stats(&self) -> TrackerStats {
        self.stats
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }
}
