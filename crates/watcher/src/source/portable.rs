//! `notify` backend for platforms without inotify

use crate::error::{Result, WatchError};
use crate::event::{EventKinds, EventTag, WatchEvent};
use crossbeam_channel::Sender;
use notify::event::{AccessKind, AccessMode, ModifyKind};
use notify::{Config, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::Path;
use tracing::warn;

/// Map a notify event kind onto the tracker's tag vocabulary
pub fn tag_for(kind: &EventKind) -> EventTag {
    match kind {
        EventKind::Create(_) => EventTag::Create,
        EventKind::Access(AccessKind::Open(_)) => EventTag::Open,
        EventKind::Access(AccessKind::Close(AccessMode::Write)) => EventTag::CloseWrite,
        EventKind::Access(AccessKind::Close(_)) => EventTag::CloseNoWrite,
        EventKind::Modify(ModifyKind::Data(_) | ModifyKind::Any | ModifyKind::Other) => {
            EventTag::Modify
        }
        _ => EventTag::Other,
    }
}

/// Keeps the OS watch registered for as long as the source lives
pub(super) struct Backend {
    _watcher: RecommendedWatcher,
}

pub(super) fn spawn(root: &Path, tx: Sender<Result<WatchEvent>>) -> Result<Backend> {
    let watched = root.to_path_buf();
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<notify::Event>| {
            // Send failures mean the source was dropped
            for event in split(&watched, res) {
                let _ = tx.send(event);
            }
        },
        Config::default(),
    )?;
    watcher.watch(root, RecursiveMode::NonRecursive)?;

    Ok(Backend { _watcher: watcher })
}

/// One event per path named by a raw notification
fn split(root: &Path, raw: notify::Result<notify::Event>) -> Vec<Result<WatchEvent>> {
    let event = match raw {
        Ok(event) => event,
        Err(e) => return vec![Err(e.into())],
    };

    if event.need_rescan() {
        warn!("Event queue overflowed, some file events may have been lost");
    }

    if matches!(event.kind, EventKind::Remove(_)) && event.paths.iter().any(|p| p == root) {
        return vec![Err(WatchError::TargetRemoved(root.to_path_buf()))];
    }

    let tag = tag_for(&event.kind);
    event
        .paths
        .into_iter()
        .map(|path| Ok(WatchEvent::new(EventKinds::from([tag]), path)))
        .collect()
}
