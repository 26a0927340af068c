//! inotify backend
//!
//! Registers the full open/modify/close mask on the watched directory and
//! reads it on a dedicated thread. `notify`'s inotify watcher leaves out
//! `IN_OPEN` and `IN_CLOSE_NOWRITE`, which the tracker needs to admit files
//! that already existed before their write began.

use crate::error::{Result, WatchError};
use crate::event::{EventKinds, EventTag, WatchEvent};
use crossbeam_channel::Sender;
use inotify::{EventMask, Inotify, WatchMask};
use std::path::{Path, PathBuf};
use std::thread;
use tracing::{debug, warn};

const WATCH_MASK: WatchMask = WatchMask::CREATE
    .union(WatchMask::OPEN)
    .union(WatchMask::MODIFY)
    .union(WatchMask::CLOSE_WRITE)
    .union(WatchMask::CLOSE_NOWRITE)
    .union(WatchMask::DELETE_SELF)
    .union(WatchMask::MOVE_SELF)
    .union(WatchMask::ONLYDIR);

/// Masks meaning the watched directory itself is gone
const TARGET_GONE: EventMask = EventMask::DELETE_SELF
    .union(EventMask::MOVE_SELF)
    .union(EventMask::IGNORED);

/// Map one inotify mask onto the tracker's tag vocabulary
///
/// Bits with no tag of their own are dropped, so the result may be empty.
pub fn tags_for(mask: EventMask) -> EventKinds {
    let mut kinds = EventKinds::new();
    for (bit, tag) in [
        (EventMask::CREATE, EventTag::Create),
        (EventMask::OPEN, EventTag::Open),
        (EventMask::MODIFY, EventTag::Modify),
        (EventMask::CLOSE_WRITE, EventTag::CloseWrite),
        (EventMask::CLOSE_NOWRITE, EventTag::CloseNoWrite),
    ] {
        if mask.contains(bit) {
            kinds.insert(tag);
        }
    }
    kinds
}

/// Reader thread handle; the thread owns the inotify descriptor
pub(super) struct Backend {
    _reader: thread::JoinHandle<()>,
}

pub(super) fn spawn(root: &Path, tx: Sender<Result<WatchEvent>>) -> Result<Backend> {
    let mut inotify = Inotify::init()?;
    inotify.add_watch(root, WATCH_MASK)?;

    let root = root.to_path_buf();
    let reader = thread::Builder::new()
        .name("autoscan-inotify".to_string())
        .spawn(move || read_loop(inotify, root, tx))?;

    Ok(Backend { _reader: reader })
}

/// Read until the directory disappears, reading fails or the source is dropped
fn read_loop(mut inotify: Inotify, root: PathBuf, tx: Sender<Result<WatchEvent>>) {
    let mut buffer = [0u8; 4096];

    loop {
        let events = match inotify.read_events_blocking(&mut buffer) {
            Ok(events) => events,
            Err(e) => {
                let _ = tx.send(Err(e.into()));
                return;
            }
        };

        for event in events {
            if event.mask.contains(EventMask::Q_OVERFLOW) {
                warn!("Event queue overflowed, some file events may have been lost");
                continue;
            }

            if event.mask.intersects(TARGET_GONE) {
                let _ = tx.send(Err(WatchError::TargetRemoved(root.clone())));
                return;
            }

            // Subdirectories and the directory's own open/close are not files
            if event.mask.contains(EventMask::ISDIR) {
                continue;
            }
            let Some(name) = event.name else {
                continue;
            };

            let kinds = tags_for(event.mask);
            if kinds.is_empty() {
                continue;
            }

            if tx.send(Ok(WatchEvent::new(kinds, root.join(name)))).is_err() {
                debug!("Source dropped, stopping inotify reader for {}", root.display());
                return;
            }
        }
    }
}
