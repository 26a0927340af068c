//! Event model shared by every event source
//!
//! A raw notification is an unordered set of [`EventTag`]s plus the path it
//! applies to. Sources may repeat tags or deliver several at once; the
//! tracker decides what they mean.

use smallvec::SmallVec;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// What happened to a path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventTag {
    /// File created in the watched directory
    Create,
    /// File opened
    Open,
    /// File contents written
    Modify,
    /// File closed after being opened for writing
    CloseWrite,
    /// File closed after being opened read-only
    CloseNoWrite,
    /// Anything the tracker does not care about
    Other,
}

impl EventTag {
    pub fn as_str(self) -> &'static str {
        match self {
            EventTag::Create => "create",
            EventTag::Open => "open",
            EventTag::Modify => "modify",
            EventTag::CloseWrite => "close-write",
            EventTag::CloseNoWrite => "close-no-write",
            EventTag::Other => "other",
        }
    }

    pub fn is_close(self) -> bool {
        matches!(self, EventTag::CloseWrite | EventTag::CloseNoWrite)
    }
}

impl fmt::Display for EventTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventTag {
    type Err = std::convert::Infallible;

    /// Accepts the short names and the inotify `IN_*` names.
    /// Unrecognized strings map to [`EventTag::Other`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = match s {
            "create" | "IN_CREATE" => EventTag::Create,
            "open" | "IN_OPEN" => EventTag::Open,
            "modify" | "IN_MODIFY" => EventTag::Modify,
            "close-write" | "IN_CLOSE_WRITE" => EventTag::CloseWrite,
            "close-no-write" | "IN_CLOSE_NOWRITE" => EventTag::CloseNoWrite,
            _ => EventTag::Other,
        };
        Ok(tag)
    }
}

/// Unordered set of tags carried by one notification
#[derive(Debug, Clone, Default)]
pub struct EventKinds {
    tags: SmallVec<[EventTag; 4]>,
}

// `insert` keeps tags unique, so equal length plus containment is set equality
impl PartialEq for EventKinds {
    fn eq(&self, other: &Self) -> bool {
        self.tags.len() == other.tags.len() && self.iter().all(|tag| other.contains(tag))
    }
}

impl Eq for EventKinds {}

impl EventKinds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tag; duplicates are collapsed
    pub fn insert(&mut self, tag: EventTag) {
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
    }

    pub fn contains(&self, tag: EventTag) -> bool {
        self.tags.contains(&tag)
    }

    /// True if any of `tags` is present
    pub fn intersects(&self, tags: &[EventTag]) -> bool {
        tags.iter().any(|tag| self.contains(*tag))
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = EventTag> + '_ {
        self.tags.iter().copied()
    }

    /// Parse a set of string tags, as delivered by tag-based sources
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .map(|name| name.as_ref().parse().unwrap_or(EventTag::Other))
            .collect()
    }
}

impl FromIterator<EventTag> for EventKinds {
    fn from_iter<T: IntoIterator<Item = EventTag>>(iter: T) -> Self {
        let mut kinds = EventKinds::new();
        for tag in iter {
            kinds.insert(tag);
        }
        kinds
    }
}

impl<const N: usize> From<[EventTag; N]> for EventKinds {
    fn from(tags: [EventTag; N]) -> Self {
        tags.into_iter().collect()
    }
}

impl fmt::Display for EventKinds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, tag) in self.tags.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", tag)?;
        }
        f.write_str("}")
    }
}

/// File system event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchEvent {
    /// Tags reported for this notification
    pub kinds: EventKinds,
    /// Absolute path the notification applies to
    pub path: PathBuf,
}

impl WatchEvent {
    pub fn new(kinds: impl Into<EventKinds>, path: impl Into<PathBuf>) -> Self {
        Self {
            kinds: kinds.into(),
            path: path.into(),
        }
    }
}
