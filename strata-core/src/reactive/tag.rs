//! Revision tags.
//!
//! Every mutable reactive value owns a [`Tag`]. A tag remembers the global
//! revision at which its owner last changed. A computation takes a snapshot
//! of the global revision when it starts; it is stale as soon as any tag it
//! read carries a revision newer than that snapshot.
//!
//! Constants own no tag at all, which is how a computation proves itself
//! permanently constant: it finished without reading a single tag.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

/// A point on the global revision timeline.
pub type Revision = u64;

/// The revision every thread starts at.
pub const INITIAL: Revision = 1;

thread_local! {
    static REVISION: Cell<Revision> = const { Cell::new(INITIAL) };
}

/// The current global revision.
pub fn current() -> Revision {
    REVISION.with(Cell::get)
}

/// Advance the global revision and return the new value.
fn bump() -> Revision {
    REVISION.with(|revision| {
        let next = revision.get() + 1;
        revision.set(next);
        next
    })
}

/// Unique identifier for a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TagId(u64);

impl TagId {
    /// Generate a new unique tag ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for TagId {
    fn default() -> Self {
        Self::new()
    }
}

struct TagInner {
    id: TagId,
    revision: Cell<Revision>,
}

/// A dirtiable marker shared between a mutable value and every
/// computation that read it.
///
/// Cloning a tag yields another handle to the same marker.
#[derive(Clone)]
pub struct Tag {
    inner: Rc<TagInner>,
}

impl Tag {
    /// Create a tag that is valid as of the current revision.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(TagInner {
                id: TagId::new(),
                revision: Cell::new(current()),
            }),
        }
    }

    /// Get the tag's unique ID.
    pub fn id(&self) -> TagId {
        self.inner.id
    }

    /// The revision at which the owner last changed.
    pub fn revision(&self) -> Revision {
        self.inner.revision.get()
    }

    /// Record a change to the owner.
    pub fn dirty(&self) {
        self.inner.revision.set(bump());
    }

    /// Whether nothing changed since `snapshot`.
    pub fn validate(&self, snapshot: Revision) -> bool {
        self.revision() <= snapshot
    }
}

impl Default for Tag {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tag")
            .field("id", &self.inner.id)
            .field("revision", &self.revision())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_ids_are_unique() {
        let id1 = TagId::new();
        let id2 = TagId::new();
        let id3 = TagId::new();

        assert_ne!(id1, id2);
        assert_ne!(id2, id3);
        assert_ne!(id1, id3);
    }

    #[test]
    fn fresh_tag_is_valid_at_current_revision() {
        let tag = Tag::new();
        assert!(tag.validate(current()));
    }

    #[test]
    fn dirty_invalidates_older_snapshots() {
        let tag = Tag::new();
        let snapshot = current();

        tag.dirty();

        assert!(!tag.validate(snapshot));
        assert!(tag.validate(current()));
        assert!(current() > snapshot);
    }

    #[test]
    fn clones_share_revision() {
        let tag = Tag::new();
        let other = tag.clone();
        let snapshot = current();

        other.dirty();

        assert_eq!(tag.id(), other.id());
        assert!(!tag.validate(snapshot));
    }
}
