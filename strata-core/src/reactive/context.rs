//! Tracking Frames
//!
//! A tracking frame records which tags were read during one evaluation.
//! This enables automatic dependency tracking: when a signal is read, its
//! tag lands in the innermost active frame.
//!
//! # Implementation
//!
//! We use a thread-local stack of frames. Beginning an evaluation pushes a
//! frame; finishing it pops the frame and returns a [`DependencySummary`].
//! The stack supports nesting (a derived value that reads another derived
//! value): the inner cache merges its summary into the outer frame, so reads
//! inside a nested evaluation count as dependencies of the outer one too.

use std::cell::RefCell;

use indexmap::IndexMap;
use smallvec::SmallVec;

use super::tag::{self, Revision, Tag, TagId};

thread_local! {
    static FRAME_STACK: RefCell<Vec<Frame>> = const { RefCell::new(Vec::new()) };
}

/// An entry in the frame stack.
#[derive(Debug)]
struct Frame {
    /// Global revision when the frame began.
    snapshot: Revision,
    /// Tags read so far, deduplicated in first-read order.
    reads: IndexMap<TagId, Tag>,
}

/// What an evaluation read, and as of when.
#[derive(Debug, Clone)]
pub struct DependencySummary {
    snapshot: Revision,
    tags: SmallVec<[Tag; 4]>,
}

impl DependencySummary {
    /// True when the evaluation read no mutable value.
    pub fn is_const(&self) -> bool {
        self.tags.is_empty()
    }

    /// True when none of the recorded tags changed since the snapshot.
    pub fn is_valid(&self) -> bool {
        self.tags.iter().all(|tag| tag.validate(self.snapshot))
    }

    /// Revision at which the evaluation began.
    pub fn snapshot(&self) -> Revision {
        self.snapshot
    }

    /// Number of distinct tags read.
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

/// Guard for an active tracking frame.
///
/// Dropping the guard without calling [`TrackingFrame::finish`] discards the
/// frame, which keeps the stack balanced when a callback panics.
#[derive(Debug)]
pub struct TrackingFrame {
    depth: usize,
    finished: bool,
}

impl TrackingFrame {
    /// Begin a new frame on top of the stack.
    pub fn begin() -> Self {
        let depth = FRAME_STACK.with(|stack| {
            let mut stack = stack.borrow_mut();
            stack.push(Frame {
                snapshot: tag::current(),
                reads: IndexMap::new(),
            });
            stack.len()
        });

        Self {
            depth,
            finished: false,
        }
    }

    /// Pop the frame and summarize what it read.
    pub fn finish(mut self) -> DependencySummary {
        self.finished = true;
        let frame = self.pop();
        DependencySummary {
            snapshot: frame.snapshot,
            tags: frame.reads.into_values().collect(),
        }
    }

    /// Check if there is an active frame.
    pub fn is_active() -> bool {
        FRAME_STACK.with(|stack| !stack.borrow().is_empty())
    }

    /// Record a read of `tag` in the innermost frame, if any.
    pub fn track(tag: &Tag) {
        FRAME_STACK.with(|stack| {
            if let Some(frame) = stack.borrow_mut().last_mut() {
                frame.reads.entry(tag.id()).or_insert_with(|| tag.clone());
            }
        });
    }

    /// Merge a finished evaluation's reads into the innermost frame.
    pub fn track_summary(summary: &DependencySummary) {
        if summary.is_const() {
            return;
        }
        FRAME_STACK.with(|stack| {
            if let Some(frame) = stack.borrow_mut().last_mut() {
                for tag in &summary.tags {
                    frame.reads.entry(tag.id()).or_insert_with(|| tag.clone());
                }
            }
        });
    }

    fn pop(&self) -> Frame {
        FRAME_STACK.with(|stack| {
            let mut stack = stack.borrow_mut();
            debug_assert_eq!(
                stack.len(),
                self.depth,
                "TrackingFrame mismatch: expected depth {}, got {}",
                self.depth,
                stack.len()
            );
            stack.pop()
        })
        .unwrap_or(Frame {
            snapshot: tag::current(),
            reads: IndexMap::new(),
        })
    }
}

impl Drop for TrackingFrame {
    fn drop(&mut self) {
        if !self.finished {
            self.pop();
        }
    }
}

/// Run `f` without registering any reads in the enclosing frame.
pub fn untracked<T>(f: impl FnOnce() -> T) -> T {
    let _frame = TrackingFrame::begin();
    f()
}
