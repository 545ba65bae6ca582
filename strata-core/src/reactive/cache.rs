//! Tracked Cache
//!
//! A `TrackedCache` memoizes a zero-argument callback together with the
//! summary of every tag the callback read.
//!
//! # How the Cache Works
//!
//! 1. Nothing runs on construction.
//!
//! 2. The first [`TrackedCache::get_value`] evaluates the callback inside a
//!    fresh tracking frame and stores the value plus the frame summary.
//!
//! 3. Later reads check the summary against the recorded tags. If nothing
//!    changed, the stored value is returned without running the callback.
//!
//! 4. If a tag changed, the callback re-runs in a new frame.
//!
//! Every read, cached or not, merges the summary into the enclosing frame,
//! so a cache read from inside another cache's callback makes the outer
//! cache depend on everything the inner one read.
//!
//! A cache whose last evaluation read no tags is constant for good: there
//! is nothing that could ever invalidate it, so it is never re-evaluated.

use std::cell::RefCell;
use std::fmt::Debug;

use super::context::{DependencySummary, TrackingFrame};

/// Observable state of a cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    /// Never evaluated, or the last evaluation panicked.
    Unevaluated,

    /// The stored value is up-to-date.
    Fresh,

    /// A recorded dependency changed; the next read re-evaluates.
    Stale,
}

struct Evaluation<T> {
    value: T,
    summary: DependencySummary,
}

/// A memoized computation that knows what it read.
pub struct TrackedCache<T> {
    compute: Box<dyn Fn() -> T>,
    state: RefCell<Option<Evaluation<T>>>,
}

impl<T: Clone> TrackedCache<T> {
    /// Create a cache around `compute`. The callback is not run yet.
    pub fn new<F>(compute: F) -> Self
    where
        F: Fn() -> T + 'static,
    {
        Self {
            compute: Box::new(compute),
            state: RefCell::new(None),
        }
    }

    /// Get the latest value, re-evaluating only if a dependency changed.
    pub fn get_value(&self) -> T {
        {
            let state = self.state.borrow();
            if let Some(evaluation) = state.as_ref().filter(|e| e.summary.is_valid()) {
                TrackingFrame::track_summary(&evaluation.summary);
                return evaluation.value.clone();
            }
        }

        self.evaluate()
    }

    /// True once an evaluation completed without reading any mutable value.
    pub fn is_const(&self) -> bool {
        self.state
            .borrow()
            .as_ref()
            .is_some_and(|e| e.summary.is_const())
    }

    /// Check if the cache holds a successfully computed value.
    pub fn has_value(&self) -> bool {
        self.state.borrow().is_some()
    }

    /// Get the current status without evaluating anything.
    pub fn status(&self) -> CacheStatus {
        match self.state.borrow().as_ref() {
            None => CacheStatus::Unevaluated,
            Some(e) if e.summary.is_valid() => CacheStatus::Fresh,
            Some(_) => CacheStatus::Stale,
        }
    }

    /// Run the callback in a new frame and store the result.
    fn evaluate(&self) -> T {
        // A panicking callback must leave the cache unevaluated.
        self.state.replace(None);

        let frame = TrackingFrame::begin();
        let value = (self.compute)();
        let summary = frame.finish();

        TrackingFrame::track_summary(&summary);
        *self.state.borrow_mut() = Some(Evaluation {
            value: value.clone(),
            summary,
        });

        value
    }
}

impl<T> Debug for TrackedCache<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("TrackedCache")
            .field("has_value", &state.is_some())
            .field("dependencies", &state.as_ref().map(|e| e.summary.len()))
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
