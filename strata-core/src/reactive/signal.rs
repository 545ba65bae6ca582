//! Signal Implementation
//!
//! A Signal is the mutable cell of the reactive system. It holds a value and
//! a [`Tag`] that records when the value last changed.
//!
//! # How Signals Work
//!
//! 1. When a signal is read within a tracking frame (a cache evaluation),
//!    the signal's tag is recorded in that frame.
//!
//! 2. When a signal's value is set, its tag is dirtied, bumping the global
//!    revision.
//!
//! 3. Nothing is pushed to dependents. Caches pull: on their next read they
//!    compare their recorded tags against the revision they were computed at.
//!
//! Signals are never permanently constant, because they remain assignable.
//!
//! # Threading
//!
//! The core is single-threaded. A signal is an `Rc` handle; cloning it yields
//! another handle to the same cell.

use std::cell::RefCell;
use std::fmt::Debug;
use std::rc::Rc;

use super::context::TrackingFrame;
use super::tag::{Tag, TagId};

struct SignalInner<T> {
    value: RefCell<T>,
    tag: Tag,
}

/// A mutable reactive cell holding a value of type T.
///
/// # Example
///
/// ```rust
/// use strata_core::reactive::Signal;
///
/// let count = Signal::new(0);
///
/// // Read the value
/// assert_eq!(count.get(), 0);
///
/// // Update the value (invalidates every cache that read it)
/// count.set(5);
/// assert_eq!(count.get(), 5);
/// ```
pub struct Signal<T> {
    inner: Rc<SignalInner<T>>,
}

impl<T> Signal<T> {
    /// Create a new signal with the given initial value.
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(SignalInner {
                value: RefCell::new(value),
                tag: Tag::new(),
            }),
        }
    }

    /// Get the signal's unique ID.
    pub fn id(&self) -> TagId {
        self.inner.tag.id()
    }

    /// The tag dirtied on every write.
    pub fn tag(&self) -> &Tag {
        &self.inner.tag
    }

    /// Borrow the current value, registering a read in the active frame.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        if TrackingFrame::is_active() {
            TrackingFrame::track(&self.inner.tag);
        }
        f(&*self.inner.value.borrow())
    }

    /// Set a new value and invalidate dependents.
    pub fn set(&self, value: T) {
        *self.inner.value.borrow_mut() = value;
        self.inner.tag.dirty();
    }

    /// Update the value using a function.
    ///
    /// This is useful for updates that depend on the current value.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&T) -> T,
    {
        let new_value = f(&*self.inner.value.borrow());
        self.set(new_value);
    }
}

impl<T: Clone> Signal<T> {
    /// Get the current value.
    ///
    /// If called within a tracking frame, this also registers the read.
    pub fn get(&self) -> T {
        self.with(T::clone)
    }

    /// Get the current value without tracking dependencies.
    pub fn get_untracked(&self) -> T {
        self.inner.value.borrow().clone()
    }
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Debug> Debug for Signal<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("id", &self.id())
            .field("value", &*self.inner.value.borrow())
            .field("revision", &self.inner.tag.revision())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signal_get_and_set() {
        let signal = Signal::new(0);
        assert_eq!(signal.get(), 0);

        signal.set(42);
        assert_eq!(signal.get(), 42);
    }

    #[test]
    fn signal_update() {
        let signal = Signal::new(10);
        signal.update(|v| v + 5);
        assert_eq!(signal.get(), 15);
    }

    #[test]
    fn signal_read_is_tracked() {
        let signal = Signal::new(1);

        let frame = TrackingFrame::begin();
        signal.get();
        let summary = frame.finish();

        assert_eq!(summary.len(), 1);
        signal.set(2);
        assert!(!summary.is_valid());
    }

    #[test]
    fn untracked_read_is_not_recorded() {
        let signal = Signal::new(1);

        let frame = TrackingFrame::begin();
        assert_eq!(signal.get_untracked(), 1);
        let summary = frame.finish();

        assert!(summary.is_const());
    }

    #[test]
    fn read_outside_frame_is_legal() {
        let signal = Signal::new("plain");
        assert!(!TrackingFrame::is_active());
        assert_eq!(signal.get(), "plain");
    }

    #[test]
    fn signal_clone_shares_state() {
        let signal1 = Signal::new(0);
        let signal2 = signal1.clone();

        signal1.set(42);
        assert_eq!(signal2.get(), 42);

        signal2.set(100);
        assert_eq!(signal1.get(), 100);
        assert_eq!(signal1.id(), signal2.id());
    }

    #[test]
    fn signal_ids_are_unique() {
        let s1 = Signal::new(0);
        let s2 = Signal::new(0);

        assert_ne!(s1.id(), s2.id());
    }
}
