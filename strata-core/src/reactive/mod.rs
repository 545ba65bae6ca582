//! Reactive Primitives
//!
//! This module implements the reactive data layer: signals, derived values,
//! and the tracked cache underneath them.
//!
//! # Concepts
//!
//! ## Signals
//!
//! A Signal is a mutable cell. Reading it inside a tracking frame records
//! the signal's tag in that frame. Writing it dirties the tag.
//!
//! ## Derived values
//!
//! A Derived value wraps a callback over other reactive values in a
//! [`TrackedCache`]. It re-evaluates only when one of the tags it read has
//! changed, and it becomes permanently constant once an evaluation reads
//! nothing mutable.
//!
//! ## Vars
//!
//! [`Var`] unifies constants, signals and derived values behind one
//! `compute`/`current` surface.
//!
//! # Implementation Notes
//!
//! Invalidation is pull-based. Nothing is notified when a signal changes;
//! a cache validates its recorded tags against the revision at which it was
//! computed the next time it is read. Tracking frames live on a
//! thread-local stack so nested evaluations fold their reads into the
//! enclosing frame.

mod cache;
mod context;
mod signal;
mod tag;
mod var;

pub use cache::{CacheStatus, TrackedCache};
pub use context::{untracked, DependencySummary, TrackingFrame};
pub use signal::Signal;
pub use tag::{Revision, Tag, TagId};
pub use var::{Computed, Derived, Kind, Var};
