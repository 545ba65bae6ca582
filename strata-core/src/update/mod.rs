//! Updaters
//!
//! Rendering produces output plus a set of [`Updater`]s: one for every part
//! of the output that might still change. A rerender polls them in the
//! order they were created; each one decides locally whether to do nothing,
//! patch its output, or rebuild it.
//!
//! [`Effect`] is the leaf updater. It pairs a tracked computation with
//! initialize/update/destroy hooks, and atoms are effects whose hooks write
//! a single output node.

mod effect;
mod updater;

pub use effect::{Effect, EffectHooks};
pub use updater::{BoxedUpdater, Updater, Updaters};
