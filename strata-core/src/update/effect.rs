//! Effect Implementation
//!
//! An Effect keeps something outside the reactive system (an output node,
//! a log, a subscription) in sync with a reactive computation.
//!
//! # How Effects Work
//!
//! 1. [`Effect::install`] evaluates the computation once and hands the value
//!    to [`EffectHooks::initialize`].
//!
//! 2. Each poll re-reads the computation through its tracked cache. If the
//!    cache re-evaluated and the value differs from the last one delivered,
//!    [`EffectHooks::update`] runs.
//!
//! 3. When the effect's updater is discarded (its branch is torn down or the
//!    root unmounts), [`EffectHooks::destroy`] runs exactly once.
//!
//! # Settling
//!
//! An effect whose computation turns out to be permanently constant is
//! settled: it returns no updater, and it is released without `destroy`.
//! Its output stays in place until the range around it is cleared.
//!
//! An effect whose `update` fails is released the same way: the error
//! propagates to the caller and `destroy` does not run.

use std::fmt;

use crate::error::Result;
use crate::reactive::TrackedCache;

use super::updater::{BoxedUpdater, Updater};

/// Lifecycle callbacks for an [`Effect`].
pub trait EffectHooks<T> {
    /// Called once with the first computed value.
    fn initialize(&mut self, value: &T) -> Result<()>;

    /// Called whenever the computed value changes.
    fn update(&mut self, value: &T) -> Result<()>;

    /// Called once when a live effect is discarded.
    fn destroy(&mut self) {}
}

/// A side effect driven by a tracked computation.
pub struct Effect<T, H>
where
    H: EffectHooks<T>,
{
    cache: TrackedCache<T>,
    hooks: H,
    last: T,
    settled: bool,
}

impl<T, H> Effect<T, H>
where
    T: Clone + PartialEq + 'static,
    H: EffectHooks<T> + 'static,
{
    /// Evaluate `compute`, initialize the hooks, and return the updater that
    /// keeps them current, if the value can still change.
    pub fn install<F>(compute: F, mut hooks: H) -> Result<Option<BoxedUpdater>>
    where
        F: Fn() -> T + 'static,
    {
        let cache = TrackedCache::new(compute);
        let value = cache.get_value();
        hooks.initialize(&value)?;

        let effect = Box::new(Self {
            cache,
            hooks,
            last: value,
            settled: false,
        });
        Ok(effect.settle())
    }

    fn settle(mut self: Box<Self>) -> Option<BoxedUpdater> {
        if self.cache.is_const() {
            self.settled = true;
            None
        } else {
            Some(self)
        }
    }
}

impl<T, H> Updater for Effect<T, H>
where
    T: Clone + PartialEq + 'static,
    H: EffectHooks<T> + 'static,
{
    fn poll(mut self: Box<Self>) -> Result<Option<BoxedUpdater>> {
        let value = self.cache.get_value();
        if value != self.last {
            if let Err(err) = self.hooks.update(&value) {
                self.settled = true;
                return Err(err);
            }
            self.last = value;
        }
        Ok(self.settle())
    }
}

impl<T, H> Drop for Effect<T, H>
where
    H: EffectHooks<T>,
{
    fn drop(&mut self) {
        if !self.settled {
            self.hooks.destroy();
        }
    }
}

impl<T, H> fmt::Debug for Effect<T, H>
where
    H: EffectHooks<T>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Effect")
            .field("cache", &self.cache)
            .field("settled", &self.settled)
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
