//! Reactive values.
//!
//! [`Var`] is the closed set of things a template can project into output:
//! a constant, a mutable [`Signal`], or a [`Derived`] computation over other
//! vars. All three answer [`Var::compute`] with the current value and whether
//! it can ever change again.

use std::fmt::{self, Debug};
use std::rc::Rc;

use super::cache::TrackedCache;
use super::signal::Signal;

/// Whether a computed value can still change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// Permanently fixed.
    Const,
    /// May change on a later read.
    Dynamic,
}

/// A value together with its [`Kind`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Computed<T> {
    pub kind: Kind,
    pub value: T,
}

/// A cached computation over other reactive values.
///
/// The callback must only depend on reactive values it reads; anything else
/// it captures is invisible to invalidation.
pub struct Derived<T> {
    cache: Rc<TrackedCache<T>>,
}

impl<T: Clone + 'static> Derived<T> {
    pub fn new<F>(compute: F) -> Self
    where
        F: Fn() -> T + 'static,
    {
        Self {
            cache: Rc::new(TrackedCache::new(compute)),
        }
    }

    /// Get the latest value, forcing evaluation of the cache.
    pub fn get(&self) -> T {
        self.cache.get_value()
    }

    /// True once the cache has proven it read nothing mutable.
    pub fn is_const(&self) -> bool {
        self.cache.is_const()
    }

    pub fn compute(&self) -> Computed<T> {
        let value = self.cache.get_value();
        let kind = if self.cache.is_const() {
            Kind::Const
        } else {
            Kind::Dynamic
        };
        Computed { kind, value }
    }
}

impl<T> Clone for Derived<T> {
    fn clone(&self) -> Self {
        Self {
            cache: Rc::clone(&self.cache),
        }
    }
}

impl<T> Debug for Derived<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Derived").field("cache", &self.cache).finish()
    }
}

/// A reactive value: constant, mutable cell, or derived computation.
pub enum Var<T> {
    Const(T),
    Signal(Signal<T>),
    Derived(Derived<T>),
}

impl<T: Clone + 'static> Var<T> {
    pub fn constant(value: T) -> Self {
        Var::Const(value)
    }

    pub fn signal(value: T) -> Self {
        Var::Signal(Signal::new(value))
    }

    pub fn derived<F>(compute: F) -> Self
    where
        F: Fn() -> T + 'static,
    {
        Var::Derived(Derived::new(compute))
    }

    /// Derive a new var by applying `f` to this one.
    pub fn map<U, F>(&self, f: F) -> Var<U>
    where
        U: Clone + 'static,
        F: Fn(T) -> U + 'static,
    {
        let source = self.clone();
        Var::derived(move || f(source.current()))
    }

    /// The current value and whether it can still change.
    pub fn compute(&self) -> Computed<T> {
        match self {
            Var::Const(value) => Computed {
                kind: Kind::Const,
                value: value.clone(),
            },
            Var::Signal(signal) => Computed {
                kind: Kind::Dynamic,
                value: signal.get(),
            },
            Var::Derived(derived) => derived.compute(),
        }
    }

    /// The freshest value, registering the read in the active frame.
    pub fn current(&self) -> T {
        match self {
            Var::Const(value) => value.clone(),
            Var::Signal(signal) => signal.get(),
            Var::Derived(derived) => derived.get(),
        }
    }
}

impl<T: Clone> Clone for Var<T> {
    fn clone(&self) -> Self {
        match self {
            Var::Const(value) => Var::Const(value.clone()),
            Var::Signal(signal) => Var::Signal(signal.clone()),
            Var::Derived(derived) => Var::Derived(derived.clone()),
        }
    }
}

impl<T: Debug> Debug for Var<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Var::Const(value) => f.debug_tuple("Const").field(value).finish(),
            Var::Signal(signal) => f.debug_tuple("Signal").field(signal).finish(),
            Var::Derived(derived) => f.debug_tuple("Derived").field(derived).finish(),
        }
    }
}

impl<T> From<Signal<T>> for Var<T> {
    fn from(signal: Signal<T>) -> Self {
        Var::Signal(signal)
    }
}

impl<T> From<Derived<T>> for Var<T> {
    fn from(derived: Derived<T>) -> Self {
        Var::Derived(derived)
    }
}

impl From<&str> for Var<String> {
    fn from(text: &str) -> Self {
        Var::Const(text.to_owned())
    }
}
