//! The updater protocol.
//!
//! An [`Updater`] is a piece of rendered output that might still change.
//! Polling it consumes the handle and yields either a successor to keep
//! polling on the next rerender, or `None` once the output can never change
//! again.

use std::fmt;

use smallvec::SmallVec;

use crate::error::Result;

/// Owned, type-erased updater.
pub type BoxedUpdater = Box<dyn Updater>;

/// A pollable handle over output that may still need to change.
pub trait Updater {
    /// Bring the output up to date.
    ///
    /// Returns the updater to retain for the next pass (often `self`), or
    /// `None` when the underlying computation has become permanently const.
    fn poll(self: Box<Self>) -> Result<Option<BoxedUpdater>>;
}

/// A list of updaters polled in insertion order.
pub struct Updaters {
    list: SmallVec<[BoxedUpdater; 4]>,
}

impl Updaters {
    /// Fold a list of updaters into one.
    ///
    /// An empty list yields `None` and a single updater is returned as is.
    pub fn collect<I>(updaters: I) -> Option<BoxedUpdater>
    where
        I: IntoIterator<Item = BoxedUpdater>,
    {
        let mut list: SmallVec<[BoxedUpdater; 4]> = updaters.into_iter().collect();
        match list.len() {
            0 => None,
            1 => list.pop(),
            _ => Some(Box::new(Updaters { list })),
        }
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}

impl Updater for Updaters {
    fn poll(self: Box<Self>) -> Result<Option<BoxedUpdater>> {
        let mut retained = SmallVec::<[BoxedUpdater; 4]>::new();
        for updater in self.list {
            if let Some(next) = updater.poll()? {
                retained.push(next);
            }
        }
        Ok(Updaters::collect(retained))
    }
}

impl fmt::Debug for Updaters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Updaters").field("len", &self.list.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Logs its name on every poll and finishes after `remaining` polls.
    struct Countdown {
        name: &'static str,
        remaining: usize,
        log: Rc<RefCell<Vec<&'static str>>>,
    }

    impl Countdown {
        fn boxed(
            name: &'static str,
            remaining: usize,
            log: &Rc<RefCell<Vec<&'static str>>>,
        ) -> BoxedUpdater {
            Box::new(Countdown {
                name,
                remaining,
                log: log.clone(),
            })
        }
    }

    impl Updater for Countdown {
        fn poll(mut self: Box<Self>) -> Result<Option<BoxedUpdater>> {
            self.log.borrow_mut().push(self.name);
            self.remaining -= 1;
            if self.remaining == 0 {
                Ok(None)
            } else {
                Ok(Some(self))
            }
        }
    }

    #[test]
    fn empty_list_collects_to_none() {
        assert!(Updaters::collect(Vec::new()).is_none());
    }

    #[test]
    fn polls_in_insertion_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let composite = Updaters::collect(vec![
            Countdown::boxed("a", 3, &log),
            Countdown::boxed("b", 3, &log),
            Countdown::boxed("c", 3, &log),
        ])
        .unwrap();

        composite.poll().unwrap();
        assert_eq!(*log.borrow(), vec!["a", "b", "c"]);
    }

    #[test]
    fn finished_children_are_dropped() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let composite = Updaters::collect(vec![
            Countdown::boxed("short", 1, &log),
            Countdown::boxed("long", 3, &log),
        ])
        .unwrap();

        let next = composite.poll().unwrap().unwrap();
        log.borrow_mut().clear();

        let next = next.poll().unwrap().unwrap();
        assert_eq!(*log.borrow(), vec!["long"]);

        assert!(next.poll().unwrap().is_none());
    }

    #[test]
    fn composite_finishes_when_all_children_finish() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let composite = Updaters::collect(vec![
            Countdown::boxed("a", 1, &log),
            Countdown::boxed("b", 1, &log),
        ])
        .unwrap();

        assert!(composite.poll().unwrap().is_none());
    }
}
