//! Condition block state machine.
//!
//! Each poll re-reads the condition through its tracked cache:
//!
//! - same branch as last time: poll the branch's own updater in place;
//! - different branch: drop the old updater (running effect `destroy`
//!   hooks), clear the range, and render the new branch at the cursor the
//!   clear returned.
//!
//! Once the condition cache is permanently const the wrapper dissolves into
//! the branch's updater, or disappears if the branch has none. While the
//! condition can still change the wrapper is retained even when the branch
//! itself is fully static, since it may need to be torn down later.

use std::rc::Rc;

use crate::error::{RenderError, Result};
use crate::host::{Host, Level, Operation, Scope};
use crate::reactive::TrackedCache;
use crate::region::{Range, Region, RegionAppender, Rendered};
use crate::update::{BoxedUpdater, Updater};

use super::descriptor::Block;

pub(super) struct ConditionUpdater<A: RegionAppender> {
    cache: TrackedCache<bool>,
    then: Rc<Block<A>>,
    otherwise: Rc<Block<A>>,
    current: Rc<Block<A>>,
    range: Option<A::Range>,
    inner: Option<BoxedUpdater>,
    host: Rc<dyn Host>,
}

impl<A: RegionAppender> ConditionUpdater<A> {
    pub(super) fn new(
        cache: TrackedCache<bool>,
        then: Rc<Block<A>>,
        otherwise: Rc<Block<A>>,
        current: Rc<Block<A>>,
        range: A::Range,
        inner: Option<BoxedUpdater>,
        host: Rc<dyn Host>,
    ) -> Self {
        Self {
            cache,
            then,
            otherwise,
            current,
            range: Some(range),
            inner,
            host,
        }
    }

    fn switch_to(&mut self, branch: Rc<Block<A>>) -> Result<()> {
        let _scope = Scope::enter(&self.host, Operation::Switch);
        self.inner = None;

        let range = self.range.take().ok_or(RenderError::MissingRange)?;
        let cursor = range.clear()?;
        let Rendered { range, updater } =
            Region::render_into(A::at(cursor), self.host.clone(), &branch)?;

        self.range = Some(range);
        self.inner = updater;
        self.current = branch;
        Ok(())
    }
}

impl<A: RegionAppender> Updater for ConditionUpdater<A> {
    fn poll(mut self: Box<Self>) -> Result<Option<BoxedUpdater>> {
        let branch = if self.cache.get_value() {
            self.then.clone()
        } else {
            self.otherwise.clone()
        };

        if Rc::ptr_eq(&branch, &self.current) {
            if let Some(inner) = self.inner.take() {
                self.inner = inner.poll()?;
            }
        } else {
            self.host
                .log(Level::Debug, &Operation::Switch, "branch changed, rebuilding");
            self.switch_to(branch)?;
        }

        if self.cache.is_const() {
            return Ok(self.inner.take());
        }
        Ok(Some(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{ArrayAppender, ArrayOutput};
    use crate::host::NullHost;
    use crate::reactive::{Signal, Var};

    type Numbers = ArrayAppender<i64>;

    /// True once `latch` is set; until then follows `show`.
    fn latched(latch: &Signal<bool>, show: &Signal<bool>) -> Var<bool> {
        let (latch, show) = (latch.clone(), show.clone());
        Var::derived(move || latch.get_untracked() || show.get())
    }

    fn region(output: &ArrayOutput<i64>) -> Region<Numbers> {
        Region::new(Numbers::at(output.cursor()), Rc::new(NullHost))
    }

    #[test]
    fn dynamic_condition_keeps_wrapper_over_static_branch() {
        let output = ArrayOutput::new();
        let show = Signal::new(true);
        let mut region = region(&output);

        region
            .if_block(
                show.clone(),
                Block::new(|region| region.atom(Var::constant(1))),
                Block::empty(),
            )
            .unwrap();
        let updater = region.finalize().unwrap().updater;

        assert!(updater.is_some());
        assert_eq!(output.values(), vec![1]);
    }

    #[test]
    fn switch_clears_and_renders_other_branch() {
        let output = ArrayOutput::new();
        let show = Signal::new(true);
        let mut region = region(&output);

        region
            .if_block(
                show.clone(),
                Block::new(|region| region.atom(Var::constant(1))),
                Block::new(|region| region.atom(Var::constant(2))),
            )
            .unwrap();
        let updater = region.finalize().unwrap().updater.unwrap();

        show.set(false);
        let updater = updater.poll().unwrap();

        assert!(updater.is_some());
        assert_eq!(output.values(), vec![2]);
        assert_eq!(output.clears(), 1);
    }

    #[test]
    fn condition_turning_const_dissolves_into_branch_updater() {
        let output = ArrayOutput::new();
        let latch = Signal::new(false);
        let show = Signal::new(true);
        let value = Signal::new(1);
        let mut region = region(&output);

        let then = {
            let value = value.clone();
            Block::new(move |region| region.atom(value.clone().into()))
        };
        region
            .if_block(latched(&latch, &show), then, Block::empty())
            .unwrap();
        let updater = region.finalize().unwrap().updater.unwrap();

        // The condition now reads nothing mutable.
        latch.set(true);
        show.set(false);
        let inner = updater.poll().unwrap().unwrap();
        assert_eq!(output.values(), vec![1]);

        // What remains is the atom's own updater.
        value.set(5);
        let inner = inner.poll().unwrap();
        assert!(inner.is_some());
        assert_eq!(output.values(), vec![5]);
        assert_eq!(output.clears(), 0);
    }

    #[test]
    fn condition_turning_const_over_static_branch_dissolves_to_nothing() {
        let output = ArrayOutput::new();
        let latch = Signal::new(false);
        let show = Signal::new(true);
        let mut region = region(&output);

        region
            .if_block(
                latched(&latch, &show),
                Block::new(|region| region.atom(Var::constant(1))),
                Block::empty(),
            )
            .unwrap();
        let updater = region.finalize().unwrap().updater.unwrap();

        latch.set(true);
        show.set(false);

        assert!(updater.poll().unwrap().is_none());
        assert_eq!(output.values(), vec![1]);
    }
}
