//! Block descriptors.

use std::fmt;
use std::rc::Rc;

use crate::error::Result;
use crate::reactive::{TrackedCache, Var};
use crate::region::{Region, RegionAppender, Rendered};

use super::condition::ConditionUpdater;

type Body<A> = Rc<dyn Fn(&mut Region<A>) -> Result<()>>;

/// A unit of compiled template logic.
pub enum Block<A: RegionAppender> {
    /// Rendered once; only its nested updaters run afterwards.
    Static(StaticBlock<A>),
    /// Torn down and rebuilt whenever its selected branch changes.
    Condition(ConditionBlock<A>),
}

impl<A: RegionAppender> Block<A> {
    /// A static block running `body`.
    pub fn new<F>(body: F) -> Self
    where
        F: Fn(&mut Region<A>) -> Result<()> + 'static,
    {
        Block::Static(StaticBlock::new(body))
    }

    /// A static block that writes nothing.
    pub fn empty() -> Self {
        Block::new(|_| Ok(()))
    }

    pub fn condition(condition: impl Into<Var<bool>>, then: Block<A>, otherwise: Block<A>) -> Self {
        Block::Condition(ConditionBlock::new(condition, then, otherwise))
    }
}

impl<A: RegionAppender> Clone for Block<A> {
    fn clone(&self) -> Self {
        match self {
            Block::Static(block) => Block::Static(block.clone()),
            Block::Condition(block) => Block::Condition(block.clone()),
        }
    }
}

impl<A: RegionAppender> fmt::Debug for Block<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Block::Static(_) => f.write_str("Block::Static"),
            Block::Condition(_) => f.write_str("Block::Condition"),
        }
    }
}

/// `then` while `condition` holds, `otherwise` when it doesn't.
pub fn if_block<A: RegionAppender>(
    condition: impl Into<Var<bool>>,
    then: Block<A>,
    otherwise: Block<A>,
) -> Block<A> {
    Block::condition(condition, then, otherwise)
}

/// A block whose top-level structure never changes.
pub struct StaticBlock<A: RegionAppender> {
    body: Body<A>,
}

impl<A: RegionAppender> StaticBlock<A> {
    pub fn new<F>(body: F) -> Self
    where
        F: Fn(&mut Region<A>) -> Result<()> + 'static,
    {
        Self {
            body: Rc::new(body),
        }
    }

    pub(crate) fn invoke(&self, region: &mut Region<A>) -> Result<()> {
        (self.body)(region)
    }
}

impl<A: RegionAppender> Clone for StaticBlock<A> {
    fn clone(&self) -> Self {
        Self {
            body: Rc::clone(&self.body),
        }
    }
}

/// A block that picks one of two branches from a boolean var.
pub struct ConditionBlock<A: RegionAppender> {
    condition: Var<bool>,
    then: Rc<Block<A>>,
    otherwise: Rc<Block<A>>,
}

impl<A: RegionAppender> ConditionBlock<A> {
    pub fn new(condition: impl Into<Var<bool>>, then: Block<A>, otherwise: Block<A>) -> Self {
        Self {
            condition: condition.into(),
            then: Rc::new(then),
            otherwise: Rc::new(otherwise),
        }
    }

    /// Render the selected branch into its own range and register the
    /// updater that keeps it current.
    pub(crate) fn render(&self, region: &mut Region<A>) -> Result<()> {
        let condition = self.condition.clone();
        let cache = TrackedCache::new(move || condition.current());

        let branch = self.select(cache.get_value());
        let Rendered { range, updater } = region.render_dynamic(&branch)?;

        if cache.is_const() {
            // The branch can never be swapped out, so only its contents
            // still need polling.
            region.update_with(updater);
            return Ok(());
        }

        region.update_with(Some(Box::new(ConditionUpdater::new(
            cache,
            self.then.clone(),
            self.otherwise.clone(),
            branch,
            range,
            updater,
            region.host().clone(),
        ))));
        Ok(())
    }

    fn select(&self, condition: bool) -> Rc<Block<A>> {
        if condition {
            self.then.clone()
        } else {
            self.otherwise.clone()
        }
    }
}

impl<A: RegionAppender> Clone for ConditionBlock<A> {
    fn clone(&self) -> Self {
        Self {
            condition: self.condition.clone(),
            then: Rc::clone(&self.then),
            otherwise: Rc::clone(&self.otherwise),
        }
    }
}
