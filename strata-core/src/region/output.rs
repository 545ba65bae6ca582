//! Regions.
//!
//! A [`Region`] is what template code writes into. It pairs one backend
//! appender with the list of updaters discovered while rendering, and it is
//! thrown away once the block finishes: only the finalized range and the
//! collected updater survive.
//!
//! A region always wraps a raw appender. `Region` does not implement
//! [`RegionAppender`], so a region can never be wrapped in another one.

use std::rc::Rc;

use crate::block::{Block, ConditionBlock, StaticBlock};
use crate::error::Result;
use crate::host::{Host, Level, Operation, Scope, SourceInfo};
use crate::reactive::Var;
use crate::update::{BoxedUpdater, Effect, EffectHooks, Updaters};

use super::appender::{CursorAdapter, RegionAppender};
use super::open::OpenRegion;

/// The outcome of rendering a block into its own region.
pub struct Rendered<A: RegionAppender> {
    pub range: A::Range,
    pub updater: Option<BoxedUpdater>,
}

/// Output appender plus the updaters collected while rendering into it.
pub struct Region<A: RegionAppender> {
    pub(super) appender: A,
    pub(super) updaters: Vec<BoxedUpdater>,
    pub(super) host: Rc<dyn Host>,
}

impl<A: RegionAppender> Region<A> {
    pub fn new(appender: A, host: Rc<dyn Host>) -> Self {
        Self {
            appender,
            updaters: Vec::new(),
            host,
        }
    }

    /// Render `block` into a fresh region over `appender` and finalize it.
    pub fn render_into(appender: A, host: Rc<dyn Host>, block: &Block<A>) -> Result<Rendered<A>> {
        let mut region = Region::new(appender, host);
        region.render_block(block)?;
        region.finalize()
    }

    pub fn host(&self) -> &Rc<dyn Host> {
        &self.host
    }

    pub fn cursor(&self) -> A::Cursor {
        self.appender.cursor()
    }

    /// Number of updaters collected so far.
    pub fn pending(&self) -> usize {
        self.updaters.len()
    }

    /// Append one leaf atom at the cursor.
    #[track_caller]
    pub fn atom(&mut self, atom: A::Atom) -> Result<()> {
        let scope = Scope::enter(&self.host, Operation::Atom(SourceInfo::caller()));
        let updater = self.appender.atom(atom)?;
        drop(scope);
        self.update_with(updater);
        Ok(())
    }

    /// Install a user effect driven by `compute`.
    #[track_caller]
    pub fn effect<T, F, H>(&mut self, compute: F, hooks: H) -> Result<()>
    where
        T: Clone + PartialEq + 'static,
        F: Fn() -> T + 'static,
        H: EffectHooks<T> + 'static,
    {
        let scope = Scope::enter(&self.host, Operation::Effect(SourceInfo::caller()));
        let updater = Effect::install(compute, hooks)?;
        drop(scope);
        self.update_with(updater);
        Ok(())
    }

    /// Record an updater discovered while rendering.
    pub fn update_with(&mut self, updater: Option<BoxedUpdater>) {
        match updater {
            Some(updater) => self.updaters.push(updater),
            None => self.host.log(Level::Trace, &Operation::Dynamic, "static"),
        }
    }

    /// Begin a structured child such as an element.
    pub fn open<Ad>(&mut self, adapter: Ad) -> Result<OpenRegion<'_, A, Ad>>
    where
        Ad: CursorAdapter<A>,
    {
        OpenRegion::new(self, adapter)
    }

    /// Render `block` into a new child region with its own updater list and
    /// clearable range.
    pub fn render_dynamic(&mut self, block: &Block<A>) -> Result<Rendered<A>> {
        let _scope = Scope::enter(&self.host, Operation::Dynamic);
        let child = self.appender.child()?;
        Region::render_into(child, self.host.clone(), block)
    }

    /// Render a static block into this region.
    pub fn render_static(&mut self, block: &StaticBlock<A>) -> Result<()> {
        block.invoke(self)
    }

    /// Render any block into this region.
    pub fn render_block(&mut self, block: &Block<A>) -> Result<()> {
        match block {
            Block::Static(block) => self.render_static(block),
            Block::Condition(block) => block.render(self),
        }
    }

    /// Render `then` while `condition` holds and `otherwise` when it doesn't.
    pub fn if_block(
        &mut self,
        condition: impl Into<Var<bool>>,
        then: Block<A>,
        otherwise: Block<A>,
    ) -> Result<()> {
        ConditionBlock::new(condition, then, otherwise).render(self)
    }

    /// Close the appender and fold the collected updaters into one.
    pub fn finalize(self) -> Result<Rendered<A>> {
        let range = self.appender.finalize()?;
        Ok(Rendered {
            range,
            updater: Updaters::collect(self.updaters),
        })
    }
}
