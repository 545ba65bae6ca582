//! Root block.
//!
//! A [`Root`] ties one program to one output location. It owns the single
//! top-level updater; `rerender` polls it, and every nested updater is
//! polled transitively from there.

use std::mem;
use std::rc::Rc;

use crate::config::Config;
use crate::error::{RenderError, Result};
use crate::host::{Host, Level, Operation, Scope};
use crate::region::{Range, Region, RegionAppender, Rendered};
use crate::update::BoxedUpdater;

use super::descriptor::Block;

/// A compiled template: turns input values into a block.
pub trait Program<A: RegionAppender, I> {
    fn block(&self, inputs: I) -> Block<A>;
}

impl<A, I, F> Program<A, I> for F
where
    A: RegionAppender,
    F: Fn(I) -> Block<A>,
{
    fn block(&self, inputs: I) -> Block<A> {
        self(inputs)
    }
}

/// Build `program` from `inputs` and render it at `cursor`.
pub fn render<A, I, P>(program: &P, inputs: I, cursor: A::Cursor) -> Result<Root<A>>
where
    A: RegionAppender,
    P: Program<A, I>,
{
    let mut root = Root::new(program.block(inputs));
    root.render(cursor)?;
    Ok(root)
}

enum RootState<A: RegionAppender> {
    Pending,
    Rendered {
        range: A::Range,
        updater: Option<BoxedUpdater>,
    },
    Poisoned,
}

/// The outermost block of a rendered program.
pub struct Root<A: RegionAppender> {
    block: Block<A>,
    host: Rc<dyn Host>,
    state: RootState<A>,
}

impl<A: RegionAppender> Root<A> {
    /// Create a root using the default configuration.
    pub fn new(block: Block<A>) -> Self {
        Self::with_config(block, &Config::default())
    }

    pub fn with_config(block: Block<A>, config: &Config) -> Self {
        Self {
            block,
            host: config.host(),
            state: RootState::Pending,
        }
    }

    /// Replace the diagnostic host.
    pub fn with_host(mut self, host: Rc<dyn Host>) -> Self {
        self.host = host;
        self
    }

    /// Perform the initial render at `cursor`.
    ///
    /// The program writes into its own anchored range, so `unmount` only
    /// removes what the program wrote.
    pub fn render(&mut self, cursor: A::Cursor) -> Result<()> {
        if !matches!(self.state, RootState::Pending) {
            return Err(RenderError::AlreadyRendered);
        }

        let _scope = Scope::enter(&self.host, Operation::Render);
        self.state = RootState::Poisoned;
        let mut appender = A::at(cursor);
        let child = appender.child()?;
        let Rendered { range, updater } =
            Region::render_into(child, self.host.clone(), &self.block)?;
        appender.finalize()?;
        if updater.is_none() {
            self.host
                .log(Level::Info, &Operation::Render, "program is fully static");
        }
        self.state = RootState::Rendered { range, updater };
        Ok(())
    }

    /// Bring the output up to date with the current input values.
    ///
    /// The root stays poisoned unless the pass completes, whether it fails
    /// with an error or a user callback panics.
    pub fn rerender(&mut self) -> Result<()> {
        let (range, updater) = match mem::replace(&mut self.state, RootState::Poisoned) {
            RootState::Pending => {
                self.state = RootState::Pending;
                return Err(RenderError::NotRendered);
            }
            RootState::Poisoned => return Err(RenderError::Poisoned),
            RootState::Rendered { range, updater } => (range, updater),
        };

        let Some(updater) = updater else {
            self.host
                .log(Level::Debug, &Operation::Rerender, "nothing to update");
            self.state = RootState::Rendered {
                range,
                updater: None,
            };
            return Ok(());
        };

        let _scope = Scope::enter(&self.host, Operation::Rerender);
        let updater = updater.poll()?;
        self.state = RootState::Rendered { range, updater };
        Ok(())
    }

    /// True once nothing in the output can change any more.
    pub fn is_const(&self) -> bool {
        matches!(self.state, RootState::Rendered { updater: None, .. })
    }

    /// Tear the output down and return the cursor where it used to be.
    ///
    /// Live effects are destroyed before the range is cleared.
    pub fn unmount(self) -> Result<A::Cursor> {
        match self.state {
            RootState::Pending => Err(RenderError::NotRendered),
            RootState::Poisoned => Err(RenderError::Poisoned),
            RootState::Rendered { range, updater } => {
                let _scope = Scope::enter(&self.host, Operation::Unmount);
                drop(updater);
                range.clear()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{ArrayAppender, ArrayNode, ArrayOutput};
    use crate::block::if_block;
    use crate::config::TraceLevel;
    use crate::reactive::{Signal, Var};

    type Numbers = ArrayAppender<i64>;

    fn quiet(block: Block<Numbers>) -> Root<Numbers> {
        Root::with_config(block, &Config::default().with_trace(TraceLevel::Off))
    }

    #[test]
    fn rerender_before_render_is_rejected() {
        let mut root = quiet(Block::empty());

        assert!(matches!(root.rerender(), Err(RenderError::NotRendered)));
        // Still renderable afterwards.
        root.render(ArrayOutput::new().cursor()).unwrap();
    }

    #[test]
    fn root_becomes_const_once_condition_stops_reading() {
        let output = ArrayOutput::new();
        let latch = Signal::new(false);
        let show = Signal::new(true);
        let condition = {
            let (latch, show) = (latch.clone(), show.clone());
            Var::derived(move || latch.get_untracked() || show.get())
        };

        let mut root = quiet(if_block(
            condition,
            Block::new(|region| region.atom(Var::constant(1))),
            Block::empty(),
        ));
        root.render(output.cursor()).unwrap();
        assert!(!root.is_const());

        latch.set(true);
        show.set(false);
        root.rerender().unwrap();

        assert!(root.is_const());
        assert_eq!(output.values(), vec![1]);
    }

    #[test]
    fn program_range_is_anchored() {
        let output = ArrayOutput::new();
        let mut root = quiet(Block::new(|region| region.atom(Var::constant(7))));

        root.render(output.cursor()).unwrap();

        let doc = output.cursor();
        let nodes: Vec<_> = doc.document().borrow().nodes().cloned().collect();
        assert_eq!(
            nodes,
            vec![ArrayNode::Anchor, ArrayNode::Value(7), ArrayNode::Anchor]
        );
    }

    #[test]
    fn unmount_returns_cursor_inside_cleared_range() {
        let output = ArrayOutput::new();
        let mut root = quiet(Block::new(|region| region.atom(Var::constant(7))));
        root.render(output.cursor()).unwrap();

        let cursor = root.unmount().unwrap();
        assert!(output.values().is_empty());

        let mut again = quiet(Block::new(|region| region.atom(Var::constant(8))));
        again.render(cursor).unwrap();
        assert_eq!(output.values(), vec![8]);
    }
}
