//! Two-phase builder for structured child regions.
//!
//! ```text
//! open(adapter) -> head(..)* -> flush() -> body() / region writes* -> close()
//! ```
//!
//! The phase is tracked on the handle, so a `head` after `flush` or a
//! `close` before `flush` fails with [`RenderError::Phase`] instead of
//! corrupting the output.

use crate::error::{RenderError, Result};
use crate::host::{Operation, Scope};

use super::appender::{CursorAdapter, RegionAppender};
use super::output::Region;

/// Where an [`OpenRegion`] is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Accepting head items.
    Head,
    /// Accepting body content.
    Body,
}

/// A structured child region in the middle of being built.
///
/// Body content shares the parent's updater list; the child's updaters are
/// moved into the parent on [`OpenRegion::close`].
pub struct OpenRegion<'r, A, Ad>
where
    A: RegionAppender,
    Ad: CursorAdapter<A>,
{
    parent: &'r mut Region<A>,
    adapter: Ad,
    child: Region<Ad::Child>,
    phase: Phase,
    /// Ends the `open` operation when the handle goes away.
    _scope: Scope,
}

impl<'r, A, Ad> OpenRegion<'r, A, Ad>
where
    A: RegionAppender,
    Ad: CursorAdapter<A>,
{
    pub(super) fn new(parent: &'r mut Region<A>, adapter: Ad) -> Result<Self> {
        let scope = Scope::enter(&parent.host, Operation::Open);
        let appender = adapter.child(&mut parent.appender)?;
        let child = Region::new(appender, parent.host.clone());
        Ok(Self {
            parent,
            adapter,
            child,
            phase: Phase::Head,
            _scope: scope,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Write one head item.
    pub fn head(&mut self, head: Ad::Head) -> Result<&mut Self> {
        self.expect("head", Phase::Head)?;
        let updater = self.adapter.head(&mut self.child.appender, head)?;
        self.child.update_with(updater);
        Ok(self)
    }

    /// End the head and start the body.
    pub fn flush(&mut self) -> Result<&mut Region<Ad::Child>> {
        self.expect("flush", Phase::Head)?;
        self.phase = Phase::Body;
        Ok(&mut self.child)
    }

    /// The body region, once flushed.
    pub fn body(&mut self) -> Result<&mut Region<Ad::Child>> {
        self.expect("body", Phase::Body)?;
        Ok(&mut self.child)
    }

    /// Finish the structure and return control to the parent.
    pub fn close(mut self) -> Result<()> {
        self.expect("close", Phase::Body)?;
        let Region {
            appender, updaters, ..
        } = self.child;
        let range = appender.finalize()?;
        self.adapter.flush(&mut self.parent.appender, range)?;
        self.parent.updaters.extend(updaters);
        Ok(())
    }

    fn expect(&self, operation: &'static str, phase: Phase) -> Result<()> {
        if self.phase == phase {
            Ok(())
        } else {
            Err(RenderError::Phase {
                operation,
                phase: self.phase,
            })
        }
    }
}
