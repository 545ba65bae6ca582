//! Error types for the rendering core.
//!
//! Everything in here is an invariant violation or a configuration mistake.
//! User callbacks are infallible closures; a callback that panics unwinds
//! straight through `render`/`rerender` and is never caught by the core.

use thiserror::Error;

use crate::backend::NodeId;
use crate::region::Phase;

/// Errors raised by the rendering core.
#[derive(Debug, Error)]
pub enum RenderError {
    /// `rerender` or `unmount` was called on a root that was never rendered.
    #[error("root has not been rendered yet")]
    NotRendered,

    /// `render` was called twice on the same root.
    #[error("root has already been rendered")]
    AlreadyRendered,

    /// A previous render pass failed part-way through.
    #[error("a previous render pass failed; the root can no longer be updated")]
    Poisoned,

    /// The two-phase open-region builder was driven out of order.
    #[error("`{operation}` is not allowed while the open region is in the {phase:?} phase")]
    Phase {
        operation: &'static str,
        phase: Phase,
    },

    /// A cursor or range points at a node that was removed from its document.
    #[error("node {0:?} is no longer attached to the document")]
    DetachedNode(NodeId),

    /// An output slot was updated before it was initialized.
    #[error("output slot updated before it was initialized")]
    Uninitialized,

    /// A dynamic block lost track of the range it rendered into.
    #[error("dynamic block has no range to clear")]
    MissingRange,

    /// Unknown trace level in configuration.
    #[error("invalid trace level `{0}` (expected off, summary or verbose)")]
    InvalidTraceLevel(String),
}

/// Result alias used throughout the crate.
pub type Result<T, E = RenderError> = std::result::Result<T, E>;
