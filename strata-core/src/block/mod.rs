//! Blocks
//!
//! A block is compiled template logic that renders into a
//! [`Region`](crate::region::Region). There are exactly two kinds:
//!
//! - [`StaticBlock`]: rendered once. Later passes only poll the updaters it
//!   produced; its top-level structure is never re-run.
//! - [`ConditionBlock`]: renders one of two branches into its own range.
//!   When the selected branch changes, the range is cleared and the new
//!   branch is rendered from scratch.
//!
//! [`Root`] is the entry point tying a block to an output location.

mod condition;
mod descriptor;
mod root;

pub use descriptor::{if_block, Block, ConditionBlock, StaticBlock};
pub use root::{render, Program, Root};
