//! Strata Core
//!
//! This crate provides the dependency-tracked update core of the Strata
//! incremental rendering engine. Given a tree of blocks describing how to
//! project reactive values into an ordered output, it performs an initial
//! render and then re-renders only the parts of the output whose inputs
//! actually changed.
//!
//! It implements:
//!
//! - Reactive values (constants, signals, derived values) and the tracked
//!   cache that memoizes them
//! - The updater protocol every piece of live output reports through
//! - Regions, which template code writes into while a block renders
//! - Static and condition blocks, and the root that drives rerenders
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - `reactive`: signals, derived values and dependency tracking
//! - `update`: the updater protocol and effects
//! - `region`: regions and the backend contracts they write through
//! - `block`: block descriptors, the condition state machine, and the root
//! - `backend`: reference array and DOM outputs
//!
//! # Example
//!
//! ```rust
//! use strata_core::backend::{ArrayAppender, ArrayOutput};
//! use strata_core::block::{Block, Root};
//! use strata_core::reactive::{Signal, Var};
//!
//! let first = Signal::new(10);
//! let second = Signal::new(20);
//! let sum = {
//!     let (first, second) = (first.clone(), second.clone());
//!     Var::derived(move || first.get() + second.get())
//! };
//!
//! let block = {
//!     let (first, second) = (first.clone(), second.clone());
//!     Block::<ArrayAppender<i64>>::new(move |region| {
//!         region.atom(first.clone().into())?;
//!         region.atom(second.clone().into())?;
//!         region.atom(sum.clone())
//!     })
//! };
//!
//! let output = ArrayOutput::new();
//! let mut root = Root::new(block);
//! root.render(output.cursor()).unwrap();
//! assert_eq!(output.values(), vec![10, 20, 30]);
//!
//! first.set(15);
//! root.rerender().unwrap();
//! assert_eq!(output.values(), vec![15, 20, 35]);
//! ```

pub mod backend;
pub mod block;
pub mod config;
pub mod error;
pub mod host;
pub mod reactive;
pub mod region;
pub mod update;

pub use block::{if_block, render, Block, Root};
pub use config::{Config, TraceLevel};
pub use error::{RenderError, Result};
pub use reactive::{Derived, Signal, Var};
pub use region::Region;
