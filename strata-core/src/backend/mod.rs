//! Reference output backends.
//!
//! Both backends share one flat document model ([`list`]) and differ only
//! in their node type: [`array`] renders a list of values, [`dom`] renders
//! markup with elements and attributes.

pub mod array;
pub mod dom;
pub mod list;

pub use array::{ArrayAppender, ArrayNode, ArrayOutput};
pub use dom::{Attribute, DomAppender, DomNode, DomOutput, Element};
pub use list::{Document, ListAppender, ListCursor, ListRange, NodeId, OutputNode, SharedDocument};
