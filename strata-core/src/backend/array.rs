//! Array output: every atom is one element of a list of values.

use std::fmt::Debug;

use crate::error::Result;
use crate::reactive::Var;
use crate::update::BoxedUpdater;

use super::list::{Document, ListAppender, ListCursor, OutputNode, SharedDocument};

/// A node in an array document.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayNode<V> {
    Value(V),
    Anchor,
    Placeholder,
}

impl<V> OutputNode for ArrayNode<V>
where
    V: Clone + PartialEq + 'static,
{
    type Atom = Var<V>;

    fn anchor() -> Self {
        ArrayNode::Anchor
    }

    fn placeholder() -> Self {
        ArrayNode::Placeholder
    }

    fn append(appender: &mut ListAppender<Self>, atom: Var<V>) -> Result<Option<BoxedUpdater>> {
        appender.push_var(atom, |value: &V| ArrayNode::Value(value.clone()))
    }
}

/// Appender type for array output.
pub type ArrayAppender<V> = ListAppender<ArrayNode<V>>;

/// An array of values that programs render into.
#[derive(Debug)]
pub struct ArrayOutput<V> {
    doc: SharedDocument<ArrayNode<V>>,
}

impl<V> ArrayOutput<V>
where
    V: Clone + PartialEq + 'static,
{
    pub fn new() -> Self {
        Self {
            doc: Document::shared(),
        }
    }

    /// Cursor at the end of the array.
    pub fn cursor(&self) -> ListCursor<ArrayNode<V>> {
        ListCursor::end_of(&self.doc)
    }

    /// The rendered values, without anchors or placeholders.
    pub fn values(&self) -> Vec<V> {
        self.doc
            .borrow()
            .nodes()
            .filter_map(|node| match node {
                ArrayNode::Value(value) => Some(value.clone()),
                ArrayNode::Anchor | ArrayNode::Placeholder => None,
            })
            .collect()
    }

    pub fn clears(&self) -> usize {
        self.doc.borrow().clears()
    }

    pub fn writes(&self) -> usize {
        self.doc.borrow().writes()
    }
}

impl<V> Default for ArrayOutput<V>
where
    V: Clone + PartialEq + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
