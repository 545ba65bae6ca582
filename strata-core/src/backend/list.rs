//! Flat ordered document.
//!
//! Output is a single ordered list of nodes keyed by stable [`NodeId`]s.
//! Positions are never stored as indices: a cursor says "insert before node
//! X" (or "at the end"), so edits elsewhere in the document never move it.
//!
//! Every dynamic child region is bracketed by two invisible anchor nodes.
//! Clearing a range removes what lies strictly between its anchors, so a
//! nested rebuild never invalidates the anchors of an enclosing range. An
//! empty dynamic region holds a placeholder node until something replaces
//! it.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use indexmap::IndexMap;

use crate::error::{RenderError, Result};
use crate::reactive::Var;
use crate::region::{Range, RegionAppender};
use crate::update::{BoxedUpdater, Effect, EffectHooks};

/// Unique identifier for a node in a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u64);

impl NodeId {
    /// Generate a new unique node ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

/// A node kind that can live in a [`Document`].
pub trait OutputNode: Sized + 'static {
    /// What template code appends.
    type Atom;

    /// Invisible range boundary.
    fn anchor() -> Self;

    /// Stand-in for an empty dynamic range.
    fn placeholder() -> Self;

    /// Append `atom` at the appender's cursor.
    fn append(appender: &mut ListAppender<Self>, atom: Self::Atom) -> Result<Option<BoxedUpdater>>;
}

/// Ordered node storage with write statistics.
#[derive(Debug)]
pub struct Document<N> {
    nodes: IndexMap<NodeId, N>,
    clears: usize,
    writes: usize,
}

/// Shared handle to a document.
pub type SharedDocument<N> = Rc<RefCell<Document<N>>>;

impl<N> Document<N> {
    pub fn new() -> Self {
        Self {
            nodes: IndexMap::new(),
            clears: 0,
            writes: 0,
        }
    }

    pub fn shared() -> SharedDocument<N> {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Nodes in document order.
    pub fn nodes(&self) -> impl Iterator<Item = &N> {
        self.nodes.values()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of ranges cleared so far.
    pub fn clears(&self) -> usize {
        self.clears
    }

    /// Number of in-place node rewrites so far.
    pub fn writes(&self) -> usize {
        self.writes
    }

    fn index_of(&self, id: NodeId) -> Result<usize> {
        self.nodes
            .get_index_of(&id)
            .ok_or(RenderError::DetachedNode(id))
    }

    /// Index a cursor bound refers to; `None` means the end.
    fn position(&self, before: Option<NodeId>) -> Result<usize> {
        match before {
            Some(id) => self.index_of(id),
            None => Ok(self.nodes.len()),
        }
    }

    fn insert_before(&mut self, before: Option<NodeId>, node: N) -> Result<NodeId> {
        let index = self.position(before)?;
        let id = NodeId::new();
        self.nodes.shift_insert(index, id, node);
        Ok(id)
    }

    fn replace(&mut self, id: NodeId, node: N) -> Result<()> {
        let slot = self
            .nodes
            .get_mut(&id)
            .ok_or(RenderError::DetachedNode(id))?;
        *slot = node;
        self.writes += 1;
        Ok(())
    }

    /// Count the nodes strictly between `start` and `end`.
    fn span(&self, start: Option<NodeId>, end: Option<NodeId>) -> Result<usize> {
        let lo = match start {
            Some(id) => self.index_of(id)? + 1,
            None => 0,
        };
        Ok(self.position(end)?.saturating_sub(lo))
    }

    /// Remove the nodes strictly between `start` and `end`.
    fn remove_between(&mut self, start: Option<NodeId>, end: Option<NodeId>) -> Result<()> {
        let lo = match start {
            Some(id) => self.index_of(id)? + 1,
            None => 0,
        };
        let hi = self.position(end)?;
        if lo < hi {
            self.nodes.drain(lo..hi);
        }
        self.clears += 1;
        Ok(())
    }
}

impl<N> Default for Document<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// A position in a document.
pub struct ListCursor<N> {
    doc: SharedDocument<N>,
    /// Leading anchor of the enclosing dynamic range, if any.
    start: Option<NodeId>,
    /// Node to insert before; `None` appends at the end.
    before: Option<NodeId>,
}

impl<N> ListCursor<N> {
    /// A cursor at the end of `doc`.
    pub fn end_of(doc: &SharedDocument<N>) -> Self {
        Self {
            doc: Rc::clone(doc),
            start: None,
            before: None,
        }
    }

    pub fn document(&self) -> &SharedDocument<N> {
        &self.doc
    }

    /// Insert `node` at this position.
    pub fn insert(&self, node: N) -> Result<NodeId> {
        self.doc.borrow_mut().insert_before(self.before, node)
    }
}

impl<N> Clone for ListCursor<N> {
    fn clone(&self) -> Self {
        Self {
            doc: Rc::clone(&self.doc),
            start: self.start,
            before: self.before,
        }
    }
}

impl<N> fmt::Debug for ListCursor<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListCursor")
            .field("start", &self.start)
            .field("before", &self.before)
            .finish()
    }
}

/// Nodes written by one finalized appender.
pub struct ListRange<N> {
    doc: SharedDocument<N>,
    start: Option<NodeId>,
    end: Option<NodeId>,
}

impl<N> Range for ListRange<N> {
    type Cursor = ListCursor<N>;

    fn clear(self) -> Result<ListCursor<N>> {
        self.doc.borrow_mut().remove_between(self.start, self.end)?;
        Ok(ListCursor {
            doc: self.doc,
            start: self.start,
            before: self.end,
        })
    }
}

impl<N> fmt::Debug for ListRange<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListRange")
            .field("start", &self.start)
            .field("end", &self.end)
            .finish()
    }
}

/// Appender over a [`Document`].
pub struct ListAppender<N> {
    cursor: ListCursor<N>,
    placeholder: bool,
}

impl<N: OutputNode> ListAppender<N> {
    /// An appender for a structured child that is never cleared on its own
    /// and never needs a placeholder.
    pub fn nested(cursor: ListCursor<N>) -> Self {
        Self {
            cursor,
            placeholder: false,
        }
    }

    /// Insert a raw node at the cursor.
    pub fn push(&mut self, node: N) -> Result<NodeId> {
        self.cursor.insert(node)
    }

    /// Append a node whose content follows `value`.
    ///
    /// `make` builds the node from each new value.
    pub fn push_var<V, F>(&mut self, value: Var<V>, make: F) -> Result<Option<BoxedUpdater>>
    where
        V: Clone + PartialEq + 'static,
        F: Fn(&V) -> N + 'static,
    {
        let slot = NodeSlot {
            cursor: self.cursor.clone(),
            id: None,
            make,
        };
        Effect::install(move || value.current(), slot)
    }
}

impl<N: OutputNode> RegionAppender for ListAppender<N> {
    type Cursor = ListCursor<N>;
    type Atom = N::Atom;
    type Range = ListRange<N>;

    fn at(cursor: ListCursor<N>) -> Self {
        let placeholder = cursor.start.is_some();
        Self {
            cursor,
            placeholder,
        }
    }

    fn atom(&mut self, atom: N::Atom) -> Result<Option<BoxedUpdater>> {
        N::append(self, atom)
    }

    fn cursor(&self) -> ListCursor<N> {
        self.cursor.clone()
    }

    fn child(&mut self) -> Result<Self> {
        let start = self.push(N::anchor())?;
        let end = self.push(N::anchor())?;
        Ok(Self {
            cursor: ListCursor {
                doc: Rc::clone(&self.cursor.doc),
                start: Some(start),
                before: Some(end),
            },
            placeholder: true,
        })
    }

    fn finalize(mut self) -> Result<ListRange<N>> {
        if self.placeholder {
            let empty = self
                .cursor
                .doc
                .borrow()
                .span(self.cursor.start, self.cursor.before)?
                == 0;
            if empty {
                self.push(N::placeholder())?;
            }
        }
        Ok(ListRange {
            doc: self.cursor.doc,
            start: self.cursor.start,
            end: self.cursor.before,
        })
    }
}

/// Effect hooks that keep one document node in sync with a value.
struct NodeSlot<N, F> {
    cursor: ListCursor<N>,
    id: Option<NodeId>,
    make: F,
}

impl<N, V, F> EffectHooks<V> for NodeSlot<N, F>
where
    F: Fn(&V) -> N,
{
    fn initialize(&mut self, value: &V) -> Result<()> {
        self.id = Some(self.cursor.insert((self.make)(value))?);
        Ok(())
    }

    fn update(&mut self, value: &V) -> Result<()> {
        let id = self.id.ok_or(RenderError::Uninitialized)?;
        self.cursor
            .doc
            .borrow_mut()
            .replace(id, (self.make)(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum Node {
        Item(u32),
        Anchor,
        Empty,
    }

    impl OutputNode for Node {
        type Atom = Var<u32>;

        fn anchor() -> Self {
            Node::Anchor
        }

        fn placeholder() -> Self {
            Node::Empty
        }

        fn append(appender: &mut ListAppender<Self>, atom: Var<u32>) -> Result<Option<BoxedUpdater>> {
            appender.push_var(atom, |v| Node::Item(*v))
        }
    }

    fn snapshot(doc: &SharedDocument<Node>) -> Vec<Node> {
        doc.borrow().nodes().cloned().collect()
    }

    #[test]
    fn node_ids_are_unique() {
        assert_ne!(NodeId::new(), NodeId::new());
    }

    #[test]
    fn appends_in_order() {
        let doc = Document::shared();
        let mut appender = ListAppender::at(ListCursor::end_of(&doc));

        appender.push(Node::Item(1)).unwrap();
        appender.push(Node::Item(2)).unwrap();

        assert_eq!(snapshot(&doc), vec![Node::Item(1), Node::Item(2)]);
    }

    #[test]
    fn child_content_lands_between_anchors() {
        let doc = Document::shared();
        let mut parent = ListAppender::at(ListCursor::end_of(&doc));

        parent.push(Node::Item(1)).unwrap();
        let mut child = parent.child().unwrap();
        parent.push(Node::Item(3)).unwrap();
        child.push(Node::Item(2)).unwrap();
        child.finalize().unwrap();

        assert_eq!(
            snapshot(&doc),
            vec![
                Node::Item(1),
                Node::Anchor,
                Node::Item(2),
                Node::Anchor,
                Node::Item(3)
            ]
        );
    }

    #[test]
    fn empty_child_gets_placeholder() {
        let doc = Document::shared();
        let mut parent = ListAppender::at(ListCursor::end_of(&doc));

        parent.child().unwrap().finalize().unwrap();

        assert_eq!(snapshot(&doc), vec![Node::Anchor, Node::Empty, Node::Anchor]);
    }

    #[test]
    fn clear_keeps_anchors_and_returns_cursor_inside() {
        let doc = Document::shared();
        let mut parent = ListAppender::at(ListCursor::end_of(&doc));

        let mut child = parent.child().unwrap();
        child.push(Node::Item(1)).unwrap();
        parent.push(Node::Item(9)).unwrap();
        let range = child.finalize().unwrap();

        let cursor = range.clear().unwrap();
        assert_eq!(doc.borrow().clears(), 1);
        assert_eq!(snapshot(&doc), vec![Node::Anchor, Node::Anchor, Node::Item(9)]);

        let mut refill = ListAppender::at(cursor);
        refill.push(Node::Item(5)).unwrap();
        refill.finalize().unwrap();
        assert_eq!(
            snapshot(&doc),
            vec![Node::Anchor, Node::Item(5), Node::Anchor, Node::Item(9)]
        );
    }

    #[test]
    fn var_atom_rewrites_its_node() {
        let doc = Document::shared();
        let mut appender = ListAppender::at(ListCursor::end_of(&doc));
        let value = crate::reactive::Signal::new(1);

        let updater = appender.atom(Var::from(value.clone())).unwrap().unwrap();
        value.set(2);
        updater.poll().unwrap();

        assert_eq!(snapshot(&doc), vec![Node::Item(2)]);
        assert_eq!(doc.borrow().writes(), 1);
    }

    #[test]
    fn detached_cursor_is_an_error() {
        let doc = Document::shared();
        let mut parent = ListAppender::at(ListCursor::end_of(&doc));
        let child = parent.child().unwrap();
        let cursor = child.cursor();

        ListRange {
            doc: doc.clone(),
            start: None,
            end: None,
        }
        .clear()
        .unwrap();

        let err = cursor.insert(Node::Item(1)).unwrap_err();
        assert!(matches!(err, RenderError::DetachedNode(_)));
    }
}
