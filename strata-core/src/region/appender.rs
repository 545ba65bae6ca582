//! Contracts the core needs from an output backend.

use crate::error::Result;
use crate::update::BoxedUpdater;

/// A finalized, clearable slice of output.
pub trait Range {
    type Cursor;

    /// Remove everything in the range from the output and return a cursor
    /// where replacement content should go.
    ///
    /// Consumes the range, so a range can only ever be cleared once.
    fn clear(self) -> Result<Self::Cursor>;
}

/// An append-only writer positioned at a cursor in the output.
pub trait RegionAppender: Sized + 'static {
    type Cursor: Clone + 'static;
    type Atom;
    type Range: Range<Cursor = Self::Cursor> + 'static;

    /// Start appending at `cursor`.
    fn at(cursor: Self::Cursor) -> Self;

    /// Append one leaf atom and return the updater that keeps it current,
    /// if it can still change.
    fn atom(&mut self, atom: Self::Atom) -> Result<Option<BoxedUpdater>>;

    /// Position where the next atom will land.
    fn cursor(&self) -> Self::Cursor;

    /// Begin a nested region at the current cursor whose content can later
    /// be cleared on its own.
    fn child(&mut self) -> Result<Self>;

    /// Close the appender and return the range it wrote.
    fn finalize(self) -> Result<Self::Range>;
}

/// Adapts a parent appender into a structured child (for example an element
/// that takes attributes, then children) and folds it back in.
pub trait CursorAdapter<P: RegionAppender> {
    type Child: RegionAppender;
    type Head;

    /// Begin the structure at the parent's cursor.
    fn child(&self, parent: &mut P) -> Result<Self::Child>;

    /// Write one head item (an attribute, say) before any body content.
    fn head(&self, child: &mut Self::Child, head: Self::Head) -> Result<Option<BoxedUpdater>>;

    /// Finish the structure and leave the parent positioned after it.
    fn flush(&self, parent: &mut P, child: <Self::Child as RegionAppender>::Range) -> Result<()>;
}
