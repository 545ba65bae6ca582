//! Regions and the backend contracts they write through.
//!
//! - [`RegionAppender`], [`Range`] and [`CursorAdapter`] are implemented by
//!   output backends.
//! - [`Region`] is handed to template code while a block renders.
//! - [`OpenRegion`] builds structured children (head, then body).

mod appender;
mod open;
mod output;

pub use appender::{CursorAdapter, Range, RegionAppender};
pub use open::{OpenRegion, Phase};
pub use output::{Region, Rendered};
