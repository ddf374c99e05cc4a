//! Trait definitions for Mingle operations.

mod list;

pub use list::List;
