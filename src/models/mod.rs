//! Mingle API model types.

mod card;

pub use card::*;
