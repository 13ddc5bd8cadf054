//! Protocol constants and version definitions.
//!
//! This module has no I/O and no dependencies on the rest of the crate.

mod constants;
mod version;

pub use constants::*;
pub use version::*;
