//! Generation - procedural creation of towns and their households.

mod names;
mod town;

pub use names::*;
pub use town::*;
