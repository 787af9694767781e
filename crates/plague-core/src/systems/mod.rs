//! Systems - logic that operates on components

mod buildings;
mod household;
mod npc_health;
mod player;

pub use buildings::*;
pub use household::*;
pub use npc_health::*;
pub use player::*;
