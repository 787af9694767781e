//! Component definitions for the ECS simulation.
//!
//! Components are pure data structs attached to entities.
//! They have no behavior - that lives in systems and in `plague-logic`.

mod people;
mod town;

pub use people::*;
pub use town::*;

/// NPC health is stored on the entity as-is.
pub use plague_logic::npc::{NpcHealth, NpcPlagueMeta};
