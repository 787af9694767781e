//! Plague Core - Town Epidemic Engine
//!
//! An ECS-based simulation of a plague outbreak in a town of a few hundred
//! to several thousand citizens, plus one player simulated in full detail.
//!
//! # Architecture
//!
//! The simulation uses an Entity Component System (ECS) architecture via `hecs`:
//! - **Entities**: Citizens, the player, buildings
//! - **Components**: Pure data attached to entities (NpcHealth, Residence, Player, etc.)
//! - **Systems**: Logic that queries components and calls into `plague-logic`
//!
//! # Example
//!
//! ```rust,no_run
//! use plague_core::prelude::*;
//! use plague_core::generation::TownConfig;
//!
//! let mut engine = EpidemicEngine::new(EpidemicConfig::default(), 7).expect("default config");
//! engine.generate(TownConfig::default());
//! engine.seed_infection(1).expect("agent 1 exists");
//!
//! // Run for three days in ten minute steps
//! for _ in 0..(3 * 24 * 6) {
//!     engine.update(600.0);
//! }
//! println!("{:?}", engine.census());
//! ```

pub mod components;
pub mod engine;
pub mod generation;
pub mod persistence;
pub mod report;
pub mod systems;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::*;
    pub use crate::engine::EpidemicEngine;
    pub use crate::report::{Census, TownSnapshot};
    pub use plague_logic::config::EpidemicConfig;
    pub use plague_logic::exposure::ExposureKind;
    pub use plague_logic::treatment::TreatmentKind;
}
