//! People-related components: Citizen, Name, Residence, Player, exposure.

use plague_logic::status::PlagueStatus;
use serde::{Deserialize, Serialize};

/// A townsperson simulated with the compact NPC machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Citizen {
    /// Stable id used for seeding and lookup. Never reused.
    pub agent_id: u64,
}

/// Person name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Name {
    pub given: String,
    pub family: String,
}

impl Name {
    pub fn new(given: impl Into<String>, family: impl Into<String>) -> Self {
        Self {
            given: given.into(),
            family: family.into(),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.given, self.family)
    }
}

/// The building an agent sleeps in. Household exposure is shared per building.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Residence {
    pub building_id: u32,
}

/// Cumulative hours a healthy citizen has spent under one roof with the sick.
///
/// Reset once the household has no sick occupants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HouseholdExposure {
    pub hours: f64,
}

/// The single full-fidelity agent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub status: PlagueStatus,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            status: PlagueStatus::healthy(),
        }
    }
}
