//! Read-only views of the outbreak for UIs and the headless harness.

use plague_logic::building::BuildingInfectionState;
use plague_logic::labels::HealthLabel;
use plague_logic::status::{AgentHealthState, PlagueStatus};
use serde::{Deserialize, Serialize};

/// Head count by health state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Census {
    pub healthy: usize,
    pub incubating: usize,
    pub infected: usize,
    pub deceased: usize,
}

impl Census {
    pub fn from_counts(counts: [usize; 4]) -> Self {
        Self {
            healthy: counts[0],
            incubating: counts[1],
            infected: counts[2],
            deceased: counts[3],
        }
    }

    pub fn add(&mut self, state: AgentHealthState) {
        match state {
            AgentHealthState::Healthy => self.healthy += 1,
            AgentHealthState::Incubating => self.incubating += 1,
            AgentHealthState::Infected => self.infected += 1,
            AgentHealthState::Deceased => self.deceased += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.healthy + self.incubating + self.infected + self.deceased
    }

    pub fn living(&self) -> usize {
        self.total() - self.deceased
    }

    /// Everyone who has ever caught the plague.
    pub fn ever_infected(&self) -> usize {
        self.incubating + self.infected + self.deceased
    }
}

/// A marked building as shown on the town map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingMarker {
    pub id: u32,
    pub name: String,
    pub marker: BuildingInfectionState,
}

/// What the player sees of their own health.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerReport {
    pub label: HealthLabel,
    pub plague_type: String,
    pub symptoms: Vec<String>,
    pub status: PlagueStatus,
}

/// Point-in-time snapshot of the whole town.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TownSnapshot {
    pub town: Option<String>,
    pub sim_time: f64,
    pub day: f64,
    pub census: Census,
    pub buildings: Vec<BuildingMarker>,
    pub player: Option<PlayerReport>,
}

impl TownSnapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
