//! Building infection markers - per-building roll-up of occupant states.
//!
//! A report escalates a building to the worst state seen among its
//! occupants. Markers then fade one level toward `Clear` for every decay
//! window (6–12 simulated hours, fixed per building) without a fresh
//! sighting at that level.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::{BuildingDecayConfig, EpidemicConfig};
use crate::seed::{self, salts};
use crate::status::AgentHealthState;

/// Marker shown on a building.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BuildingStatus {
    #[default]
    Clear,
    Incubating,
    Infected,
    Deceased,
}

impl BuildingStatus {
    pub fn from_agent(state: AgentHealthState) -> Self {
        match state {
            AgentHealthState::Healthy => Self::Clear,
            AgentHealthState::Incubating => Self::Incubating,
            AgentHealthState::Infected => Self::Infected,
            AgentHealthState::Deceased => Self::Deceased,
        }
    }

    fn level(self) -> u8 {
        match self {
            Self::Clear => 0,
            Self::Incubating => 1,
            Self::Infected => 2,
            Self::Deceased => 3,
        }
    }

    fn from_level(level: u8) -> Self {
        match level {
            0 => Self::Clear,
            1 => Self::Incubating,
            2 => Self::Infected,
            _ => Self::Deceased,
        }
    }

    /// Step down `steps` levels, stopping at `Clear`.
    pub fn decayed(self, steps: u64) -> Self {
        let steps = u8::try_from(steps.min(3)).unwrap_or(3);
        Self::from_level(self.level().saturating_sub(steps))
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::Incubating => "incubating",
            Self::Infected => "infected",
            Self::Deceased => "deceased",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BuildingInfectionState {
    pub status: BuildingStatus,
    /// Last time the current status was confirmed by an occupant report.
    pub last_seen_sim_time: f64,
}

impl BuildingInfectionState {
    pub const CLEAR: Self = Self {
        status: BuildingStatus::Clear,
        last_seen_sim_time: 0.0,
    };
}

/// Narrow interface to the building marker aggregator.
pub trait BuildingInfectionAggregator {
    /// Fold one occupant's state into its building's marker.
    fn report_occupant(
        &mut self,
        building_id: u32,
        state: AgentHealthState,
        sim_time: f64,
    ) -> BuildingInfectionState;

    /// Marker as it reads at `sim_time`, after decay.
    fn status_at(&self, building_id: u32, sim_time: f64) -> BuildingInfectionState;
}

/// Default aggregator with per-building decay windows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecayingBuildingTracker {
    buildings: BTreeMap<u32, BuildingInfectionState>,
    decay: BuildingDecayConfig,
    hour_length: f64,
}

impl DecayingBuildingTracker {
    pub fn new(config: &EpidemicConfig) -> Self {
        Self {
            buildings: BTreeMap::new(),
            decay: config.buildings,
            hour_length: config.hour_length(),
        }
    }

    /// Decay window for a building, in hours. Stable for a given id.
    pub fn decay_window_hours(&self, building_id: u32) -> f64 {
        let fraction = seed::roll(u64::from(building_id), salts::BUILDING);
        self.decay.min_decay_hours
            + (self.decay.max_decay_hours - self.decay.min_decay_hours) * fraction
    }

    /// Apply elapsed decay windows to a stored marker.
    ///
    /// Each full window steps the marker down one level and moves the
    /// confirmation time forward by one window, so a partially elapsed
    /// window carries over to the next read.
    fn settled(&self, building_id: u32, stored: BuildingInfectionState, sim_time: f64) -> BuildingInfectionState {
        if stored.status == BuildingStatus::Clear {
            return stored;
        }
        let window = self.decay_window_hours(building_id) * self.hour_length;
        let elapsed = sim_time - stored.last_seen_sim_time;
        if !(window > 0.0) || !(elapsed >= window) {
            return stored;
        }
        let steps = (elapsed / window).floor() as u64;
        BuildingInfectionState {
            status: stored.status.decayed(steps),
            last_seen_sim_time: stored.last_seen_sim_time + steps as f64 * window,
        }
    }

    /// Buildings currently showing anything other than `Clear`.
    pub fn marked(&self, sim_time: f64) -> Vec<(u32, BuildingInfectionState)> {
        self.buildings
            .keys()
            .map(|&id| (id, self.status_at(id, sim_time)))
            .filter(|(_, state)| state.status != BuildingStatus::Clear)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.buildings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buildings.is_empty()
    }
}

impl BuildingInfectionAggregator for DecayingBuildingTracker {
    fn report_occupant(
        &mut self,
        building_id: u32,
        state: AgentHealthState,
        sim_time: f64,
    ) -> BuildingInfectionState {
        let current = self.status_at(building_id, sim_time);
        let reported = BuildingStatus::from_agent(state);
        if reported == BuildingStatus::Clear || reported < current.status {
            if current.status != BuildingStatus::Clear {
                self.buildings.insert(building_id, current);
            }
            return current;
        }

        let next = BuildingInfectionState {
            status: reported,
            last_seen_sim_time: sim_time,
        };
        self.buildings.insert(building_id, next);
        next
    }

    fn status_at(&self, building_id: u32, sim_time: f64) -> BuildingInfectionState {
        match self.buildings.get(&building_id) {
            Some(stored) => self.settled(building_id, *stored, sim_time),
            None => BuildingInfectionState::CLEAR,
        }
    }
}
