//! Household exposure - ambient risk from sharing a building with the sick.
//!
//! Exposure is coarse: hours spent under one roof with infected occupants,
//! not individual contacts. A successful draw seeds the NPC machine
//! directly, bypassing the flea/airborne/contact split.

use log::{debug, warn};

use crate::config::{EpidemicConfig, HouseholdConfig};
use crate::error::check_sim_time;
use crate::npc::{infect_npc, NpcHealth};
use crate::seed::{self, salts};
use crate::status::AgentHealthState;

/// Infection probability for `exposure_hours` of cumulative exposure:
/// `min(cap, rate × hours)`.
pub fn household_infection_probability(exposure_hours: f64, config: &HouseholdConfig) -> f64 {
    if !(exposure_hours > 0.0) {
        return 0.0;
    }
    (config.rate_per_hour * exposure_hours).min(config.max_probability)
}

/// Roll household infection for one NPC. Returns whether it was infected.
///
/// The draw is keyed on the agent id, the time and `seed_offset`, so a
/// replay with the same inputs infects the same agents.
pub fn apply_household_exposure(
    agent: &mut NpcHealth,
    sim_time: f64,
    exposure_hours: f64,
    seed_offset: u64,
    config: &EpidemicConfig,
) -> bool {
    if agent.state != AgentHealthState::Healthy {
        return false;
    }
    let sim_time = match check_sim_time(sim_time) {
        Ok(t) => t,
        Err(e) => {
            warn!("household exposure of agent {} ignored: {e}", agent.agent_id);
            return false;
        }
    };

    let probability = household_infection_probability(exposure_hours, &config.household);
    if probability <= 0.0 {
        return false;
    }

    let agent_seed = seed::agent_seed(agent.agent_id, sim_time, seed_offset);
    if seed::roll(agent_seed, salts::HOUSEHOLD) >= probability {
        return false;
    }

    debug!(
        "agent {} caught plague at home after {exposure_hours:.1} h exposure",
        agent.agent_id
    );
    infect_npc(agent, agent_seed, sim_time, config)
}
