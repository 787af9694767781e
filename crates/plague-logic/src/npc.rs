//! NPC progression - hour-scaled, two-threshold analog of the player machine.
//!
//! Each NPC carries only a subtype and two sampled thresholds. Advancing an
//! NPC is two comparisons, which keeps a whole town's tick O(1) per agent.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::config::EpidemicConfig;
use crate::curve::DiseaseCurve;
use crate::error::check_sim_time;
use crate::profile::DiseaseSubtype;
use crate::seed::{self, salts};
use crate::status::AgentHealthState;

/// Compact plague record for one NPC. Sampled once at infection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NpcPlagueMeta {
    pub subtype: DiseaseSubtype,
    pub exposure_time: f64,
    /// Hours from exposure to onset.
    pub incubation_hours: f64,
    /// Hours from onset to death.
    pub death_hours: f64,
    pub onset_time: Option<f64>,
}

/// Health component for one NPC.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NpcHealth {
    /// Stable identity, used for seeding.
    pub agent_id: u64,
    pub state: AgentHealthState,
    pub plague: Option<NpcPlagueMeta>,
}

impl NpcHealth {
    pub fn healthy(agent_id: u64) -> Self {
        Self {
            agent_id,
            state: AgentHealthState::Healthy,
            plague: None,
        }
    }
}

/// Sample a fresh NPC plague record.
///
/// The subtype follows the non-airborne 80/15/5 split; the thresholds are
/// the subtype's curve compressed into hours and clamped.
pub fn create_npc_plague_meta(seed: u64, sim_time: f64, config: &EpidemicConfig) -> NpcPlagueMeta {
    let mut rng = seed::rng_for(seed, salts::NPC_META);
    let subtype = DiseaseSubtype::from_weighted_roll(rand::Rng::gen(&mut rng));
    let (incubation_hours, death_hours) = match DiseaseCurve::for_subtype(subtype) {
        Some(curve) => {
            let b = curve.sample_npc_boundaries(&mut rng, &config.npc);
            (b.incubation_hours, b.death_hours)
        }
        None => (config.npc.incubation_max_hours, config.npc.death_max_hours),
    };

    NpcPlagueMeta {
        subtype,
        exposure_time: sim_time,
        incubation_hours,
        death_hours,
        onset_time: None,
    }
}

/// Infect a healthy NPC directly. Returns whether the NPC was infected.
pub fn infect_npc(agent: &mut NpcHealth, seed: u64, sim_time: f64, config: &EpidemicConfig) -> bool {
    if agent.state != AgentHealthState::Healthy {
        return false;
    }
    let sim_time = match check_sim_time(sim_time) {
        Ok(t) => t,
        Err(e) => {
            warn!("infection of agent {} ignored: {e}", agent.agent_id);
            return false;
        }
    };
    let meta = create_npc_plague_meta(seed, sim_time, config);
    debug!(
        "agent {} infected with {:?} (incubation {:.1} h, death {:.1} h)",
        agent.agent_id, meta.subtype, meta.incubation_hours, meta.death_hours
    );
    agent.plague = Some(meta);
    agent.state = AgentHealthState::Incubating;
    true
}

/// Advance one NPC. Returns `true` if its state changed.
///
/// At most one transition happens per call. Agents placed into a sick state
/// without metadata have it sampled on first sight, with the clock starting
/// at `sim_time`.
pub fn advance_npc_health(agent: &mut NpcHealth, sim_time: f64, config: &EpidemicConfig) -> bool {
    if agent.state.is_inert() {
        return false;
    }
    let sim_time = match check_sim_time(sim_time) {
        Ok(t) => t,
        Err(e) => {
            warn!("progression of agent {} ignored: {e}", agent.agent_id);
            return false;
        }
    };

    let agent_id = agent.agent_id;
    let meta = agent.plague.get_or_insert_with(|| {
        let seed = seed::agent_seed(agent_id, sim_time, salts::BACKFILL);
        debug!("agent {agent_id} backfilled plague metadata");
        create_npc_plague_meta(seed, sim_time, config)
    });

    match agent.state {
        AgentHealthState::Incubating => {
            let elapsed = config.seconds_to_hours((sim_time - meta.exposure_time).max(0.0));
            if elapsed >= meta.incubation_hours {
                meta.onset_time = Some(sim_time);
                agent.state = AgentHealthState::Infected;
                return true;
            }
        }
        AgentHealthState::Infected => {
            let onset = *meta.onset_time.get_or_insert(sim_time);
            let elapsed = config.seconds_to_hours((sim_time - onset).max(0.0));
            if elapsed >= meta.death_hours {
                agent.state = AgentHealthState::Deceased;
                return true;
            }
        }
        AgentHealthState::Healthy | AgentHealthState::Deceased => {}
    }
    false
}
