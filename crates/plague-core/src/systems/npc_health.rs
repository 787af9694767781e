//! NPC health system - advances every citizen's plague thresholds

use hecs::{Entity, World};
use plague_logic::config::EpidemicConfig;
use plague_logic::npc::{advance_npc_health, NpcHealth};
use plague_logic::status::AgentHealthState;

use crate::components::{Citizen, Residence};

/// One state change observed during a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HealthTransition {
    pub entity: Entity,
    pub agent_id: u64,
    /// Residence of the agent, if it has one.
    pub building_id: Option<u32>,
    pub from: AgentHealthState,
    pub to: AgentHealthState,
    pub sim_time: f64,
}

impl HealthTransition {
    pub fn is_death(&self) -> bool {
        self.to == AgentHealthState::Deceased
    }
}

/// Advance every NPC at `sim_time`. Returns the transitions that happened.
pub fn npc_health_system(
    world: &mut World,
    sim_time: f64,
    config: &EpidemicConfig,
) -> Vec<HealthTransition> {
    let mut transitions = Vec::new();

    for (entity, (health, residence)) in
        world.query_mut::<(&mut NpcHealth, Option<&Residence>)>()
    {
        let from = health.state;
        if advance_npc_health(health, sim_time, config) {
            transitions.push(HealthTransition {
                entity,
                agent_id: health.agent_id,
                building_id: residence.map(|r| r.building_id),
                from,
                to: health.state,
                sim_time,
            });
        }
    }

    transitions
}

/// Count citizens in each health state.
pub fn count_npc_states(world: &World) -> [usize; 4] {
    let mut counts = [0usize; 4];
    for (_, (_, health)) in world.query::<(&Citizen, &NpcHealth)>().iter() {
        counts[usize::from(health.state.stage())] += 1;
    }
    counts
}
