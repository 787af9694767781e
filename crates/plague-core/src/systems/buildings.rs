//! Building marker system - feeds occupant health into the aggregator

use hecs::World;
use plague_logic::building::BuildingInfectionAggregator;
use plague_logic::npc::NpcHealth;
use plague_logic::status::AgentHealthState;

use super::HealthTransition;
use crate::components::{Player, Residence};

/// Report every transition whose agent has a residence.
pub fn report_transitions(
    aggregator: &mut impl BuildingInfectionAggregator,
    transitions: &[HealthTransition],
) {
    for t in transitions {
        if let Some(building_id) = t.building_id {
            aggregator.report_occupant(building_id, t.to, t.sim_time);
        }
    }
}

/// Re-report the living sick so their buildings stay marked.
///
/// The dead are reported once, at the transition, and then left to decay.
/// Returns the number of reports made.
pub fn building_refresh_system(
    world: &World,
    aggregator: &mut impl BuildingInfectionAggregator,
    sim_time: f64,
) -> usize {
    let mut reports = 0;
    for (_, (health, residence)) in world.query::<(&NpcHealth, &Residence)>().iter() {
        if health.state.is_sick() {
            aggregator.report_occupant(residence.building_id, health.state, sim_time);
            reports += 1;
        }
    }
    for (_, (player, residence)) in world.query::<(&Player, &Residence)>().iter() {
        if player.status.state.is_sick() {
            aggregator.report_occupant(residence.building_id, player.status.state, sim_time);
            reports += 1;
        }
    }
    reports
}

/// Report a single agent directly, e.g. after an out-of-tick infection.
pub fn report_agent(
    aggregator: &mut impl BuildingInfectionAggregator,
    building_id: Option<u32>,
    state: AgentHealthState,
    sim_time: f64,
) {
    if let Some(building_id) = building_id {
        aggregator.report_occupant(building_id, state, sim_time);
    }
}
