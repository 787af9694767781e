//! Player system - full-fidelity progression for the player entity

use hecs::World;
use log::info;
use plague_logic::config::EpidemicConfig;
use plague_logic::labels::health_status_label;
use plague_logic::player::progress_plague;

use super::HealthTransition;
use crate::components::{Citizen, Player, Residence};

/// Progress the player. Returns the transition, if one happened.
pub fn player_progress_system(
    world: &mut World,
    sim_time: f64,
    config: &EpidemicConfig,
) -> Vec<HealthTransition> {
    let mut transitions = Vec::new();

    for (entity, (player, citizen, residence)) in
        world.query_mut::<(&mut Player, Option<&Citizen>, Option<&Residence>)>()
    {
        let from = player.status.state;
        player.status = progress_plague(player.status, sim_time, config);
        if player.status.state != from {
            info!(
                "player is now {:?} ({})",
                player.status.state,
                health_status_label(&player.status)
            );
            transitions.push(HealthTransition {
                entity,
                agent_id: citizen.map(|c| c.agent_id).unwrap_or_default(),
                building_id: residence.map(|r| r.building_id),
                from,
                to: player.status.state,
                sim_time,
            });
        }
    }

    transitions
}
