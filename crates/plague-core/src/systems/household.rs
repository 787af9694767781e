//! Household exposure system - hourly infection risk for people sharing a
//! roof with the symptomatic

use std::collections::HashSet;

use hecs::World;
use plague_logic::config::EpidemicConfig;
use plague_logic::household::apply_household_exposure;
use plague_logic::npc::NpcHealth;
use plague_logic::status::AgentHealthState;

use crate::components::{HouseholdExposure, Player, Residence};

/// A citizen infected at home during one household pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HouseholdInfection {
    pub agent_id: u64,
    pub building_id: u32,
}

/// Buildings with at least one symptomatic resident, NPC or player.
pub fn buildings_with_sick(world: &World) -> HashSet<u32> {
    let mut sick = HashSet::new();
    for (_, (health, residence)) in world.query::<(&NpcHealth, &Residence)>().iter() {
        if health.state == AgentHealthState::Infected {
            sick.insert(residence.building_id);
        }
    }
    for (_, (player, residence)) in world.query::<(&Player, &Residence)>().iter() {
        if player.status.state == AgentHealthState::Infected {
            sick.insert(residence.building_id);
        }
    }
    sick
}

/// Accumulate exposure for healthy residents of sick households and roll
/// infection for each.
///
/// `elapsed_hours` is the time since the previous pass. Residents of
/// households with no symptomatic occupant have their exposure cleared.
pub fn household_exposure_system(
    world: &mut World,
    sim_time: f64,
    elapsed_hours: f64,
    seed_offset: u64,
    config: &EpidemicConfig,
) -> Vec<HouseholdInfection> {
    let sick = buildings_with_sick(world);
    let mut infections = Vec::new();

    for (_, (health, residence, exposure)) in
        world.query_mut::<(&mut NpcHealth, &Residence, &mut HouseholdExposure)>()
    {
        if health.state != AgentHealthState::Healthy || !sick.contains(&residence.building_id) {
            exposure.hours = 0.0;
            continue;
        }

        exposure.hours += elapsed_hours.max(0.0);
        if apply_household_exposure(health, sim_time, exposure.hours, seed_offset, config) {
            exposure.hours = 0.0;
            infections.push(HouseholdInfection {
                agent_id: health.agent_id,
                building_id: residence.building_id,
            });
        }
    }

    infections
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Citizen;

    const HOUR: f64 = 3600.0;

    fn resident(world: &mut World, agent_id: u64, building_id: u32, state: AgentHealthState) {
        let mut health = NpcHealth::healthy(agent_id);
        health.state = state;
        world.spawn((
            Citizen { agent_id },
            health,
            Residence { building_id },
            HouseholdExposure::default(),
        ));
    }

    #[test]
    fn test_only_sick_households_accumulate() {
        let config = EpidemicConfig::default();
        let mut world = World::new();
        resident(&mut world, 1, 10, AgentHealthState::Infected);
        resident(&mut world, 2, 10, AgentHealthState::Healthy);
        resident(&mut world, 3, 20, AgentHealthState::Healthy);

        household_exposure_system(&mut world, HOUR, 1.0, 0, &config);

        for (_, (health, exposure)) in world.query::<(&NpcHealth, &HouseholdExposure)>().iter() {
            match health.agent_id {
                3 => assert_eq!(exposure.hours, 0.0),
                2 if health.state == AgentHealthState::Healthy => assert_eq!(exposure.hours, 1.0),
                _ => assert_eq!(exposure.hours, 0.0),
            }
        }
    }

    #[test]
    fn test_incubating_occupant_is_not_contagious() {
        let config = EpidemicConfig::default();
        let mut world = World::new();
        resident(&mut world, 1, 10, AgentHealthState::Incubating);
        resident(&mut world, 2, 10, AgentHealthState::Healthy);
        assert!(buildings_with_sick(&world).is_empty());
        let infections = household_exposure_system(&mut world, HOUR, 24.0, 0, &config);
        assert!(infections.is_empty());
    }

    #[test]
    fn test_sick_player_exposes_household() {
        let mut world = World::new();
        let mut player = Player::default();
        player.status.state = AgentHealthState::Infected;
        world.spawn((player, Residence { building_id: 7 }));
        assert!(buildings_with_sick(&world).contains(&7));
    }

    #[test]
    fn test_long_exposure_spreads_through_household() {
        let config = EpidemicConfig::default();
        let mut world = World::new();
        resident(&mut world, 1, 10, AgentHealthState::Infected);
        for id in 2..12 {
            resident(&mut world, id, 10, AgentHealthState::Healthy);
        }

        let mut infected = Vec::new();
        for hour in 1..=48u64 {
            let found = household_exposure_system(&mut world, hour as f64 * HOUR, 1.0, hour, &config);
            infected.extend(found);
        }
        // Cumulative hourly risk makes escape over two days very unlikely.
        assert!(infected.len() >= 9, "infected {}", infected.len());
        assert!(infected.iter().all(|i| i.building_id == 10));
    }
}
