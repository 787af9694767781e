//! Town generation - buildings and the households that live in them
//!
//! A stand-in for a full city generator: it only produces the facts the
//! epidemic needs, namely which building each citizen sleeps in.

use hecs::{Entity, World};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::names::{generate_family_name, generate_given_name, generate_name, generate_tavern_name};
use crate::components::*;

/// Configuration for town generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TownConfig {
    pub name: String,
    pub households: u32,
    pub min_household_size: u32,
    pub max_household_size: u32,
    pub taverns: u32,
    pub churches: u32,
    pub workshops: u32,
    pub markets: u32,
}

impl Default for TownConfig {
    fn default() -> Self {
        Self {
            name: "Ashford".to_string(),
            households: 40,
            min_household_size: 2,
            max_household_size: 6,
            taverns: 2,
            churches: 1,
            workshops: 4,
            markets: 1,
        }
    }
}

impl TownConfig {
    /// A town sized to hold roughly `population` citizens.
    pub fn with_population(population: u32) -> Self {
        let base = Self::default();
        let mean = (base.min_household_size + base.max_household_size) / 2;
        Self {
            households: (population / mean.max(1)).max(1),
            workshops: (population / 50).max(1),
            taverns: (population / 100).max(1),
            ..base
        }
    }
}

/// Generated town layout
#[derive(Debug, Clone)]
pub struct TownLayout {
    pub name: String,
    pub buildings: Vec<Entity>,
    pub citizens: Vec<Entity>,
}

/// Next unused agent and building ids in a world.
pub fn next_ids(world: &World) -> (u64, u32) {
    let next_agent = world
        .query::<&Citizen>()
        .iter()
        .map(|(_, c)| c.agent_id + 1)
        .max()
        .unwrap_or(1);
    let next_building = world
        .query::<&Building>()
        .iter()
        .map(|(_, b)| b.id + 1)
        .max()
        .unwrap_or(1);
    (next_agent, next_building)
}

/// Spawn one healthy citizen living in `building_id`.
pub fn spawn_resident(world: &mut World, agent_id: u64, name: Name, building_id: Option<u32>) -> Entity {
    let entity = world.spawn((
        Citizen { agent_id },
        name,
        NpcHealth::healthy(agent_id),
        HouseholdExposure::default(),
    ));
    if let Some(building_id) = building_id {
        // Entity was just spawned.
        let _ = world.insert_one(entity, Residence { building_id });
    }
    entity
}

/// Generate a town's buildings and residents.
///
/// Ids continue from whatever the world already holds, so repeated calls
/// never reuse an agent or building id.
pub fn generate_town(world: &mut World, config: &TownConfig, rng: &mut impl Rng) -> TownLayout {
    let (mut next_agent, mut next_building) = next_ids(world);
    let mut buildings = Vec::new();
    let mut citizens = Vec::new();

    let min_size = config.min_household_size.max(1);
    let max_size = config.max_household_size.max(min_size);

    for _ in 0..config.households {
        let family = generate_family_name(rng);
        let size = rng.gen_range(min_size..=max_size);
        let id = next_building;
        next_building += 1;

        buildings.push(world.spawn((Building::new(
            id,
            format!("{family} house"),
            BuildingKind::House,
            max_size,
        ),)));

        for _ in 0..size {
            let name = Name::new(generate_given_name(rng), family);
            citizens.push(spawn_resident(world, next_agent, name, Some(id)));
            next_agent += 1;
        }
    }

    for _ in 0..config.taverns {
        let id = next_building;
        next_building += 1;
        buildings.push(world.spawn((Building::new(
            id,
            generate_tavern_name(rng),
            BuildingKind::Tavern,
            4,
        ),)));

        // The keeper and one lodger.
        for _ in 0..rng.gen_range(1..=2) {
            citizens.push(spawn_resident(world, next_agent, generate_name(rng), Some(id)));
            next_agent += 1;
        }
    }

    let civic = [
        (config.churches, BuildingKind::Church),
        (config.workshops, BuildingKind::Workshop),
        (config.markets, BuildingKind::Market),
    ];
    for (count, kind) in civic {
        for n in 0..count {
            let id = next_building;
            next_building += 1;
            let name = if count > 1 {
                format!("{} {}", kind.name(), n + 1)
            } else {
                kind.name().to_string()
            };
            buildings.push(world.spawn((Building::new(id, name, kind, 0),)));
        }
    }

    TownLayout {
        name: config.name.clone(),
        buildings,
        citizens,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generate_town_counts() {
        let mut world = World::new();
        let mut rng = StdRng::seed_from_u64(3);
        let config = TownConfig {
            households: 10,
            min_household_size: 3,
            max_household_size: 3,
            taverns: 1,
            churches: 1,
            workshops: 2,
            markets: 0,
            ..Default::default()
        };

        let layout = generate_town(&mut world, &config, &mut rng);
        assert_eq!(layout.buildings.len(), 14);
        assert!((31..=32).contains(&layout.citizens.len()));

        for &entity in &layout.citizens {
            assert!(world.get::<&Residence>(entity).is_ok());
            assert!(world.get::<&NpcHealth>(entity).is_ok());
        }
    }

    #[test]
    fn test_ids_unique_across_calls() {
        let mut world = World::new();
        let mut rng = StdRng::seed_from_u64(5);
        generate_town(&mut world, &TownConfig::default(), &mut rng);
        generate_town(&mut world, &TownConfig::default(), &mut rng);

        let mut agent_ids: Vec<u64> = world.query::<&Citizen>().iter().map(|(_, c)| c.agent_id).collect();
        let total = agent_ids.len();
        agent_ids.sort_unstable();
        agent_ids.dedup();
        assert_eq!(agent_ids.len(), total);
        assert!(!agent_ids.contains(&0));

        let mut building_ids: Vec<u32> = world.query::<&Building>().iter().map(|(_, b)| b.id).collect();
        let total = building_ids.len();
        building_ids.sort_unstable();
        building_ids.dedup();
        assert_eq!(building_ids.len(), total);
    }

    #[test]
    fn test_with_population_scales() {
        let config = TownConfig::with_population(1000);
        assert_eq!(config.households, 250);
        assert_eq!(config.taverns, 10);
    }

    #[test]
    fn test_same_seed_same_town() {
        let names = |seed| {
            let mut world = World::new();
            let mut rng = StdRng::seed_from_u64(seed);
            generate_town(&mut world, &TownConfig::default(), &mut rng);
            let mut names: Vec<(u64, String)> = world
                .query::<(&Citizen, &Name)>()
                .iter()
                .map(|(_, (c, n))| (c.agent_id, n.full_name()))
                .collect();
            names.sort();
            names
        };
        assert_eq!(names(9), names(9));
    }
}
