//! Save/Load functionality for persisting simulation state
//!
//! Uses bincode for efficient binary serialization of the entire simulation.
//! Components are serialized individually then reconstructed on load.

use hecs::World;
use plague_logic::building::DecayingBuildingTracker;
use plague_logic::config::{EpidemicConfig, InvalidConfig};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use thiserror::Error;

use crate::components::*;

/// Version number for save file format (increment when format changes)
pub const SAVE_VERSION: u32 = 1;

/// Serializable snapshot of the simulation state
#[derive(Serialize, Deserialize)]
pub struct SaveData {
    /// Save format version
    pub version: u32,
    /// Simulation time in seconds
    pub sim_time: f64,
    pub time_scale: f64,
    /// Master seed of the run
    pub seed: u64,
    /// Household passes run so far; keys the next pass's rolls
    pub household_checks: u64,
    pub last_household_update: f64,
    pub config: EpidemicConfig,
    pub buildings: DecayingBuildingTracker,
    pub town_name: Option<String>,
    /// All entities with their components
    pub entities: Vec<SerializableEntity>,
}

/// All possible components for an entity, serialized as optionals
#[derive(Serialize, Deserialize, Default)]
pub struct SerializableEntity {
    pub citizen: Option<Citizen>,
    pub name: Option<Name>,
    pub residence: Option<Residence>,
    pub npc_health: Option<NpcHealth>,
    pub household_exposure: Option<HouseholdExposure>,
    pub player: Option<Player>,
    pub building: Option<Building>,
}

/// Extract all entities from a world into serializable form
fn serialize_entities(world: &World) -> Vec<SerializableEntity> {
    world
        .iter()
        .map(|entity_ref| SerializableEntity {
            citizen: entity_ref.get::<&Citizen>().map(|c| *c),
            name: entity_ref.get::<&Name>().map(|c| (*c).clone()),
            residence: entity_ref.get::<&Residence>().map(|c| *c),
            npc_health: entity_ref.get::<&NpcHealth>().map(|c| *c),
            household_exposure: entity_ref.get::<&HouseholdExposure>().map(|c| *c),
            player: entity_ref.get::<&Player>().map(|c| *c),
            building: entity_ref.get::<&Building>().map(|c| (*c).clone()),
        })
        .collect()
}

/// Spawn an entity with all its components
fn spawn_entity(world: &mut World, se: SerializableEntity) {
    let entity = world.spawn(());

    if let Some(c) = se.citizen {
        let _ = world.insert_one(entity, c);
    }
    if let Some(c) = se.name {
        let _ = world.insert_one(entity, c);
    }
    if let Some(c) = se.residence {
        let _ = world.insert_one(entity, c);
    }
    if let Some(c) = se.npc_health {
        let _ = world.insert_one(entity, c);
    }
    if let Some(c) = se.household_exposure {
        let _ = world.insert_one(entity, c);
    }
    if let Some(c) = se.player {
        let _ = world.insert_one(entity, c);
    }
    if let Some(c) = se.building {
        let _ = world.insert_one(entity, c);
    }
}

/// Engine state besides the world, borrowed for saving.
pub struct SaveHeader<'a> {
    pub sim_time: f64,
    pub time_scale: f64,
    pub seed: u64,
    pub household_checks: u64,
    pub last_household_update: f64,
    pub config: &'a EpidemicConfig,
    pub buildings: &'a DecayingBuildingTracker,
    pub town_name: Option<&'a str>,
}

/// Save the complete simulation to a writer
pub fn save_simulation<W: Write>(
    writer: W,
    world: &World,
    header: SaveHeader<'_>,
) -> Result<(), SaveError> {
    let save_data = SaveData {
        version: SAVE_VERSION,
        sim_time: header.sim_time,
        time_scale: header.time_scale,
        seed: header.seed,
        household_checks: header.household_checks,
        last_household_update: header.last_household_update,
        config: header.config.clone(),
        buildings: header.buildings.clone(),
        town_name: header.town_name.map(str::to_string),
        entities: serialize_entities(world),
    };

    bincode::serialize_into(writer, &save_data)?;
    Ok(())
}

/// Load a simulation from a reader
pub fn load_simulation<R: Read>(reader: R) -> Result<LoadedSimulation, SaveError> {
    let save_data: SaveData = bincode::deserialize_from(reader)?;

    if save_data.version != SAVE_VERSION {
        return Err(SaveError::VersionMismatch {
            expected: SAVE_VERSION,
            found: save_data.version,
        });
    }

    let config = save_data.config.validated()?;

    let mut world = World::new();
    for se in save_data.entities {
        spawn_entity(&mut world, se);
    }

    Ok(LoadedSimulation {
        world,
        sim_time: save_data.sim_time,
        time_scale: save_data.time_scale,
        seed: save_data.seed,
        household_checks: save_data.household_checks,
        last_household_update: save_data.last_household_update,
        config,
        buildings: save_data.buildings,
        town_name: save_data.town_name,
    })
}

/// Result of loading a simulation
pub struct LoadedSimulation {
    pub world: World,
    pub sim_time: f64,
    pub time_scale: f64,
    pub seed: u64,
    pub household_checks: u64,
    pub last_household_update: f64,
    pub config: EpidemicConfig,
    pub buildings: DecayingBuildingTracker,
    pub town_name: Option<String>,
}

/// Errors that can occur during save/load
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Bincode(#[from] Box<bincode::ErrorKind>),
    #[error("Save version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
    #[error("Saved {0}")]
    Config(#[from] InvalidConfig),
}
