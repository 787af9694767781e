//! Simulation engine - main entry point for running an outbreak

use std::collections::HashMap;

use hecs::{Entity, World};
use log::{debug, info};
use plague_logic::building::{BuildingInfectionAggregator, BuildingInfectionState, DecayingBuildingTracker};
use plague_logic::config::{EpidemicConfig, InvalidConfig};
use plague_logic::error::EpidemicError;
use plague_logic::exposure::{expose_to_plague, ExposureKind};
use plague_logic::labels::{health_status_label, plague_type_label, symptom_labels};
use plague_logic::npc::infect_npc;
use plague_logic::seed::{self, salts};
use plague_logic::status::{AgentHealthState, PlagueStatus};
use plague_logic::treatment::{attempt_treatment, TreatmentKind};
use rand::rngs::StdRng;

use crate::components::*;
use crate::generation::{generate_town, next_ids, spawn_resident, TownConfig, TownLayout};
use crate::persistence::{SaveError, SaveHeader};
use crate::report::{BuildingMarker, Census, PlayerReport, TownSnapshot};
use crate::systems::*;

/// Agent id carried by the player entity.
pub const PLAYER_AGENT_ID: u64 = 0;

/// Main simulation engine
pub struct EpidemicEngine {
    /// ECS world containing all entities
    pub world: World,
    /// Simulation time in seconds since start
    sim_time: f64,
    config: EpidemicConfig,
    /// Building infection markers
    buildings: DecayingBuildingTracker,
    town_name: Option<String>,
    /// Master seed; every roll of the run derives from it
    seed: u64,
    time_scale: f64,

    // Update timing
    last_household_update: f64,
    household_checks: u64,

    // Lookup indices, rebuilt after load
    agents: HashMap<u64, Entity>,
    building_entities: HashMap<u32, Entity>,
    player: Option<Entity>,
    next_agent_id: u64,
    next_building_id: u32,
}

impl EpidemicEngine {
    /// Create a new empty simulation. Rejects a config that fails
    /// [`validate_config`](plague_logic::config::validate_config).
    pub fn new(config: EpidemicConfig, seed: u64) -> Result<Self, InvalidConfig> {
        Ok(Self::with_valid_config(config.validated()?, seed))
    }

    fn with_valid_config(config: EpidemicConfig, seed: u64) -> Self {
        let buildings = DecayingBuildingTracker::new(&config);
        Self {
            world: World::new(),
            sim_time: 0.0,
            config,
            buildings,
            town_name: None,
            seed,
            time_scale: 1.0,
            last_household_update: 0.0,
            household_checks: 0,
            agents: HashMap::new(),
            building_entities: HashMap::new(),
            player: None,
            next_agent_id: 1,
            next_building_id: 1,
        }
    }

    /// Generate a town with its households
    pub fn generate(&mut self, town: TownConfig) -> TownLayout {
        let mut rng: StdRng = seed::rng_for(self.seed, salts::TOWN);
        let layout = generate_town(&mut self.world, &town, &mut rng);
        info!(
            "generated {}: {} buildings, {} citizens",
            layout.name,
            layout.buildings.len(),
            layout.citizens.len()
        );
        self.town_name = Some(layout.name.clone());
        self.rebuild_indices();
        layout
    }

    /// Update the simulation by `delta_seconds` of wall time.
    ///
    /// NPCs and the player advance every call. Household exposure runs on the
    /// configured cadence and re-marks every building with living sick
    /// residents. Returns the state changes of this update.
    pub fn update(&mut self, delta_seconds: f64) -> Vec<HealthTransition> {
        if !delta_seconds.is_finite() || delta_seconds <= 0.0 {
            return Vec::new();
        }
        self.sim_time += delta_seconds * self.time_scale;

        let mut transitions = npc_health_system(&mut self.world, self.sim_time, &self.config);
        transitions.extend(player_progress_system(&mut self.world, self.sim_time, &self.config));
        report_transitions(&mut self.buildings, &transitions);

        let interval = self.config.household.check_interval_hours * self.config.hour_length();
        if self.sim_time - self.last_household_update >= interval {
            let elapsed_hours = self
                .config
                .seconds_to_hours(self.sim_time - self.last_household_update);
            self.household_checks += 1;
            let offset = seed::mix(self.seed, self.household_checks);

            let infections = household_exposure_system(
                &mut self.world,
                self.sim_time,
                elapsed_hours,
                offset,
                &self.config,
            );
            for infection in &infections {
                report_agent(
                    &mut self.buildings,
                    Some(infection.building_id),
                    AgentHealthState::Incubating,
                    self.sim_time,
                );
            }
            if !infections.is_empty() {
                debug!(
                    "day {:.2}: {} household infections",
                    self.day(),
                    infections.len()
                );
            }

            building_refresh_system(&self.world, &mut self.buildings, self.sim_time);
            self.last_household_update = self.sim_time;
        }

        let deaths = transitions.iter().filter(|t| t.is_death()).count();
        if deaths > 0 {
            info!("day {:.2}: {} died of plague", self.day(), deaths);
        }
        transitions
    }

    /// Add a building. Returns its id.
    pub fn spawn_building(&mut self, name: impl Into<String>, kind: BuildingKind, capacity: u32) -> u32 {
        let id = self.next_building_id;
        self.next_building_id += 1;
        let entity = self.world.spawn((Building::new(id, name, kind, capacity),));
        self.building_entities.insert(id, entity);
        id
    }

    /// Add a healthy citizen, optionally housed. Returns its agent id.
    pub fn spawn_citizen(&mut self, name: Name, residence: Option<u32>) -> Result<u64, EpidemicError> {
        if let Some(building_id) = residence {
            self.require_building(building_id)?;
        }
        let agent_id = self.next_agent_id;
        self.next_agent_id += 1;
        let entity = spawn_resident(&mut self.world, agent_id, name, residence);
        self.agents.insert(agent_id, entity);
        Ok(agent_id)
    }

    /// Add the player, replacing any previous one.
    pub fn spawn_player(&mut self, residence: Option<u32>) -> Result<Entity, EpidemicError> {
        if let Some(building_id) = residence {
            self.require_building(building_id)?;
        }
        if let Some(previous) = self.player.take() {
            let _ = self.world.despawn(previous);
        }
        let entity = self.world.spawn((
            Player::default(),
            Citizen {
                agent_id: PLAYER_AGENT_ID,
            },
        ));
        if let Some(building_id) = residence {
            let _ = self.world.insert_one(entity, Residence { building_id });
        }
        self.player = Some(entity);
        Ok(entity)
    }

    /// Infect a healthy citizen directly. Returns whether it was infected.
    pub fn seed_infection(&mut self, agent_id: u64) -> Result<bool, EpidemicError> {
        let entity = self.agent_entity(agent_id)?;
        let infection_seed = seed::agent_seed(agent_id, self.sim_time, seed::mix(self.seed, salts::OUTBREAK));

        let (health, residence) = self
            .world
            .query_one_mut::<(&mut NpcHealth, Option<&Residence>)>(entity)
            .map_err(|_| EpidemicError::UnknownAgent(agent_id))?;
        if !infect_npc(health, infection_seed, self.sim_time, &self.config) {
            return Ok(false);
        }
        let building_id = residence.map(|r| r.building_id);

        info!("plague seeded in agent {agent_id}");
        report_agent(&mut self.buildings, building_id, AgentHealthState::Incubating, self.sim_time);
        Ok(true)
    }

    /// Expose the player. `seed_override` replaces the derived seed.
    pub fn expose_player(
        &mut self,
        kind: ExposureKind,
        intensity: f64,
        seed_override: Option<u64>,
    ) -> Result<PlagueStatus, EpidemicError> {
        let sim_time = self.sim_time;
        let exposure_seed =
            seed_override.unwrap_or_else(|| seed::mix(self.seed, sim_time.to_bits()));
        let (status, building_id) = self.with_player(|player, residence| {
            player.status =
                expose_to_plague(player.status, kind, intensity, sim_time, Some(exposure_seed));
            (player.status, residence)
        })?;

        if status.state == AgentHealthState::Incubating {
            info!("player caught {} via {kind:?}", plague_type_label(status.subtype));
            report_agent(&mut self.buildings, building_id, status.state, sim_time);
        }
        Ok(status)
    }

    /// Apply a remedy to the player.
    pub fn treat_player(&mut self, kind: TreatmentKind) -> Result<PlagueStatus, EpidemicError> {
        let (status, _) = self.with_player(|player, residence| {
            player.status = attempt_treatment(player.status, kind);
            (player.status, residence)
        })?;
        debug!("player treated with {}", kind.name());
        Ok(status)
    }

    pub fn player_status(&self) -> Result<PlagueStatus, EpidemicError> {
        let entity = self.player.ok_or(EpidemicError::NoPlayer)?;
        self.world
            .get::<&Player>(entity)
            .map(|p| p.status)
            .map_err(|_| EpidemicError::NoPlayer)
    }

    pub fn npc_health(&self, agent_id: u64) -> Result<NpcHealth, EpidemicError> {
        let entity = self.agent_entity(agent_id)?;
        self.world
            .get::<&NpcHealth>(entity)
            .map(|h| *h)
            .map_err(|_| EpidemicError::UnknownAgent(agent_id))
    }

    /// Marker on a building at the current time.
    pub fn building_status(&self, building_id: u32) -> Result<BuildingInfectionState, EpidemicError> {
        self.require_building(building_id)?;
        Ok(self.buildings.status_at(building_id, self.sim_time))
    }

    /// Citizens by health state. The player is not counted.
    pub fn census(&self) -> Census {
        Census::from_counts(count_npc_states(&self.world))
    }

    /// Full snapshot for display or export.
    pub fn snapshot(&self) -> TownSnapshot {
        let buildings = self
            .buildings
            .marked(self.sim_time)
            .into_iter()
            .map(|(id, marker)| BuildingMarker {
                id,
                name: self
                    .building_entities
                    .get(&id)
                    .and_then(|&e| self.world.get::<&Building>(e).ok().map(|b| b.name.clone()))
                    .unwrap_or_default(),
                marker,
            })
            .collect();

        let player = self.player_status().ok().map(|status| PlayerReport {
            label: health_status_label(&status),
            plague_type: plague_type_label(status.subtype).to_string(),
            symptoms: symptom_labels(&status),
            status,
        });

        TownSnapshot {
            town: self.town_name.clone(),
            sim_time: self.sim_time,
            day: self.day(),
            census: self.census(),
            buildings,
            player,
        }
    }

    /// Set time scale (1.0 = real-time, 2.0 = 2x speed, etc.)
    pub fn set_time_scale(&mut self, scale: f64) {
        self.time_scale = if scale.is_finite() { scale.max(0.0) } else { 1.0 };
    }

    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    /// Get current simulation time in seconds
    pub fn sim_time(&self) -> f64 {
        self.sim_time
    }

    /// Days elapsed since the start
    pub fn day(&self) -> f64 {
        self.config.seconds_to_days(self.sim_time)
    }

    pub fn config(&self) -> &EpidemicConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn town_name(&self) -> Option<&str> {
        self.town_name.as_deref()
    }

    pub fn citizen_count(&self) -> usize {
        self.agents.len()
    }

    pub fn building_count(&self) -> usize {
        self.building_entities.len()
    }

    /// Agent ids of every citizen, in ascending order.
    pub fn agent_ids(&self) -> Vec<u64> {
        let mut ids: Vec<u64> = self.agents.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Save simulation state to a writer
    pub fn save<W: std::io::Write>(&self, writer: W) -> Result<(), SaveError> {
        crate::persistence::save_simulation(
            writer,
            &self.world,
            SaveHeader {
                sim_time: self.sim_time,
                time_scale: self.time_scale,
                seed: self.seed,
                household_checks: self.household_checks,
                last_household_update: self.last_household_update,
                config: &self.config,
                buildings: &self.buildings,
                town_name: self.town_name.as_deref(),
            },
        )
    }

    /// Load simulation state from a reader
    pub fn load<R: std::io::Read>(&mut self, reader: R) -> Result<(), SaveError> {
        let loaded = crate::persistence::load_simulation(reader)?;

        self.world = loaded.world;
        self.sim_time = loaded.sim_time;
        self.time_scale = loaded.time_scale;
        self.seed = loaded.seed;
        self.household_checks = loaded.household_checks;
        self.last_household_update = loaded.last_household_update;
        self.config = loaded.config;
        self.buildings = loaded.buildings;
        self.town_name = loaded.town_name;

        self.rebuild_indices();
        Ok(())
    }

    /// Rebuild id lookups from the world
    fn rebuild_indices(&mut self) {
        self.agents = self
            .world
            .query::<(&Citizen, &NpcHealth)>()
            .iter()
            .map(|(entity, (citizen, _))| (citizen.agent_id, entity))
            .collect();
        self.building_entities = self
            .world
            .query::<&Building>()
            .iter()
            .map(|(entity, building)| (building.id, entity))
            .collect();
        self.player = self
            .world
            .query::<&Player>()
            .iter()
            .map(|(entity, _)| entity)
            .next();

        let (next_agent, next_building) = next_ids(&self.world);
        self.next_agent_id = next_agent;
        self.next_building_id = next_building;
    }

    fn agent_entity(&self, agent_id: u64) -> Result<Entity, EpidemicError> {
        self.agents
            .get(&agent_id)
            .copied()
            .ok_or(EpidemicError::UnknownAgent(agent_id))
    }

    fn require_building(&self, building_id: u32) -> Result<Entity, EpidemicError> {
        self.building_entities
            .get(&building_id)
            .copied()
            .ok_or(EpidemicError::UnknownBuilding(building_id))
    }

    fn with_player<T>(
        &mut self,
        f: impl FnOnce(&mut Player, Option<u32>) -> T,
    ) -> Result<T, EpidemicError> {
        let entity = self.player.ok_or(EpidemicError::NoPlayer)?;
        let (player, residence) = self
            .world
            .query_one_mut::<(&mut Player, Option<&Residence>)>(entity)
            .map_err(|_| EpidemicError::NoPlayer)?;
        Ok(f(player, residence.map(|r| r.building_id)))
    }
}

impl Default for EpidemicEngine {
    fn default() -> Self {
        Self::with_valid_config(EpidemicConfig::default(), 0)
    }
}
