//! Pure epidemic logic for the plague engine.
//!
//! This crate holds every rule of the disease model that is independent of
//! any ECS, renderer, or runtime. Functions take plain data and return
//! results, so the same code drives the hecs engine, the headless simtest,
//! and unit tests.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`building`] | Building infection markers with per-building decay |
//! | [`config`] | Tunable timing, household and decay settings, validation |
//! | [`constants`] | Time base, symptom bounds, exposure and treatment tables |
//! | [`curve`] | Disease curve lookups and NPC threshold sampling |
//! | [`error`] | Error type shared by checked operations |
//! | [`exposure`] | Exposure resolver (flea, airborne, contact) |
//! | [`household`] | Hour-scaled household infection risk for NPCs |
//! | [`labels`] | Symptom tags, status buckets, subtype names |
//! | [`npc`] | Two-threshold NPC progression |
//! | [`player`] | Day-based player progression with symptom curves |
//! | [`profile`] | Bubonic, pneumonic and septicemic profiles |
//! | [`seed`] | Deterministic seeding and roll sources |
//! | [`status`] | Health states, bubo location, the player plague record |
//! | [`treatment`] | Period remedies and their effects |

pub mod building;
pub mod config;
pub mod constants;
pub mod curve;
pub mod error;
pub mod exposure;
pub mod household;
pub mod labels;
pub mod npc;
pub mod player;
pub mod profile;
pub mod seed;
pub mod status;
pub mod treatment;

pub use building::{
    BuildingInfectionAggregator, BuildingInfectionState, BuildingStatus, DecayingBuildingTracker,
};
pub use config::{validate_config, ConfigError, Determinism, EpidemicConfig, InvalidConfig};
pub use error::EpidemicError;
pub use exposure::{expose_to_plague, ExposureKind};
pub use household::apply_household_exposure;
pub use labels::{health_status_label, plague_type_label, symptom_labels, HealthLabel};
pub use npc::{advance_npc_health, create_npc_plague_meta, infect_npc, NpcHealth, NpcPlagueMeta};
pub use player::{checked_progress_plague, progress_plague};
pub use profile::{DiseaseProfile, DiseaseSubtype};
pub use status::{AgentHealthState, BuboLocation, PlagueStatus};
pub use treatment::{attempt_treatment, TreatmentKind};
