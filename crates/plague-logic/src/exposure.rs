//! Exposure resolution - turns an exposure event into an infection or nothing.

use log::{debug, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::exposure;
use crate::error::check_sim_time;
use crate::profile::DiseaseSubtype;
use crate::seed::{self, salts};
use crate::status::{AgentHealthState, BuboLocation, PlagueStatus};

/// How the agent came into contact with the disease.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExposureKind {
    /// Flea bite from an infested rat or bedding.
    Flea,
    /// Inhaled droplets from a coughing victim.
    Airborne,
    /// Handling the sick or their belongings.
    Contact,
}

impl ExposureKind {
    pub const ALL: [ExposureKind; 3] = [Self::Flea, Self::Airborne, Self::Contact];

    /// Success probability at full intensity.
    pub fn base_probability(self) -> f64 {
        match self {
            Self::Flea => exposure::FLEA_PROBABILITY,
            Self::Airborne => exposure::AIRBORNE_PROBABILITY,
            Self::Contact => exposure::CONTACT_PROBABILITY,
        }
    }

    /// Subtype for a successful exposure. Airborne infection is always
    /// pneumonic; everything else follows the weighted split.
    pub fn resolve_subtype(self, roll: f64) -> DiseaseSubtype {
        match self {
            Self::Airborne => DiseaseSubtype::Pneumonic,
            Self::Flea | Self::Contact => DiseaseSubtype::from_weighted_roll(roll),
        }
    }
}

/// Attempt to infect a healthy agent.
///
/// Returns `status` unchanged unless it is healthy, the time is valid and
/// the seeded success roll passes. `intensity` is clamped to `[0, 1]`. With
/// no `seed`, one is derived from `current_time`.
///
/// Draw order from the seeded stream: success, subtype, bubo location.
pub fn expose_to_plague(
    status: PlagueStatus,
    kind: ExposureKind,
    intensity: f64,
    current_time: f64,
    seed: Option<u64>,
) -> PlagueStatus {
    if status.state != AgentHealthState::Healthy {
        return status;
    }
    let current_time = match check_sim_time(current_time) {
        Ok(t) => t,
        Err(e) => {
            warn!("exposure ignored: {e}");
            return status;
        }
    };

    let intensity = if intensity.is_nan() {
        0.0
    } else {
        intensity.clamp(0.0, 1.0)
    };
    let seed = seed.unwrap_or_else(|| current_time.to_bits());
    let mut rng = seed::rng_for(seed, salts::EXPOSURE);

    let success_roll: f64 = rng.gen();
    if success_roll >= kind.base_probability() * intensity {
        return status;
    }

    let subtype = kind.resolve_subtype(rng.gen());
    let bubo_location = if subtype == DiseaseSubtype::Bubonic {
        BuboLocation::from_roll(rng.gen())
    } else {
        BuboLocation::None
    };

    debug!(
        "{kind:?} exposure at t={current_time} infected: {subtype:?} (bubo: {})",
        bubo_location.name()
    );

    PlagueStatus {
        subtype,
        state: AgentHealthState::Incubating,
        exposure_time: Some(current_time),
        bubo_location,
        survival_chance: subtype.initial_survival(),
        rng_seed: seed,
        last_progress_time: current_time,
        ..PlagueStatus::healthy()
    }
}
