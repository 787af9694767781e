//! Shared lifecycle states and the player's full plague record.

use serde::{Deserialize, Serialize};

use crate::constants::{exposure, survival, symptoms};
use crate::profile::DiseaseSubtype;

/// Coarse lifecycle shared by the player and NPCs.
///
/// Transitions only ever move forward: Healthy → Incubating → Infected →
/// Deceased. Recovery is declining severity while still `Infected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AgentHealthState {
    #[default]
    Healthy,
    Incubating,
    Infected,
    Deceased,
}

impl AgentHealthState {
    /// Position along the lifecycle, 0 (healthy) to 3 (deceased).
    pub fn stage(self) -> u8 {
        match self {
            Self::Healthy => 0,
            Self::Incubating => 1,
            Self::Infected => 2,
            Self::Deceased => 3,
        }
    }

    /// Whether `next` is this state or its immediate successor.
    pub fn may_become(self, next: Self) -> bool {
        next == self || next.stage() == self.stage() + 1
    }

    pub fn is_alive(self) -> bool {
        self != Self::Deceased
    }

    /// Carrying the disease, symptomatic or not.
    pub fn is_sick(self) -> bool {
        matches!(self, Self::Incubating | Self::Infected)
    }

    /// Progression is a no-op in these states.
    pub fn is_inert(self) -> bool {
        matches!(self, Self::Healthy | Self::Deceased)
    }
}

/// Where a bubonic swelling formed. Fixed at infection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BuboLocation {
    #[default]
    None,
    Groin,
    Armpit,
    Neck,
}

impl BuboLocation {
    /// Groin 60%, armpit 30%, neck 10%. `roll` is uniform in `[0, 1)`.
    pub fn from_roll(roll: f64) -> Self {
        if roll < exposure::GROIN_WEIGHT {
            Self::Groin
        } else if roll < exposure::GROIN_WEIGHT + exposure::ARMPIT_WEIGHT {
            Self::Armpit
        } else {
            Self::Neck
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Groin => "groin",
            Self::Armpit => "armpit",
            Self::Neck => "neck",
        }
    }
}

/// Full-fidelity plague record for the player.
///
/// Symptom fields are bounded to `[0, 100]`; `overall_severity` is the
/// maximum of them after every progression step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlagueStatus {
    pub subtype: DiseaseSubtype,
    pub state: AgentHealthState,
    /// Simulated time of the successful exposure.
    pub exposure_time: Option<f64>,
    /// Simulated time symptoms appeared.
    pub onset_time: Option<f64>,
    /// Days since onset as of the last progression.
    pub days_infected: f32,
    pub bubo_location: BuboLocation,
    pub bubo_burst: bool,
    pub fever: f32,
    pub weakness: f32,
    pub buboes: f32,
    pub coughing_blood: f32,
    pub skin_bleeding: f32,
    pub delirium: f32,
    pub gangrene: f32,
    pub overall_severity: f32,
    /// Percent.
    pub survival_chance: f32,
    /// Seed stamped at exposure; burst and death rolls derive from it.
    pub rng_seed: u64,
    /// Simulated time of the previous progression step.
    pub last_progress_time: f64,
}

impl Default for PlagueStatus {
    fn default() -> Self {
        Self::healthy()
    }
}

impl PlagueStatus {
    pub fn healthy() -> Self {
        Self {
            subtype: DiseaseSubtype::None,
            state: AgentHealthState::Healthy,
            exposure_time: None,
            onset_time: None,
            days_infected: 0.0,
            bubo_location: BuboLocation::None,
            bubo_burst: false,
            fever: 0.0,
            weakness: 0.0,
            buboes: 0.0,
            coughing_blood: 0.0,
            skin_bleeding: 0.0,
            delirium: 0.0,
            gangrene: 0.0,
            overall_severity: 0.0,
            survival_chance: survival::HEALTHY,
            rng_seed: 0,
            last_progress_time: 0.0,
        }
    }

    /// All symptom values in label priority order.
    pub fn symptoms(&self) -> [f32; 7] {
        [
            self.fever,
            self.buboes,
            self.weakness,
            self.coughing_blood,
            self.skin_bleeding,
            self.delirium,
            self.gangrene,
        ]
    }

    /// Maximum of all symptom fields.
    pub fn max_symptom(&self) -> f32 {
        self.symptoms().into_iter().fold(symptoms::MIN, f32::max)
    }

    /// Clamp every symptom into bounds and refresh `overall_severity`.
    pub fn recompute_severity(&mut self) {
        for field in [
            &mut self.fever,
            &mut self.weakness,
            &mut self.buboes,
            &mut self.coughing_blood,
            &mut self.skin_bleeding,
            &mut self.delirium,
            &mut self.gangrene,
        ] {
            *field = clamp_symptom(*field);
        }
        self.overall_severity = self.max_symptom();
    }
}

/// Bound a symptom value into `[0, 100]`.
pub fn clamp_symptom(value: f32) -> f32 {
    if value.is_nan() {
        symptoms::MIN
    } else {
        value.clamp(symptoms::MIN, symptoms::MAX)
    }
}
