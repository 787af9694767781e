//! Disease profile table - per-subtype timing and mortality constants.
//!
//! Both the player machine and the NPC machine read these rows, so the
//! two populations face the same disease at different time resolutions.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{exposure, survival};

/// Variant of the plague carried by an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DiseaseSubtype {
    #[default]
    None,
    Bubonic,
    Pneumonic,
    Septicemic,
}

impl DiseaseSubtype {
    /// Subtype for a non-airborne infection: 80% bubonic, 15% pneumonic,
    /// 5% septicemic. `roll` is a uniform draw in `[0, 1)`.
    pub fn from_weighted_roll(roll: f64) -> Self {
        if roll < exposure::BUBONIC_WEIGHT {
            Self::Bubonic
        } else if roll < exposure::BUBONIC_WEIGHT + exposure::PNEUMONIC_WEIGHT {
            Self::Pneumonic
        } else {
            Self::Septicemic
        }
    }

    /// Profile row for this subtype, `None` for [`DiseaseSubtype::None`].
    pub fn profile(self) -> Option<&'static DiseaseProfile> {
        match self {
            Self::None => None,
            Self::Bubonic => Some(&BUBONIC),
            Self::Pneumonic => Some(&PNEUMONIC),
            Self::Septicemic => Some(&SEPTICEMIC),
        }
    }

    /// Survival chance (percent) stamped at exposure.
    pub fn initial_survival(self) -> f32 {
        match self {
            Self::None => survival::HEALTHY,
            Self::Bubonic => survival::BUBONIC_INITIAL,
            Self::Pneumonic => survival::PNEUMONIC_INITIAL,
            Self::Septicemic => survival::SEPTICEMIC_INITIAL,
        }
    }
}

/// Inclusive range of simulated days.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DayRange {
    pub min: f64,
    pub max: f64,
}

impl DayRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Uniform sample within the range.
    pub fn sample(&self, rng: &mut impl Rng) -> f64 {
        if self.max > self.min {
            rng.gen_range(self.min..=self.max)
        } else {
            self.min
        }
    }

    pub fn contains(&self, days: f64) -> bool {
        (self.min..=self.max).contains(&days)
    }
}

/// One row of the profile table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DiseaseProfile {
    pub subtype: DiseaseSubtype,
    /// Exposure to onset, in days.
    pub incubation_days: DayRange,
    /// Day (since exposure) on which the player turns symptomatic.
    pub symptoms_onset_day: f64,
    /// Day on which the disease typically kills.
    pub death_day: DayRange,
    /// Fraction of untreated cases that die.
    pub base_mortality: f32,
    /// Mortality once the bubo has burst or been lanced (bubonic only).
    pub lanced_mortality: Option<f32>,
}

pub const BUBONIC: DiseaseProfile = DiseaseProfile {
    subtype: DiseaseSubtype::Bubonic,
    incubation_days: DayRange::new(2.0, 6.0),
    symptoms_onset_day: 3.0,
    death_day: DayRange::new(7.0, 10.0),
    base_mortality: 0.60,
    lanced_mortality: Some(0.30),
};

pub const PNEUMONIC: DiseaseProfile = DiseaseProfile {
    subtype: DiseaseSubtype::Pneumonic,
    incubation_days: DayRange::new(1.0, 3.0),
    symptoms_onset_day: 1.0,
    death_day: DayRange::new(2.0, 4.0),
    base_mortality: 0.95,
    lanced_mortality: None,
};

pub const SEPTICEMIC: DiseaseProfile = DiseaseProfile {
    subtype: DiseaseSubtype::Septicemic,
    incubation_days: DayRange::new(1.0, 2.0),
    symptoms_onset_day: 1.0,
    death_day: DayRange::new(1.0, 3.0),
    base_mortality: 0.98,
    lanced_mortality: None,
};

/// All rows, in subtype order.
pub const PROFILES: [&DiseaseProfile; 3] = [&BUBONIC, &PNEUMONIC, &SEPTICEMIC];
