//! Engine tuning.
//!
//! Every tunable the epidemic machines read lives here so a save game or a
//! TOML file can pin them. The defaults reproduce the historical curves.
//!
//! ```
//! use plague_logic::config::{validate_config, EpidemicConfig};
//!
//! let config = EpidemicConfig::default();
//! assert!(validate_config(&config).is_empty());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::time::{GAME_DAY_LENGTH, HOURS_PER_DAY};

/// Which probabilistic branches are reproducible from a seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Determinism {
    /// Every roll, including bubo burst and death rolls, derives from the
    /// status seed. Replays are bit-identical.
    #[default]
    Full,
    /// Only exposure and subtype/bubo assignment are seeded; burst and death
    /// rolls use the thread RNG.
    ExposureOnly,
}

/// Hour-scaled NPC timing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NpcTiming {
    /// Factor applied to profile hours (days × 24) for NPCs.
    pub compression: f64,
    pub incubation_min_hours: f64,
    pub incubation_max_hours: f64,
    pub death_min_hours: f64,
    pub death_max_hours: f64,
    /// `death_hours` always exceeds `incubation_hours` by at least this much.
    pub death_margin_hours: f64,
}

impl Default for NpcTiming {
    fn default() -> Self {
        Self {
            compression: 0.12,
            incubation_min_hours: 1.0,
            incubation_max_hours: 8.0,
            death_min_hours: 4.0,
            death_max_hours: 22.0,
            death_margin_hours: 2.0,
        }
    }
}

impl NpcTiming {
    /// Convert profile days into compressed NPC hours.
    pub fn compress_days(&self, days: f64) -> f64 {
        days * HOURS_PER_DAY * self.compression
    }
}

/// Ambient household exposure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HouseholdConfig {
    /// Infection probability per cumulative exposure hour.
    pub rate_per_hour: f64,
    /// Ceiling on the per-check infection probability.
    pub max_probability: f64,
    /// How often the engine runs the household check, in simulated hours.
    pub check_interval_hours: f64,
}

impl Default for HouseholdConfig {
    fn default() -> Self {
        Self {
            rate_per_hour: 0.04,
            max_probability: 0.95,
            check_interval_hours: 1.0,
        }
    }
}

/// Building marker decay window bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildingDecayConfig {
    pub min_decay_hours: f64,
    pub max_decay_hours: f64,
}

impl Default for BuildingDecayConfig {
    fn default() -> Self {
        Self {
            min_decay_hours: 6.0,
            max_decay_hours: 12.0,
        }
    }
}

/// Complete epidemic tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EpidemicConfig {
    pub determinism: Determinism,
    /// Simulated seconds per simulated day.
    pub day_length: f64,
    pub npc: NpcTiming,
    pub household: HouseholdConfig,
    pub buildings: BuildingDecayConfig,
}

impl Default for EpidemicConfig {
    fn default() -> Self {
        Self {
            determinism: Determinism::Full,
            day_length: GAME_DAY_LENGTH,
            npc: NpcTiming::default(),
            household: HouseholdConfig::default(),
            buildings: BuildingDecayConfig::default(),
        }
    }
}

impl EpidemicConfig {
    /// Simulated seconds per simulated hour.
    pub fn hour_length(&self) -> f64 {
        self.day_length / HOURS_PER_DAY
    }

    pub fn seconds_to_days(&self, seconds: f64) -> f64 {
        seconds / self.day_length
    }

    pub fn seconds_to_hours(&self, seconds: f64) -> f64 {
        seconds / self.hour_length()
    }
}

/// Configuration validation error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("day length must be positive, got {0}")]
    NonPositiveDayLength(f64),
    #[error("NPC compression must be positive, got {0}")]
    NonPositiveCompression(f64),
    #[error("NPC incubation window [{min}, {max}] h is empty or negative")]
    InvalidIncubationWindow { min: f64, max: f64 },
    #[error("NPC death window [{min}, {max}] h is empty or negative")]
    InvalidDeathWindow { min: f64, max: f64 },
    #[error("incubation max {incubation_max} h + margin {margin} h exceeds death max {death_max} h")]
    MarginUnsatisfiable {
        incubation_max: f64,
        margin: f64,
        death_max: f64,
    },
    #[error("household rate must be non-negative, got {0}")]
    NegativeHouseholdRate(f64),
    #[error("household probability cap must be within [0, 1], got {0}")]
    InvalidProbabilityCap(f64),
    #[error("household check interval must be positive, got {0}")]
    NonPositiveCheckInterval(f64),
    #[error("building decay window [{min}, {max}] h is empty or non-positive")]
    InvalidDecayWindow { min: f64, max: f64 },
}

/// A configuration rejected by [`EpidemicConfig::validated`].
#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid configuration: {}", join_errors(.0))]
pub struct InvalidConfig(pub Vec<ConfigError>);

fn join_errors(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl EpidemicConfig {
    /// Return the configuration if it passes [`validate_config`].
    pub fn validated(self) -> Result<Self, InvalidConfig> {
        let errors = validate_config(&self);
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(InvalidConfig(errors))
        }
    }
}

/// Validate a configuration, returning all errors found.
pub fn validate_config(config: &EpidemicConfig) -> Vec<ConfigError> {
    let mut errors = Vec::new();

    if !(config.day_length > 0.0) {
        errors.push(ConfigError::NonPositiveDayLength(config.day_length));
    }

    let npc = &config.npc;
    if !(npc.compression > 0.0) {
        errors.push(ConfigError::NonPositiveCompression(npc.compression));
    }
    if !(npc.incubation_min_hours >= 0.0 && npc.incubation_min_hours <= npc.incubation_max_hours) {
        errors.push(ConfigError::InvalidIncubationWindow {
            min: npc.incubation_min_hours,
            max: npc.incubation_max_hours,
        });
    }
    if !(npc.death_min_hours >= 0.0 && npc.death_min_hours <= npc.death_max_hours) {
        errors.push(ConfigError::InvalidDeathWindow {
            min: npc.death_min_hours,
            max: npc.death_max_hours,
        });
    }
    if npc.incubation_max_hours + npc.death_margin_hours > npc.death_max_hours {
        errors.push(ConfigError::MarginUnsatisfiable {
            incubation_max: npc.incubation_max_hours,
            margin: npc.death_margin_hours,
            death_max: npc.death_max_hours,
        });
    }

    let household = &config.household;
    if !(household.rate_per_hour >= 0.0) {
        errors.push(ConfigError::NegativeHouseholdRate(household.rate_per_hour));
    }
    if !(0.0..=1.0).contains(&household.max_probability) {
        errors.push(ConfigError::InvalidProbabilityCap(household.max_probability));
    }
    if !(household.check_interval_hours > 0.0) {
        errors.push(ConfigError::NonPositiveCheckInterval(
            household.check_interval_hours,
        ));
    }

    let decay = &config.buildings;
    if !(decay.min_decay_hours > 0.0 && decay.min_decay_hours <= decay.max_decay_hours) {
        errors.push(ConfigError::InvalidDecayWindow {
            min: decay.min_decay_hours,
            max: decay.max_decay_hours,
        });
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        assert!(validate_config(&EpidemicConfig::default()).is_empty());
    }

    #[test]
    fn test_hour_length() {
        let config = EpidemicConfig::default();
        assert!((config.hour_length() - 3600.0).abs() < 1e-9);
        assert!((config.seconds_to_days(172_800.0) - 2.0).abs() < 1e-9);
        assert!((config.seconds_to_hours(5400.0) - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_compress_days() {
        let timing = NpcTiming::default();
        // 2 days × 24 h × 0.12
        assert!((timing.compress_days(2.0) - 5.76).abs() < 1e-9);
    }

    #[test]
    fn test_reports_every_problem() {
        let mut config = EpidemicConfig::default();
        config.day_length = 0.0;
        config.household.max_probability = 1.5;
        config.buildings.min_decay_hours = 20.0;
        let errors = validate_config(&config);
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&ConfigError::NonPositiveDayLength(0.0)));
        assert!(errors.contains(&ConfigError::InvalidProbabilityCap(1.5)));
    }

    #[test]
    fn test_nan_day_length_rejected() {
        let mut config = EpidemicConfig::default();
        config.day_length = f64::NAN;
        assert_eq!(validate_config(&config).len(), 1);
    }

    #[test]
    fn test_unsatisfiable_margin() {
        let mut config = EpidemicConfig::default();
        config.npc.death_max_hours = 9.0;
        let errors = validate_config(&config);
        assert!(matches!(
            errors.as_slice(),
            [ConfigError::MarginUnsatisfiable { .. }]
        ));
    }

    #[test]
    fn test_validated_rejects_inverted_window() {
        let mut config = EpidemicConfig::default();
        config.npc.incubation_min_hours = 9.0;
        let err = config.validated().unwrap_err();
        assert_eq!(
            err.0,
            vec![ConfigError::InvalidIncubationWindow { min: 9.0, max: 8.0 }]
        );
        assert!(err.to_string().contains("incubation window [9, 8]"));
        assert!(EpidemicConfig::default().validated().is_ok());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: EpidemicConfig =
            serde_json::from_str(r#"{"determinism":"exposure_only","npc":{"compression":0.2}}"#)
                .unwrap();
        assert_eq!(config.determinism, Determinism::ExposureOnly);
        assert!((config.npc.compression - 0.2).abs() < 1e-9);
        assert!((config.npc.incubation_max_hours - 8.0).abs() < 1e-9);
        assert!((config.day_length - GAME_DAY_LENGTH).abs() < 1e-9);
    }
}
