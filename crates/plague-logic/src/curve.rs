//! Disease curve - one profile row viewed at a chosen time resolution.
//!
//! The player machine renders the curve in detail (day bands, symptoms);
//! the NPC machine only samples its onset and death boundaries, compressed
//! into hours. Both read the same [`DiseaseProfile`] so the historical
//! constants live in one place.

use rand::Rng;

use crate::config::NpcTiming;
use crate::profile::{DiseaseProfile, DiseaseSubtype};

/// Onset and death boundaries sampled for one NPC, in compressed hours.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NpcBoundaries {
    pub incubation_hours: f64,
    pub death_hours: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiseaseCurve {
    profile: &'static DiseaseProfile,
}

impl DiseaseCurve {
    pub fn new(profile: &'static DiseaseProfile) -> Self {
        Self { profile }
    }

    /// Curve for a subtype, `None` for [`DiseaseSubtype::None`].
    pub fn for_subtype(subtype: DiseaseSubtype) -> Option<Self> {
        subtype.profile().map(Self::new)
    }

    pub fn profile(&self) -> &'static DiseaseProfile {
        self.profile
    }

    pub fn subtype(&self) -> DiseaseSubtype {
        self.profile.subtype
    }

    /// Whether symptoms have appeared after `days_since_exposure`.
    pub fn onset_reached(&self, days_since_exposure: f64) -> bool {
        days_since_exposure >= self.profile.symptoms_onset_day
    }

    /// Mortality for the current bubo state. Lanced mortality applies only
    /// where the profile defines one.
    pub fn mortality(&self, bubo_burst: bool) -> f32 {
        match (bubo_burst, self.profile.lanced_mortality) {
            (true, Some(lanced)) => lanced,
            _ => self.profile.base_mortality,
        }
    }

    /// Sample the two NPC thresholds: hours from exposure to onset, and
    /// hours from onset to death.
    ///
    /// Incubation is clamped to the configured window; death is pushed past
    /// incubation by the margin and then clamped, which cannot undo the
    /// margin while `incubation_max + margin <= death_max`.
    pub fn sample_npc_boundaries(&self, rng: &mut impl Rng, timing: &NpcTiming) -> NpcBoundaries {
        let incubation_days = self.profile.incubation_days.sample(rng);
        let death_days = self.profile.death_day.sample(rng);

        // max-then-min instead of clamp: an inverted window from an
        // unvalidated config must not panic.
        let incubation_hours = timing
            .compress_days(incubation_days)
            .max(timing.incubation_min_hours)
            .min(timing.incubation_max_hours);
        let death_hours = timing
            .compress_days(death_days)
            .max(incubation_hours + timing.death_margin_hours)
            .max(timing.death_min_hours)
            .min(timing.death_max_hours);

        NpcBoundaries {
            incubation_hours,
            death_hours,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{BUBONIC, PNEUMONIC, SEPTICEMIC};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_none_has_no_curve() {
        assert!(DiseaseCurve::for_subtype(DiseaseSubtype::None).is_none());
        let curve = DiseaseCurve::for_subtype(DiseaseSubtype::Pneumonic);
        assert_eq!(curve.map(|c| c.subtype()), Some(DiseaseSubtype::Pneumonic));
    }

    #[test]
    fn test_onset_threshold() {
        let curve = DiseaseCurve::new(&BUBONIC);
        assert!(!curve.onset_reached(2.99));
        assert!(curve.onset_reached(3.0));
    }

    #[test]
    fn test_mortality_switches_on_burst() {
        let bubonic = DiseaseCurve::new(&BUBONIC);
        assert_eq!(bubonic.mortality(false), 0.60);
        assert_eq!(bubonic.mortality(true), 0.30);

        // No lanced curve: burst flag is ignored.
        let pneumonic = DiseaseCurve::new(&PNEUMONIC);
        assert_eq!(pneumonic.mortality(true), pneumonic.mortality(false));
    }

    #[test]
    fn test_npc_boundaries_within_clamps() {
        let timing = NpcTiming::default();
        let mut rng = StdRng::seed_from_u64(42);
        for profile in [&BUBONIC, &PNEUMONIC, &SEPTICEMIC] {
            let curve = DiseaseCurve::new(profile);
            for _ in 0..200 {
                let b = curve.sample_npc_boundaries(&mut rng, &timing);
                assert!((1.0..=8.0).contains(&b.incubation_hours));
                assert!((4.0..=22.0).contains(&b.death_hours));
                assert!(b.death_hours >= b.incubation_hours + timing.death_margin_hours);
            }
        }
    }

    #[test]
    fn test_inverted_window_does_not_panic() {
        let timing = NpcTiming {
            incubation_min_hours: 9.0,
            incubation_max_hours: 8.0,
            death_min_hours: 30.0,
            death_max_hours: 22.0,
            ..NpcTiming::default()
        };
        let mut rng = StdRng::seed_from_u64(1);
        let b = DiseaseCurve::new(&BUBONIC).sample_npc_boundaries(&mut rng, &timing);
        assert_eq!(b.incubation_hours, 8.0);
        assert_eq!(b.death_hours, 22.0);
    }

    #[test]
    fn test_septicemic_is_faster_than_bubonic() {
        // Compressed septicemic incubation (1–2 days) never exceeds the
        // bubonic floor (2 days).
        let timing = NpcTiming::default();
        let mut rng = StdRng::seed_from_u64(7);
        let septicemic = DiseaseCurve::new(&SEPTICEMIC);
        for _ in 0..100 {
            let b = septicemic.sample_npc_boundaries(&mut rng, &timing);
            assert!(b.incubation_hours <= timing.compress_days(2.0) + 1e-9);
        }
    }
}
