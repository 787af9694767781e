//! Period remedies the player can attempt while infected.
//!
//! Effects are immediate and flat, with no cooldown: applying the same
//! remedy twice in one tick stacks. Callers gate availability.

use serde::{Deserialize, Serialize};

use crate::constants::{survival, treatment};
use crate::profile::DiseaseSubtype;
use crate::status::{AgentHealthState, PlagueStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreatmentKind {
    /// Cut open a ripe bubo to drain it.
    LanceBubo,
    Rest,
    Herbs,
    /// Harmful: weakens far more than it cools.
    Bloodletting,
    /// Calms the mind only.
    Prayer,
}

impl TreatmentKind {
    pub const ALL: [TreatmentKind; 5] = [
        Self::LanceBubo,
        Self::Rest,
        Self::Herbs,
        Self::Bloodletting,
        Self::Prayer,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::LanceBubo => "Lance bubo",
            Self::Rest => "Rest",
            Self::Herbs => "Herbs",
            Self::Bloodletting => "Bloodletting",
            Self::Prayer => "Prayer",
        }
    }

    /// Remedies that leave the patient worse off.
    pub fn is_harmful(self) -> bool {
        matches!(self, Self::Bloodletting)
    }
}

/// Whether lancing would take effect: a bubonic case whose bubo is ripe
/// and has not yet burst.
pub fn can_lance(status: &PlagueStatus) -> bool {
    status.state == AgentHealthState::Infected
        && status.subtype == DiseaseSubtype::Bubonic
        && !status.bubo_burst
        && status.buboes > treatment::LANCE_MIN_BUBOES
}

/// Apply a remedy. No-op unless the status is infected.
pub fn attempt_treatment(status: PlagueStatus, kind: TreatmentKind) -> PlagueStatus {
    if status.state != AgentHealthState::Infected {
        return status;
    }

    let mut s = status;
    match kind {
        TreatmentKind::LanceBubo => {
            if !can_lance(&s) {
                return status;
            }
            s.bubo_burst = true;
            s.buboes -= treatment::LANCE_BUBO_RELIEF;
            s.survival_chance = (s.survival_chance + treatment::LANCE_SURVIVAL_BONUS)
                .min(survival::HEALTHY);
        }
        TreatmentKind::Rest => s.weakness -= treatment::REST_RELIEF,
        TreatmentKind::Herbs => s.fever -= treatment::HERBS_RELIEF,
        TreatmentKind::Bloodletting => {
            s.weakness += treatment::BLOODLETTING_WEAKNESS;
            s.fever -= treatment::BLOODLETTING_FEVER_RELIEF;
        }
        TreatmentKind::Prayer => s.delirium -= treatment::PRAYER_RELIEF,
    }
    s.recompute_severity();
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::BuboLocation;

    fn bubonic(buboes: f32) -> PlagueStatus {
        let mut s = PlagueStatus {
            subtype: DiseaseSubtype::Bubonic,
            state: AgentHealthState::Infected,
            bubo_location: BuboLocation::Armpit,
            fever: 50.0,
            weakness: 40.0,
            delirium: 20.0,
            buboes,
            survival_chance: 40.0,
            ..PlagueStatus::healthy()
        };
        s.recompute_severity();
        s
    }

    #[test]
    fn test_lance_ripe_bubo() {
        let s = attempt_treatment(bubonic(80.0), TreatmentKind::LanceBubo);
        assert!(s.bubo_burst);
        assert_eq!(s.buboes, 60.0);
        assert_eq!(s.survival_chance, 70.0);
        assert_eq!(s.overall_severity, 60.0);

        // Already burst: second attempt does nothing.
        assert_eq!(attempt_treatment(s, TreatmentKind::LanceBubo), s);
    }

    #[test]
    fn test_lance_unripe_bubo_noop() {
        let s = bubonic(60.0);
        assert!(!can_lance(&s));
        assert_eq!(attempt_treatment(s, TreatmentKind::LanceBubo), s);
    }

    #[test]
    fn test_lance_requires_bubonic() {
        let mut s = bubonic(80.0);
        s.subtype = DiseaseSubtype::Pneumonic;
        assert_eq!(attempt_treatment(s, TreatmentKind::LanceBubo), s);
    }

    #[test]
    fn test_flat_remedies() {
        let s = bubonic(10.0);
        assert_eq!(attempt_treatment(s, TreatmentKind::Rest).weakness, 35.0);
        assert_eq!(attempt_treatment(s, TreatmentKind::Herbs).fever, 45.0);
        assert_eq!(attempt_treatment(s, TreatmentKind::Prayer).delirium, 17.0);
    }

    #[test]
    fn test_bloodletting_is_net_harmful() {
        let s = attempt_treatment(bubonic(10.0), TreatmentKind::Bloodletting);
        assert_eq!(s.weakness, 50.0);
        assert_eq!(s.fever, 47.0);
        assert!(TreatmentKind::Bloodletting.is_harmful());
    }

    #[test]
    fn test_bloodletting_at_bound_keeps_weakness() {
        let mut s = bubonic(10.0);
        s.weakness = 100.0;
        let after = attempt_treatment(s, TreatmentKind::Bloodletting);
        assert_eq!(after.weakness, 100.0);
    }

    #[test]
    fn test_remedies_stack() {
        let once = attempt_treatment(bubonic(10.0), TreatmentKind::Herbs);
        let twice = attempt_treatment(once, TreatmentKind::Herbs);
        assert_eq!(twice.fever, 40.0);
    }

    #[test]
    fn test_relief_floors_at_zero() {
        let mut s = bubonic(10.0);
        s.delirium = 1.0;
        assert_eq!(attempt_treatment(s, TreatmentKind::Prayer).delirium, 0.0);
    }

    #[test]
    fn test_not_infected_is_identity() {
        let mut s = bubonic(80.0);
        for state in [
            AgentHealthState::Healthy,
            AgentHealthState::Incubating,
            AgentHealthState::Deceased,
        ] {
            s.state = state;
            for kind in TreatmentKind::ALL {
                assert_eq!(attempt_treatment(s, kind), s);
            }
        }
    }
}
