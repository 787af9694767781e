//! Display helpers for plague state: symptom tags, status buckets, names.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::labels;
use crate::profile::DiseaseSubtype;
use crate::status::{AgentHealthState, BuboLocation, PlagueStatus};

/// Coarse health reading shown to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HealthLabel {
    Sound,
    Fair,
    Deceased,
    Infected,
    Severe,
    Critical,
}

impl HealthLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sound => "SOUND",
            Self::Fair => "FAIR",
            Self::Deceased => "DECEASED",
            Self::Infected => "INFECTED",
            Self::Severe => "SEVERE",
            Self::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for HealthLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn bubo_tag(status: &PlagueStatus) -> String {
    let base = if status.bubo_burst { "Burst buboes" } else { "Buboes" };
    match status.bubo_location {
        BuboLocation::None => base.to_string(),
        location => format!("{base} ({})", location.name()),
    }
}

/// Up to three symptom tags, highest priority first.
///
/// Priority: fever, buboes, weakness, coughing blood, skin bleeding,
/// delirium, gangrene. A symptom is listed once it is above its threshold.
pub fn symptom_labels(status: &PlagueStatus) -> Vec<String> {
    let candidates: [(f32, f32, &str); 7] = [
        (status.fever, labels::FEVER, "Fever"),
        (status.buboes, labels::BUBOES, ""),
        (status.weakness, labels::WEAKNESS, "Weakness"),
        (status.coughing_blood, labels::COUGHING_BLOOD, "Coughing blood"),
        (status.skin_bleeding, labels::SKIN_BLEEDING, "Skin bleeding"),
        (status.delirium, labels::DELIRIUM, "Delirium"),
        (status.gangrene, labels::GANGRENE, "Gangrene"),
    ];

    candidates
        .iter()
        .filter(|(value, threshold, _)| value > threshold)
        .take(labels::MAX_SYMPTOM_TAGS)
        .map(|(_, _, name)| {
            if name.is_empty() {
                bubo_tag(status)
            } else {
                (*name).to_string()
            }
        })
        .collect()
}

/// Bucket an agent's state and severity into a [`HealthLabel`].
pub fn health_status_label(status: &PlagueStatus) -> HealthLabel {
    match status.state {
        AgentHealthState::Healthy => HealthLabel::Sound,
        AgentHealthState::Incubating => HealthLabel::Fair,
        AgentHealthState::Deceased => HealthLabel::Deceased,
        AgentHealthState::Infected => {
            if status.overall_severity >= labels::CRITICAL {
                HealthLabel::Critical
            } else if status.overall_severity >= labels::SEVERE {
                HealthLabel::Severe
            } else {
                HealthLabel::Infected
            }
        }
    }
}

pub fn plague_type_label(subtype: DiseaseSubtype) -> &'static str {
    match subtype {
        DiseaseSubtype::None => "None",
        DiseaseSubtype::Bubonic => "Bubonic Plague",
        DiseaseSubtype::Pneumonic => "Pneumonic Plague",
        DiseaseSubtype::Septicemic => "Septicemic Plague",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn infected() -> PlagueStatus {
        PlagueStatus {
            subtype: DiseaseSubtype::Bubonic,
            state: AgentHealthState::Infected,
            bubo_location: BuboLocation::Groin,
            ..PlagueStatus::healthy()
        }
    }

    #[test]
    fn test_no_tags_when_mild() {
        let mut s = infected();
        s.fever = 40.0;
        s.buboes = 30.0;
        assert!(symptom_labels(&s).is_empty());
    }

    #[test]
    fn test_tags_in_priority_order_and_capped() {
        let mut s = infected();
        s.gangrene = 90.0;
        s.delirium = 90.0;
        s.weakness = 41.0;
        s.fever = 41.0;
        s.buboes = 31.0;
        assert_eq!(symptom_labels(&s), vec!["Fever", "Buboes (groin)", "Weakness"]);
    }

    #[test]
    fn test_burst_annotation() {
        let mut s = infected();
        s.buboes = 50.0;
        s.bubo_burst = true;
        s.bubo_location = BuboLocation::Neck;
        assert_eq!(symptom_labels(&s), vec!["Burst buboes (neck)"]);

        s.bubo_location = BuboLocation::None;
        assert_eq!(symptom_labels(&s), vec!["Burst buboes"]);
    }

    #[test]
    fn test_late_symptoms_surface_when_early_ones_absent() {
        let mut s = infected();
        s.coughing_blood = 31.0;
        s.skin_bleeding = 36.0;
        s.delirium = 41.0;
        s.gangrene = 41.0;
        assert_eq!(
            symptom_labels(&s),
            vec!["Coughing blood", "Skin bleeding", "Delirium"]
        );
    }

    #[test]
    fn test_status_buckets() {
        let mut s = infected();
        assert_eq!(health_status_label(&PlagueStatus::healthy()), HealthLabel::Sound);

        s.overall_severity = 39.9;
        assert_eq!(health_status_label(&s), HealthLabel::Infected);
        s.overall_severity = 40.0;
        assert_eq!(health_status_label(&s), HealthLabel::Severe);
        s.overall_severity = 69.9;
        assert_eq!(health_status_label(&s), HealthLabel::Severe);
        s.overall_severity = 70.0;
        assert_eq!(health_status_label(&s), HealthLabel::Critical);

        s.state = AgentHealthState::Incubating;
        assert_eq!(health_status_label(&s), HealthLabel::Fair);
        s.state = AgentHealthState::Deceased;
        assert_eq!(health_status_label(&s).to_string(), "DECEASED");
    }

    #[test]
    fn test_plague_type_names() {
        assert_eq!(plague_type_label(DiseaseSubtype::None), "None");
        assert_eq!(plague_type_label(DiseaseSubtype::Bubonic), "Bubonic Plague");
        assert_eq!(plague_type_label(DiseaseSubtype::Septicemic), "Septicemic Plague");
    }
}
