//! Player progression - day-banded symptom simulation.
//!
//! Symptoms grow at per-day rates integrated over the time since the last
//! step, so remedies applied between steps persist and symptom growth does
//! not depend on how often the caller ticks. The bubonic death roll in days
//! 7 to 10 fires once per step, so its odds do. Burst and death rolls come
//! from a [`RollSource`] keyed on the status seed.
//!
//! # Bubonic day bands (days since onset)
//!
//! | Days | Effect |
//! |------|--------|
//! | `< 2` | fever, weakness, buboes rise |
//! | `2..4` | buboes peak; from day 3 a 20%/day spontaneous burst |
//! | `4..=7` | skin bleeding, delirium; gangrene from day 6 |
//! | `7..=10` | each step rolls death at `mortality × 0.1` |
//! | `> 10` | survivor: symptoms decay, state stays `Infected` |

use log::{debug, info, warn};

use crate::config::EpidemicConfig;
use crate::constants::symptoms::{MAX, PNEUMONIC_CAP};
use crate::constants::survival;
use crate::curve::DiseaseCurve;
use crate::error::{check_sim_time, EpidemicError};
use crate::profile::DiseaseSubtype;
use crate::seed::{salts, RollSource};
use crate::status::{AgentHealthState, PlagueStatus};

/// Spontaneous bubo burst chance per day, from day 3.
const BURST_CHANCE_PER_DAY: f64 = 0.20;
/// Visible bubo severity lost when a bubo bursts on its own.
const BURST_BUBO_DROP: f32 = 30.0;
/// Bubonic death rolls use `mortality × this` per step.
const BUBONIC_DEATH_ROLL_SCALE: f64 = 0.1;
/// Pneumonic death chance per day from day 3.
const PNEUMONIC_DAILY_DEATH: f64 = 0.5;
/// Septicemic cases die unconditionally on this day.
const SEPTICEMIC_DEATH_DAY: f32 = 2.0;
/// Daily symptom decay for bubonic survivors.
const RECOVERY_DECAY_PER_DAY: f32 = 10.0;

/// Advance the player's plague by one step at `sim_time`.
///
/// Healthy and deceased statuses are returned unchanged, as are calls with
/// an invalid time.
pub fn progress_plague(status: PlagueStatus, sim_time: f64, config: &EpidemicConfig) -> PlagueStatus {
    match checked_progress_plague(status, sim_time, config) {
        Ok(next) => next,
        Err(e) => {
            warn!("player progression ignored: {e}");
            status
        }
    }
}

/// Like [`progress_plague`] but surfaces an invalid time.
pub fn checked_progress_plague(
    status: PlagueStatus,
    sim_time: f64,
    config: &EpidemicConfig,
) -> Result<PlagueStatus, EpidemicError> {
    if status.state.is_inert() {
        return Ok(status);
    }
    let sim_time = check_sim_time(sim_time)?;
    let Some(curve) = DiseaseCurve::for_subtype(status.subtype) else {
        return Ok(status);
    };

    let mut next = status;
    if next.state == AgentHealthState::Incubating {
        advance_incubation(&mut next, sim_time, &curve, config);
        return Ok(next);
    }

    if next.onset_time.is_none() {
        next.onset_time = Some(sim_time);
        next.last_progress_time = sim_time;
    }
    let onset = next.onset_time.unwrap_or(sim_time);
    let day = config.seconds_to_days((sim_time - onset).max(0.0)) as f32;
    let dt = config.seconds_to_days((sim_time - next.last_progress_time).max(0.0)) as f32;
    next.days_infected = day;
    next.last_progress_time = sim_time;

    let rolls = RollSource::new(next.rng_seed, config.determinism);
    match next.subtype {
        DiseaseSubtype::Bubonic => progress_bubonic(&mut next, day, dt, sim_time, &curve, &rolls),
        DiseaseSubtype::Pneumonic => progress_pneumonic(&mut next, day, dt, &rolls),
        DiseaseSubtype::Septicemic => progress_septicemic(&mut next, day, dt),
        DiseaseSubtype::None => {}
    }

    next.recompute_severity();
    if next.state == AgentHealthState::Deceased {
        next.survival_chance = 0.0;
        info!(
            "player died of {:?} plague on day {:.1}",
            next.subtype, next.days_infected
        );
    }
    Ok(next)
}

fn advance_incubation(
    status: &mut PlagueStatus,
    sim_time: f64,
    curve: &DiseaseCurve,
    config: &EpidemicConfig,
) {
    // Placed into incubation without an exposure: start the clock now.
    let exposed_at = *status.exposure_time.get_or_insert(sim_time);
    status.last_progress_time = sim_time;

    let days_since_exposure = config.seconds_to_days((sim_time - exposed_at).max(0.0));
    if !curve.onset_reached(days_since_exposure) {
        return;
    }

    status.state = AgentHealthState::Infected;
    status.onset_time = Some(sim_time);
    status.days_infected = 0.0;
    seed_initial_symptoms(status);
    status.survival_chance = survival_for(status, 0.0);
    status.recompute_severity();
    debug!("player symptomatic with {:?} plague", status.subtype);
}

fn seed_initial_symptoms(s: &mut PlagueStatus) {
    match s.subtype {
        DiseaseSubtype::Bubonic => {
            s.fever = s.fever.max(30.0);
            s.weakness = s.weakness.max(20.0);
            s.buboes = s.buboes.max(25.0);
        }
        DiseaseSubtype::Pneumonic => {
            s.fever = s.fever.max(40.0);
            s.weakness = s.weakness.max(30.0);
            s.coughing_blood = s.coughing_blood.max(25.0);
        }
        DiseaseSubtype::Septicemic => {
            s.fever = s.fever.max(45.0);
            s.skin_bleeding = s.skin_bleeding.max(30.0);
            s.weakness = s.weakness.max(35.0);
        }
        DiseaseSubtype::None => {}
    }
}

/// Grow `value` by `amount` without exceeding `cap`. Values already above
/// the cap are left alone.
fn rise(value: f32, amount: f32, cap: f32) -> f32 {
    if value >= cap {
        value
    } else {
        (value + amount).min(cap)
    }
}

fn progress_bubonic(
    s: &mut PlagueStatus,
    day: f32,
    dt: f32,
    sim_time: f64,
    curve: &DiseaseCurve,
    rolls: &RollSource,
) {
    if day < 2.0 {
        s.fever = rise(s.fever, 25.0 * dt, 85.0);
        s.weakness = rise(s.weakness, 15.0 * dt, 70.0);
        s.buboes = rise(s.buboes, 30.0 * dt, 90.0);
    } else if day < 4.0 {
        if !s.bubo_burst {
            s.buboes = rise(s.buboes, 20.0 * dt, 95.0);
        }
        s.fever = rise(s.fever, 10.0 * dt, 90.0);
        s.weakness = rise(s.weakness, 10.0 * dt, 80.0);
        if day >= 3.0
            && !s.bubo_burst
            && rolls.daily(salts::BURST, day as u64) < BURST_CHANCE_PER_DAY
        {
            s.bubo_burst = true;
            s.buboes = (s.buboes - BURST_BUBO_DROP).max(0.0);
            debug!("player bubo ({}) burst on day {day:.1}", s.bubo_location.name());
        }
    } else if day <= 7.0 {
        s.fever = rise(s.fever, 5.0 * dt, 95.0);
        s.weakness = rise(s.weakness, 8.0 * dt, 90.0);
        s.skin_bleeding = rise(s.skin_bleeding, 15.0 * dt, 90.0);
        s.delirium = rise(s.delirium, 12.0 * dt, 85.0);
        if day >= 6.0 {
            s.gangrene = rise(s.gangrene, 20.0 * dt, 90.0);
        }
    } else if day <= 10.0 {
        let chance = f64::from(curve.mortality(s.bubo_burst)) * BUBONIC_DEATH_ROLL_SCALE;
        if rolls.per_tick(salts::DEATH, sim_time) < chance {
            s.state = AgentHealthState::Deceased;
            return;
        }
    } else {
        let decay = RECOVERY_DECAY_PER_DAY * dt;
        for field in [
            &mut s.fever,
            &mut s.weakness,
            &mut s.buboes,
            &mut s.coughing_blood,
            &mut s.skin_bleeding,
            &mut s.delirium,
            &mut s.gangrene,
        ] {
            *field = (*field - decay).max(0.0);
        }
    }
    s.survival_chance = survival_for(s, day);
}

fn progress_pneumonic(s: &mut PlagueStatus, day: f32, dt: f32, rolls: &RollSource) {
    s.fever = rise(s.fever, 20.0 * dt, PNEUMONIC_CAP);
    s.weakness = rise(s.weakness, 18.0 * dt, PNEUMONIC_CAP);
    s.coughing_blood = rise(s.coughing_blood, 22.0 * dt, PNEUMONIC_CAP);
    if day >= 1.0 {
        s.delirium = rise(s.delirium, 12.0 * dt, PNEUMONIC_CAP);
    }
    if day >= 3.0 && rolls.daily(salts::DEATH, day as u64) < PNEUMONIC_DAILY_DEATH {
        s.state = AgentHealthState::Deceased;
        return;
    }
    s.survival_chance = survival_for(s, day);
}

fn progress_septicemic(s: &mut PlagueStatus, day: f32, dt: f32) {
    s.fever = rise(s.fever, 30.0 * dt, MAX);
    s.skin_bleeding = rise(s.skin_bleeding, 35.0 * dt, MAX);
    s.weakness = rise(s.weakness, 30.0 * dt, MAX);
    s.delirium = rise(s.delirium, 25.0 * dt, MAX);
    s.gangrene = rise(s.gangrene, 20.0 * dt, MAX);
    if day >= SEPTICEMIC_DEATH_DAY {
        s.state = AgentHealthState::Deceased;
        return;
    }
    s.survival_chance = survival_for(s, day);
}

/// Survival chance (percent) for the subtype, day band and bubo state.
pub fn survival_for(status: &PlagueStatus, day: f32) -> f32 {
    match status.subtype {
        DiseaseSubtype::Bubonic => {
            let band = if day < 4.0 {
                survival::BUBONIC_INITIAL
            } else if day <= 7.0 {
                30.0
            } else if day <= 10.0 {
                25.0
            } else {
                60.0
            };
            let bonus = if status.bubo_burst {
                survival::BURST_BONUS
            } else {
                0.0
            };
            (band + bonus).min(MAX)
        }
        DiseaseSubtype::Pneumonic => {
            if day < 3.0 {
                survival::PNEUMONIC_INITIAL
            } else {
                2.0
            }
        }
        DiseaseSubtype::Septicemic => {
            if day < 1.0 {
                survival::SEPTICEMIC_INITIAL
            } else {
                1.0
            }
        }
        DiseaseSubtype::None => survival::HEALTHY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::time::GAME_DAY_LENGTH;
    use crate::status::BuboLocation;

    const DAY: f64 = GAME_DAY_LENGTH;

    fn incubating(subtype: DiseaseSubtype, seed: u64) -> PlagueStatus {
        PlagueStatus {
            subtype,
            state: AgentHealthState::Incubating,
            exposure_time: Some(0.0),
            bubo_location: if subtype == DiseaseSubtype::Bubonic {
                BuboLocation::Groin
            } else {
                BuboLocation::None
            },
            survival_chance: subtype.initial_survival(),
            rng_seed: seed,
            ..PlagueStatus::healthy()
        }
    }

    /// Tick every `step` seconds up to `until`, returning every state seen.
    fn run(mut s: PlagueStatus, step: f64, until: f64) -> (PlagueStatus, Vec<PlagueStatus>) {
        let config = EpidemicConfig::default();
        let mut history = Vec::new();
        let mut t = 0.0;
        while t <= until {
            s = progress_plague(s, t, &config);
            history.push(s);
            t += step;
        }
        (s, history)
    }

    #[test]
    fn test_healthy_and_deceased_are_identity() {
        let config = EpidemicConfig::default();
        let healthy = PlagueStatus::healthy();
        assert_eq!(progress_plague(healthy, 5.0 * DAY, &config), healthy);

        let mut dead = incubating(DiseaseSubtype::Pneumonic, 1);
        dead.state = AgentHealthState::Deceased;
        dead.fever = 90.0;
        assert_eq!(progress_plague(dead, 5.0 * DAY, &config), dead);
    }

    #[test]
    fn test_incubation_waits_for_onset_day() {
        let config = EpidemicConfig::default();
        let s = incubating(DiseaseSubtype::Bubonic, 1);
        let early = progress_plague(s, 2.5 * DAY, &config);
        assert_eq!(early.state, AgentHealthState::Incubating);
        assert_eq!(early.overall_severity, 0.0);

        let onset = progress_plague(early, 3.0 * DAY, &config);
        assert_eq!(onset.state, AgentHealthState::Infected);
        assert_eq!(onset.onset_time, Some(3.0 * DAY));
        assert_eq!(onset.fever, 30.0);
        assert_eq!(onset.weakness, 20.0);
        assert_eq!(onset.buboes, 25.0);
        assert_eq!(onset.overall_severity, 30.0);
    }

    #[test]
    fn test_initial_symptoms_per_subtype() {
        let config = EpidemicConfig::default();
        let p = progress_plague(incubating(DiseaseSubtype::Pneumonic, 1), DAY, &config);
        assert_eq!(p.state, AgentHealthState::Infected);
        assert_eq!(p.coughing_blood, 25.0);
        assert_eq!(p.fever, 40.0);

        let s = progress_plague(incubating(DiseaseSubtype::Septicemic, 1), DAY, &config);
        assert_eq!(s.skin_bleeding, 30.0);
        assert_eq!(s.weakness, 35.0);
        assert_eq!(s.overall_severity, 45.0);
    }

    #[test]
    fn test_severity_is_max_every_step() {
        for seed in 0..20 {
            let (_, history) = run(incubating(DiseaseSubtype::Bubonic, seed), DAY / 8.0, 14.0 * DAY);
            for s in history {
                assert_eq!(s.overall_severity, s.max_symptom());
                for v in s.symptoms() {
                    assert!((0.0..=100.0).contains(&v));
                }
            }
        }
    }

    #[test]
    fn test_septicemic_always_dies_by_day_two() {
        for seed in 0..10 {
            let (end, _) = run(incubating(DiseaseSubtype::Septicemic, seed), DAY / 4.0, 4.0 * DAY);
            assert_eq!(end.state, AgentHealthState::Deceased);
            assert_eq!(end.survival_chance, 0.0);
        }
    }

    #[test]
    fn test_pneumonic_symptoms_capped_and_monotone() {
        let (_, history) = run(incubating(DiseaseSubtype::Pneumonic, 3), DAY / 6.0, 3.0 * DAY);
        let infected: Vec<_> = history
            .iter()
            .filter(|s| s.state == AgentHealthState::Infected)
            .collect();
        for pair in infected.windows(2) {
            assert!(pair[1].fever >= pair[0].fever);
            assert!(pair[1].coughing_blood >= pair[0].coughing_blood);
        }
        for s in infected {
            assert!(s.fever <= PNEUMONIC_CAP);
            assert!(s.coughing_blood <= PNEUMONIC_CAP);
        }
    }

    #[test]
    fn test_pneumonic_usually_dies() {
        let deaths = (0..50)
            .filter(|&seed| {
                let (end, _) = run(incubating(DiseaseSubtype::Pneumonic, seed), DAY / 4.0, 15.0 * DAY);
                end.state == AgentHealthState::Deceased
            })
            .count();
        // 50% per day from day 3 over a dozen days.
        assert!(deaths >= 45, "only {deaths} deaths");
    }

    #[test]
    fn test_bubonic_secondary_symptoms_appear() {
        let config = EpidemicConfig::default();
        let mut s = progress_plague(incubating(DiseaseSubtype::Bubonic, 4), 3.0 * DAY, &config);
        let onset = 3.0 * DAY;
        for quarter in 1..=(7 * 4) {
            s = progress_plague(s, onset + f64::from(quarter) * DAY / 4.0, &config);
        }
        assert_eq!(s.state, AgentHealthState::Infected);
        assert!(s.skin_bleeding > 0.0);
        assert!(s.delirium > 0.0);
        assert!(s.gangrene > 0.0);
    }

    #[test]
    fn test_no_gangrene_before_day_six() {
        let config = EpidemicConfig::default();
        let onset = 3.0 * DAY;
        let mut s = progress_plague(incubating(DiseaseSubtype::Bubonic, 4), onset, &config);
        for quarter in 1..=(5 * 4) {
            s = progress_plague(s, onset + f64::from(quarter) * DAY / 4.0, &config);
        }
        assert_eq!(s.gangrene, 0.0);
    }

    #[test]
    fn test_bubonic_survivors_recover_while_infected() {
        let survivors: Vec<_> = (0..200)
            .map(|seed| run(incubating(DiseaseSubtype::Bubonic, seed), DAY / 2.0, 25.0 * DAY).0)
            .filter(|s| s.state == AgentHealthState::Infected)
            .collect();
        assert!(!survivors.is_empty());
        for s in survivors {
            assert!(s.days_infected > 10.0);
            assert!(s.overall_severity < 40.0, "severity {}", s.overall_severity);
        }
    }

    #[test]
    fn test_burst_raises_survival_band() {
        let mut s = incubating(DiseaseSubtype::Bubonic, 1);
        assert_eq!(survival_for(&s, 5.0), 30.0);
        s.bubo_burst = true;
        assert_eq!(survival_for(&s, 5.0), 60.0);
        assert_eq!(survival_for(&s, 1.0), 70.0);
    }

    #[test]
    fn test_spontaneous_burst_from_day_three() {
        let mut burst_cases = 0u32;
        let (mut burst_deaths, mut intact_deaths, mut intact_cases) = (0u32, 0u32, 0u32);

        for seed in 0..1000 {
            let (last, history) = run(incubating(DiseaseSubtype::Bubonic, seed), DAY / 4.0, 15.0 * DAY);
            let mut burst_at = None;
            for pair in history.windows(2) {
                let (prev, now) = (pair[0], pair[1]);
                assert!(!prev.bubo_burst || now.bubo_burst, "burst undone for seed {seed}");
                if !prev.bubo_burst && now.bubo_burst {
                    assert!(burst_at.is_none(), "second burst for seed {seed}");
                    assert!(now.days_infected >= 3.0 && now.days_infected < 4.0);
                    // Growth over one step is at most 5, the drop is 30.
                    assert!(now.buboes < prev.buboes - 24.0, "seed {seed}: {} -> {}", prev.buboes, now.buboes);
                    burst_at = Some(now.days_infected);
                }
            }

            let died = last.state == AgentHealthState::Deceased;
            if burst_at.is_some() {
                burst_cases += 1;
                burst_deaths += u32::from(died);
            } else {
                intact_cases += 1;
                intact_deaths += u32::from(died);
            }
        }

        // 20% burst chance on day 3.
        assert!((150..=250).contains(&burst_cases), "{burst_cases} bursts");
        // Lanced mortality halves the per-step death roll.
        let burst_rate = f64::from(burst_deaths) / f64::from(burst_cases);
        let intact_rate = f64::from(intact_deaths) / f64::from(intact_cases);
        assert!(burst_rate + 0.1 < intact_rate, "burst {burst_rate:.2} vs intact {intact_rate:.2}");
    }

    #[test]
    fn test_full_determinism_replays_bit_identical() {
        for seed in 0..10 {
            let (a, ha) = run(incubating(DiseaseSubtype::Bubonic, seed), DAY / 3.0, 14.0 * DAY);
            let (b, hb) = run(incubating(DiseaseSubtype::Bubonic, seed), DAY / 3.0, 14.0 * DAY);
            assert_eq!(a, b);
            assert_eq!(ha, hb);
        }
    }

    #[test]
    fn test_states_never_reverse() {
        for seed in 0..30 {
            let (_, history) = run(incubating(DiseaseSubtype::Bubonic, seed), DAY / 4.0, 20.0 * DAY);
            for pair in history.windows(2) {
                assert!(pair[0].state.may_become(pair[1].state));
            }
        }
    }

    #[test]
    fn test_invalid_time_rejected() {
        let config = EpidemicConfig::default();
        let s = incubating(DiseaseSubtype::Bubonic, 1);
        assert_eq!(
            checked_progress_plague(s, -1.0, &config),
            Err(EpidemicError::InvalidSimTime(-1.0))
        );
        assert_eq!(progress_plague(s, f64::NAN, &config), s);
    }

    #[test]
    fn test_backfills_missing_exposure_time() {
        let config = EpidemicConfig::default();
        let mut s = incubating(DiseaseSubtype::Pneumonic, 1);
        s.exposure_time = None;
        let s = progress_plague(s, 10.0 * DAY, &config);
        assert_eq!(s.exposure_time, Some(10.0 * DAY));
        assert_eq!(s.state, AgentHealthState::Incubating);
    }

    #[test]
    fn test_exposure_only_mode_still_progresses() {
        let config = EpidemicConfig {
            determinism: crate::config::Determinism::ExposureOnly,
            ..EpidemicConfig::default()
        };
        let mut s = incubating(DiseaseSubtype::Septicemic, 1);
        let mut t = 0.0;
        while t <= 4.0 * DAY {
            s = progress_plague(s, t, &config);
            t += DAY / 4.0;
        }
        assert_eq!(s.state, AgentHealthState::Deceased);
    }
}
