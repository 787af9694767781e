//! Plague Headless Simulation Harness
//!
//! Validates the pure disease logic, then runs a seeded town outbreak
//! through the ECS engine. Runs entirely in-process, no rendering.
//!
//! Usage:
//!   cargo run -p plague-simtest
//!   cargo run -p plague-simtest -- --verbose --seed 7 --days 21
//!   cargo run -p plague-simtest -- --config crates/plague-simtest/plague.toml --json

use std::path::{Path, PathBuf};

use clap::Parser;
use log::info;
use plague_core::generation::TownConfig;
use plague_core::prelude::*;
use plague_logic::building::{BuildingInfectionAggregator, BuildingStatus, DecayingBuildingTracker};
use plague_logic::config::validate_config;
use plague_logic::exposure::expose_to_plague;
use plague_logic::labels::{health_status_label, plague_type_label, symptom_labels, HealthLabel};
use plague_logic::npc::create_npc_plague_meta;
use plague_logic::player::progress_plague;
use plague_logic::profile::{DiseaseSubtype, PROFILES};
use plague_logic::status::{AgentHealthState, BuboLocation, PlagueStatus};
use plague_logic::treatment::attempt_treatment;
use serde::Deserialize;

#[derive(Parser, Debug)]
#[command(name = "plague-simtest")]
#[command(about = "Headless harness for the plague epidemic engine")]
struct Args {
    /// Print every check, not just failures
    #[arg(long)]
    verbose: bool,

    /// TOML file with [epidemic] and [town] tables
    #[arg(long)]
    config: Option<PathBuf>,

    /// Master seed of the town run
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Simulated days of the town run
    #[arg(long, default_value_t = 14)]
    days: u32,

    /// Citizens initially infected
    #[arg(long, default_value_t = 5)]
    outbreak: usize,

    /// Print the final town snapshot as JSON
    #[arg(long)]
    json: bool,
}

/// Harness configuration file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct HarnessConfig {
    epidemic: EpidemicConfig,
    town: TownConfig,
}

fn load_config(path: &Path) -> Result<HarnessConfig, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    parse_config(&text).map_err(|e| format!("{}: {e}", path.display()))
}

/// Parse and validate a harness config. The simulation sections never see
/// an epidemic config that fails validation.
fn parse_config(text: &str) -> Result<HarnessConfig, String> {
    let harness: HarnessConfig = toml::from_str(text).map_err(|e| format!("cannot parse: {e}"))?;
    let epidemic = harness.epidemic.validated().map_err(|e| e.to_string())?;
    Ok(HarnessConfig { epidemic, ..harness })
}

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    let harness = match &args.config {
        Some(path) => match load_config(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("error: {e}");
                std::process::exit(2);
            }
        },
        None => HarnessConfig::default(),
    };

    println!("=== Plague Simulation Harness ===\n");

    let mut results = Vec::new();

    // 1. Configuration
    results.extend(validate_configuration(&harness.epidemic));

    // 2. Disease profiles
    results.extend(validate_profiles());

    // 3. Exposure resolver statistics
    results.extend(validate_exposure());

    // 4. Player disease course
    results.extend(validate_player_course(&harness.epidemic, args.verbose));

    // 5. NPC thresholds
    results.extend(validate_npc_thresholds(&harness.epidemic));

    // 6. Treatments
    results.extend(validate_treatments());

    // 7. Building markers
    results.extend(validate_building_markers(&harness.epidemic));

    // 8. Labels
    results.extend(validate_labels());

    // 9. Town outbreak
    results.extend(run_town_outbreak(&args, &harness));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || args.verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 1. Configuration ────────────────────────────────────────────────────

fn validate_configuration(config: &EpidemicConfig) -> Vec<TestResult> {
    println!("--- Configuration ---");
    let errors = validate_config(config);
    vec![
        TestResult {
            name: "config_valid".into(),
            passed: errors.is_empty(),
            detail: if errors.is_empty() {
                format!("{:?} determinism, {} s/day", config.determinism, config.day_length)
            } else {
                errors
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("; ")
            },
        },
        TestResult {
            name: "config_default_valid".into(),
            passed: validate_config(&EpidemicConfig::default()).is_empty(),
            detail: "built-in defaults pass validation".into(),
        },
    ]
}

// ── 2. Disease Profiles ─────────────────────────────────────────────────

fn validate_profiles() -> Vec<TestResult> {
    println!("--- Disease Profiles ---");
    let mut results = Vec::new();

    for profile in PROFILES {
        let name = plague_type_label(profile.subtype);
        results.push(TestResult {
            name: format!("profile_{:?}_ranges", profile.subtype).to_lowercase(),
            passed: profile.incubation_days.min <= profile.incubation_days.max
                && profile.death_day.min <= profile.death_day.max
                && (0.0..=1.0).contains(&profile.base_mortality),
            detail: format!(
                "{name}: incubation {}-{} d, onset day {}, death {}-{} d, mortality {:.2}",
                profile.incubation_days.min,
                profile.incubation_days.max,
                profile.symptoms_onset_day,
                profile.death_day.min,
                profile.death_day.max,
                profile.base_mortality
            ),
        });
    }

    let lanced_only_bubonic = PROFILES
        .iter()
        .all(|p| p.lanced_mortality.is_some() == (p.subtype == DiseaseSubtype::Bubonic));
    results.push(TestResult {
        name: "profile_lancing_bubonic_only".into(),
        passed: lanced_only_bubonic,
        detail: "only bubonic defines a lanced mortality".into(),
    });

    results
}

// ── 3. Exposure ─────────────────────────────────────────────────────────

fn validate_exposure() -> Vec<TestResult> {
    println!("--- Exposure Resolver ---");
    let mut results = Vec::new();
    const TRIALS: u64 = 10_000;

    for kind in ExposureKind::ALL {
        let infected: Vec<PlagueStatus> = (0..TRIALS)
            .map(|seed| expose_to_plague(PlagueStatus::healthy(), kind, 1.0, 0.0, Some(seed)))
            .filter(|s| s.state == AgentHealthState::Incubating)
            .collect();
        let rate = infected.len() as f64 / TRIALS as f64;
        let expected = kind.base_probability();
        results.push(TestResult {
            name: format!("exposure_{kind:?}_rate").to_lowercase(),
            passed: (rate - expected).abs() < 0.03,
            detail: format!("{rate:.3} infected (expected {expected:.2})"),
        });

        if kind == ExposureKind::Airborne {
            let all_pneumonic = infected.iter().all(|s| s.subtype == DiseaseSubtype::Pneumonic);
            results.push(TestResult {
                name: "exposure_airborne_pneumonic".into(),
                passed: all_pneumonic,
                detail: format!("{} airborne cases, all pneumonic", infected.len()),
            });
        } else if kind == ExposureKind::Flea {
            let bubonic = infected
                .iter()
                .filter(|s| s.subtype == DiseaseSubtype::Bubonic)
                .count() as f64
                / infected.len().max(1) as f64;
            let groin = infected
                .iter()
                .filter(|s| s.bubo_location == BuboLocation::Groin)
                .count() as f64
                / infected.iter().filter(|s| s.subtype == DiseaseSubtype::Bubonic).count().max(1) as f64;
            results.push(TestResult {
                name: "exposure_flea_subtype_mix".into(),
                passed: (bubonic - 0.80).abs() < 0.04 && (groin - 0.60).abs() < 0.05,
                detail: format!("{bubonic:.2} bubonic, {groin:.2} of buboes in the groin"),
            });
        }
    }

    let zero = (0..1000u64)
        .map(|seed| expose_to_plague(PlagueStatus::healthy(), ExposureKind::Airborne, 0.0, 0.0, Some(seed)))
        .all(|s| s.state == AgentHealthState::Healthy);
    results.push(TestResult {
        name: "exposure_zero_intensity".into(),
        passed: zero,
        detail: "intensity 0 never infects".into(),
    });

    results
}

// ── 4. Player Course ────────────────────────────────────────────────────

fn validate_player_course(config: &EpidemicConfig, verbose: bool) -> Vec<TestResult> {
    println!("--- Player Disease Course ---");
    let mut results = Vec::new();
    let mut deaths = [0usize; 3];
    let mut cases = [0usize; 3];
    let mut monotone = true;
    let mut severity_ok = true;

    for seed in 0..400u64 {
        let status = expose_to_plague(PlagueStatus::healthy(), ExposureKind::Flea, 1.0, 0.0, Some(seed));
        if status.state != AgentHealthState::Incubating {
            continue;
        }
        let index = match status.subtype {
            DiseaseSubtype::Bubonic => 0,
            DiseaseSubtype::Pneumonic => 1,
            _ => 2,
        };
        cases[index] += 1;

        // Six-hour steps: bubonic death rolls are per step.
        let step = 6.0 * config.hour_length();
        let mut current = status;
        let mut t = 0.0;
        while t < 16.0 * config.day_length {
            t += step;
            let next = progress_plague(current, t, config);
            monotone &= current.state.may_become(next.state);
            severity_ok &= next.overall_severity == next.max_symptom();
            current = next;
        }
        if current.state == AgentHealthState::Deceased {
            deaths[index] += 1;
        }
    }

    results.push(TestResult {
        name: "player_states_monotone".into(),
        passed: monotone,
        detail: "no state ever regresses or skips".into(),
    });
    results.push(TestResult {
        name: "player_severity_is_max_symptom".into(),
        passed: severity_ok,
        detail: "overall severity equals the worst symptom after every step".into(),
    });
    results.push(TestResult {
        name: "player_septicemic_always_fatal".into(),
        passed: deaths[2] == cases[2],
        detail: format!("{}/{} septicemic cases died", deaths[2], cases[2]),
    });
    results.push(TestResult {
        name: "player_pneumonic_mostly_fatal".into(),
        passed: cases[1] == 0 || deaths[1] * 10 >= cases[1] * 8,
        detail: format!("{}/{} pneumonic cases died", deaths[1], cases[1]),
    });
    results.push(TestResult {
        name: "player_bubonic_some_survive".into(),
        passed: deaths[0] > 0 && deaths[0] < cases[0],
        detail: format!("{}/{} bubonic cases died", deaths[0], cases[0]),
    });

    if verbose {
        println!(
            "  cases b/p/s: {:?}, deaths: {:?}",
            cases, deaths
        );
    }
    results
}

// ── 5. NPC Thresholds ───────────────────────────────────────────────────

fn validate_npc_thresholds(config: &EpidemicConfig) -> Vec<TestResult> {
    println!("--- NPC Thresholds ---");
    let npc = &config.npc;
    let metas: Vec<_> = (0..10_000u64)
        .map(|seed| create_npc_plague_meta(seed, 0.0, config))
        .collect();

    let in_bounds = metas.iter().all(|m| {
        (npc.incubation_min_hours..=npc.incubation_max_hours).contains(&m.incubation_hours)
            && (npc.death_min_hours..=npc.death_max_hours).contains(&m.death_hours)
    });
    let margin = metas
        .iter()
        .all(|m| m.death_hours >= m.incubation_hours + npc.death_margin_hours);
    let mean_course = metas
        .iter()
        .map(|m| m.incubation_hours + m.death_hours)
        .sum::<f64>()
        / metas.len() as f64;

    vec![
        TestResult {
            name: "npc_thresholds_in_bounds".into(),
            passed: in_bounds,
            detail: format!(
                "incubation [{}, {}] h, death [{}, {}] h over {} seeds",
                npc.incubation_min_hours,
                npc.incubation_max_hours,
                npc.death_min_hours,
                npc.death_max_hours,
                metas.len()
            ),
        },
        TestResult {
            name: "npc_death_margin".into(),
            passed: margin,
            detail: format!("death ≥ incubation + {} h", npc.death_margin_hours),
        },
        TestResult {
            name: "npc_mean_course".into(),
            passed: mean_course > 0.0,
            detail: format!("mean exposure-to-death {mean_course:.1} h"),
        },
    ]
}

// ── 6. Treatments ───────────────────────────────────────────────────────

fn validate_treatments() -> Vec<TestResult> {
    println!("--- Treatments ---");
    let mut ripe = PlagueStatus {
        subtype: DiseaseSubtype::Bubonic,
        state: AgentHealthState::Infected,
        bubo_location: BuboLocation::Groin,
        buboes: 80.0,
        fever: 50.0,
        weakness: 40.0,
        survival_chance: 40.0,
        ..PlagueStatus::healthy()
    };
    ripe.recompute_severity();

    let lanced = attempt_treatment(ripe, TreatmentKind::LanceBubo);
    let again = attempt_treatment(lanced, TreatmentKind::LanceBubo);
    let bled = attempt_treatment(ripe, TreatmentKind::Bloodletting);
    let healthy_untouched = TreatmentKind::ALL
        .iter()
        .all(|&k| attempt_treatment(PlagueStatus::healthy(), k) == PlagueStatus::healthy());

    vec![
        TestResult {
            name: "treatment_lance".into(),
            passed: lanced.bubo_burst && lanced.buboes == 60.0 && lanced.survival_chance == 70.0,
            detail: format!(
                "buboes {} → {}, survival {} → {}",
                ripe.buboes, lanced.buboes, ripe.survival_chance, lanced.survival_chance
            ),
        },
        TestResult {
            name: "treatment_lance_once".into(),
            passed: again == lanced,
            detail: "second lance is a no-op".into(),
        },
        TestResult {
            name: "treatment_bloodletting_harms".into(),
            passed: bled.weakness > ripe.weakness,
            detail: format!("weakness {} → {}", ripe.weakness, bled.weakness),
        },
        TestResult {
            name: "treatment_requires_infection".into(),
            passed: healthy_untouched,
            detail: "remedies do nothing to the healthy".into(),
        },
    ]
}

// ── 7. Building Markers ─────────────────────────────────────────────────

fn validate_building_markers(config: &EpidemicConfig) -> Vec<TestResult> {
    println!("--- Building Markers ---");
    let mut tracker = DecayingBuildingTracker::new(config);
    let hour = config.hour_length();

    tracker.report_occupant(1, AgentHealthState::Infected, 0.0);
    tracker.report_occupant(1, AgentHealthState::Incubating, hour);
    let held = tracker.status_at(1, hour).status;

    tracker.report_occupant(2, AgentHealthState::Deceased, 0.0);
    let fade_hours = 3.0 * config.buildings.max_decay_hours;
    let faded = tracker.status_at(2, fade_hours * hour).status;

    let windows_ok = (0..1000u32).all(|id| {
        let w = tracker.decay_window_hours(id);
        w >= config.buildings.min_decay_hours && w <= config.buildings.max_decay_hours
    });

    vec![
        TestResult {
            name: "building_keeps_worst".into(),
            passed: held == BuildingStatus::Infected,
            detail: format!("infected then incubating report → {}", held.name()),
        },
        TestResult {
            name: "building_decays_to_clear".into(),
            passed: faded == BuildingStatus::Clear,
            detail: format!("deceased marker after {fade_hours} h → {}", faded.name()),
        },
        TestResult {
            name: "building_decay_windows".into(),
            passed: windows_ok,
            detail: format!(
                "per-building windows within [{}, {}] h",
                config.buildings.min_decay_hours, config.buildings.max_decay_hours
            ),
        },
    ]
}

// ── 8. Labels ───────────────────────────────────────────────────────────

fn validate_labels() -> Vec<TestResult> {
    println!("--- Labels ---");
    let mut status = PlagueStatus {
        subtype: DiseaseSubtype::Bubonic,
        state: AgentHealthState::Infected,
        bubo_location: BuboLocation::Armpit,
        fever: 75.0,
        buboes: 72.0,
        weakness: 55.0,
        delirium: 60.0,
        ..PlagueStatus::healthy()
    };
    status.recompute_severity();
    let tags = symptom_labels(&status);

    vec![
        TestResult {
            name: "labels_symptom_priority".into(),
            passed: tags == ["Fever", "Buboes (armpit)", "Weakness"],
            detail: tags.join(", "),
        },
        TestResult {
            name: "labels_critical_bucket".into(),
            passed: health_status_label(&status) == HealthLabel::Critical,
            detail: format!("severity {} → {}", status.overall_severity, health_status_label(&status)),
        },
    ]
}

// ── 9. Town Outbreak ────────────────────────────────────────────────────

fn run_town_outbreak(args: &Args, harness: &HarnessConfig) -> Vec<TestResult> {
    println!("--- Town Outbreak ---");
    let mut results = Vec::new();

    let mut engine = match EpidemicEngine::new(harness.epidemic.clone(), args.seed) {
        Ok(engine) => engine,
        Err(e) => {
            results.push(TestResult {
                name: "town_engine_created".into(),
                passed: false,
                detail: e.to_string(),
            });
            return results;
        }
    };
    let layout = engine.generate(harness.town.clone());
    let population = engine.census().total();

    let ids = engine.agent_ids();
    let stride = (ids.len() / args.outbreak.max(1)).max(1);
    let seeded = ids
        .iter()
        .step_by(stride)
        .take(args.outbreak)
        .filter(|&&id| engine.seed_infection(id).unwrap_or(false))
        .count();
    info!("{} citizens in {}, {} seeded", population, layout.name, seeded);

    let hour = engine.config().hour_length();
    let mut daily = Vec::new();
    for day in 1..=args.days {
        for _ in 0..24 {
            engine.update(hour);
        }
        let census = engine.census();
        if args.verbose {
            println!(
                "  day {:>3}: healthy {:>5}  incubating {:>4}  infected {:>4}  deceased {:>5}  marked {:>3}",
                day,
                census.healthy,
                census.incubating,
                census.infected,
                census.deceased,
                engine.snapshot().buildings.len()
            );
        }
        daily.push(census);
    }

    let conserved = daily.iter().all(|c| c.total() == population);
    results.push(TestResult {
        name: "town_population_conserved".into(),
        passed: conserved,
        detail: format!("{population} citizens in {} buildings", layout.buildings.len()),
    });

    let deaths_monotone = daily.windows(2).all(|w| w[1].deceased >= w[0].deceased);
    let final_census = daily.last().copied().unwrap_or_default();
    results.push(TestResult {
        name: "town_deaths_monotone".into(),
        passed: deaths_monotone,
        detail: format!(
            "{} dead, {} ever infected after {} days",
            final_census.deceased,
            final_census.ever_infected(),
            args.days
        ),
    });

    results.push(TestResult {
        name: "town_seeded_cases_progress".into(),
        passed: seeded == 0 || args.days < 2 || final_census.deceased >= seeded,
        detail: format!("{seeded} seeded cases, all dead within two days"),
    });

    // Save, reload and compare the next day.
    let mut bytes = Vec::new();
    let roundtrip = engine.save(&mut bytes).map_err(|e| e.to_string()).and_then(|_| {
        let mut restored = EpidemicEngine::default();
        restored.load(&bytes[..]).map_err(|e| e.to_string())?;
        for _ in 0..24 {
            engine.update(hour);
            restored.update(hour);
        }
        Ok((engine.census(), restored.census()))
    });
    results.push(match roundtrip {
        Ok((a, b)) => TestResult {
            name: "town_save_load_replay".into(),
            passed: a == b,
            detail: format!("{} byte save, next day {:?}", bytes.len(), a == b),
        },
        Err(e) => TestResult {
            name: "town_save_load_replay".into(),
            passed: false,
            detail: e,
        },
    });

    if args.json {
        match engine.snapshot().to_json() {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!("error: snapshot serialization failed: {e}"),
        }
    }

    results
}
