//! Epidemic constants - the fixed tables behind exposure, symptoms and treatment.
//!
//! Plain numeric constants with no engine dependency. Both the ECS engine
//! and the headless simtest use these.

pub mod time {
    /// Simulated seconds per simulated day.
    pub const GAME_DAY_LENGTH: f64 = 86_400.0;
    pub const HOURS_PER_DAY: f64 = 24.0;
    /// Simulated seconds per simulated hour.
    pub const GAME_HOUR_LENGTH: f64 = GAME_DAY_LENGTH / HOURS_PER_DAY;
}

pub mod symptoms {
    pub const MIN: f32 = 0.0;
    pub const MAX: f32 = 100.0;
    /// Pneumonic symptoms plateau here instead of reaching the bound.
    pub const PNEUMONIC_CAP: f32 = 95.0;
}

pub mod exposure {
    pub const FLEA_PROBABILITY: f64 = 0.30;
    pub const AIRBORNE_PROBABILITY: f64 = 0.60;
    pub const CONTACT_PROBABILITY: f64 = 0.10;

    /// Cumulative subtype weights for non-airborne infection.
    pub const BUBONIC_WEIGHT: f64 = 0.80;
    pub const PNEUMONIC_WEIGHT: f64 = 0.15;

    /// Cumulative bubo location weights.
    pub const GROIN_WEIGHT: f64 = 0.60;
    pub const ARMPIT_WEIGHT: f64 = 0.30;
}

pub mod survival {
    pub const HEALTHY: f32 = 100.0;
    pub const BUBONIC_INITIAL: f32 = 40.0;
    pub const PNEUMONIC_INITIAL: f32 = 5.0;
    pub const SEPTICEMIC_INITIAL: f32 = 2.0;
    /// Added to the bubonic band once the bubo has burst or been lanced.
    pub const BURST_BONUS: f32 = 30.0;
}

pub mod treatment {
    pub const LANCE_MIN_BUBOES: f32 = 60.0;
    pub const LANCE_BUBO_RELIEF: f32 = 20.0;
    pub const LANCE_SURVIVAL_BONUS: f32 = 30.0;
    pub const REST_RELIEF: f32 = 5.0;
    pub const HERBS_RELIEF: f32 = 5.0;
    pub const BLOODLETTING_WEAKNESS: f32 = 10.0;
    pub const BLOODLETTING_FEVER_RELIEF: f32 = 3.0;
    pub const PRAYER_RELIEF: f32 = 3.0;
}

pub mod labels {
    pub const MAX_SYMPTOM_TAGS: usize = 3;
    pub const FEVER: f32 = 40.0;
    pub const BUBOES: f32 = 30.0;
    pub const WEAKNESS: f32 = 40.0;
    pub const COUGHING_BLOOD: f32 = 30.0;
    pub const SKIN_BLEEDING: f32 = 35.0;
    pub const DELIRIUM: f32 = 40.0;
    pub const GANGRENE: f32 = 40.0;
    /// Overall severity at or above which an infected agent reads SEVERE.
    pub const SEVERE: f32 = 40.0;
    /// Overall severity at or above which an infected agent reads CRITICAL.
    pub const CRITICAL: f32 = 70.0;
}
