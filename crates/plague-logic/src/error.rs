//! Error types for invalid epidemic invocations.

use thiserror::Error;

/// Rejected input to an epidemic operation.
///
/// The per-tick operations never surface these; they log and return their
/// input unchanged. Engine-level lookups and the `checked_*` variants do.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EpidemicError {
    #[error("simulated time must be finite and non-negative, got {0}")]
    InvalidSimTime(f64),
    #[error("unknown agent {0}")]
    UnknownAgent(u64),
    #[error("unknown building {0}")]
    UnknownBuilding(u32),
    #[error("no player has been spawned")]
    NoPlayer,
}

/// Validate a simulated timestamp.
pub fn check_sim_time(sim_time: f64) -> Result<f64, EpidemicError> {
    if sim_time.is_finite() && sim_time >= 0.0 {
        Ok(sim_time)
    } else {
        Err(EpidemicError::InvalidSimTime(sim_time))
    }
}
