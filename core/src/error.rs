//! Error kinds (§7 ERROR HANDLING DESIGN).
//!
//! Only the fail-fast/propagated rows of §7's table are represented as
//! `Err`: configuration errors, logic errors surfaced at construction, and
//! I/O failures. Numerical-guard clamping ([`crate::monitors::clamp_negative_concentrations`]),
//! solver-collapse ([`crate::monitors::dt_collapsed`]), and boundary-overrun
//! ([`crate::events::SurfaceMovementController::apply`]) are
//! non-error control flow and never reach `CoreError`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
  #[error("configuration error: {0}")]
  Configuration(String),

  #[error("network description file {path:?} could not be parsed: {reason}")]
  NetworkDescription { path: String, reason: String },

  #[error("checkpoint I/O failed: {0}")]
  Checkpoint(#[from] CheckpointError),
}

#[derive(Debug, Error)]
pub enum CheckpointError {
  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error),

  #[error("(de)serialization error: {0}")]
  Serde(#[from] serde_json::Error),

  #[error("timestep group {0} not found in checkpoint")]
  MissingTimestep(usize),
}

pub type CoreResult<T> = Result<T, CoreError>;
