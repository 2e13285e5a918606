//! Checkpoint I/O boundary (§4.I, §6 "Persisted file layout").
//!
//! The real system checkpoints through HDF5; this crate mirrors the same
//! group/subgroup/dataset shape on top of `serde_json` so the format is
//! inspectable and dependency-light while the on-disk layout's semantics
//! (one record per timestep, sparse `(id, value)` concentrations, grid
//! vector, scalar counters) carry over unchanged.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CheckpointError, CoreResult};

/// One timestep's persisted state — the `concentrationsGroup/<n>` subgroup
/// of §6.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TimestepRecord {
  pub time: f64,
  pub previous_time: f64,
  pub delta_t: f64,
  pub loop_number: u64,
  pub timestep_index: usize,
  pub grid: Vec<f64>,
  pub n_interstitial: Option<f64>,
  pub previous_i_flux: Option<f64>,
  pub n_helium: Option<f64>,
  pub previous_he_flux: Option<f64>,
  pub n_deuterium: Option<f64>,
  pub previous_d_flux: Option<f64>,
  pub n_tritium: Option<f64>,
  pub previous_t_flux: Option<f64>,
  /// `concs[xi]` is the sparse `(id, value)` list for grid point `xi`.
  pub concs: Vec<Vec<(u32, f64)>>,
}

/// Dense concentration row -> sparse `(id, value)` pairs, dropping exact
/// zeros (`concs` dataset, §6).
pub fn sparsify(row: &[f64]) -> Vec<(u32, f64)> {
  row
    .iter()
    .enumerate()
    .filter(|(_, &v)| v != 0.0)
    .map(|(id, &v)| (id as u32, v))
    .collect()
}

/// Sparse pairs -> dense row of length `n`.
pub fn densify(pairs: &[(u32, f64)], n: usize) -> Vec<f64> {
  let mut row = vec![0.0; n];
  for &(id, v) in pairs {
    row[id as usize] = v;
  }
  row
}

/// The full `concentrationsGroup`: one [`TimestepRecord`] per subgroup,
/// in write order.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Checkpoint {
  timesteps: Vec<TimestepRecord>,
}

impl Checkpoint {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn push(&mut self, record: TimestepRecord) {
    self.timesteps.push(record);
  }

  pub fn len(&self) -> usize {
    self.timesteps.len()
  }

  pub fn is_empty(&self) -> bool {
    self.timesteps.is_empty()
  }

  pub fn get(&self, timestep_index: usize) -> Result<&TimestepRecord, CheckpointError> {
    self
      .timesteps
      .iter()
      .find(|r| r.timestep_index == timestep_index)
      .ok_or(CheckpointError::MissingTimestep(timestep_index))
  }

  /// Per-process write is conceptually parallel in the real system (only
  /// rank 0 writes scalar headers); this single-file mirror writes the
  /// whole group atomically from whichever process calls it.
  pub fn write_to(&self, path: impl AsRef<Path>) -> CoreResult<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| {
      tracing::error!(path = %path.display(), error = %e, "failed to create checkpoint file");
      CheckpointError::Io(e)
    })?;
    serde_json::to_writer_pretty(BufWriter::new(file), self).map_err(|e| {
      tracing::error!(path = %path.display(), error = %e, "failed to serialize checkpoint");
      CheckpointError::Serde(e)
    })?;
    Ok(())
  }

  pub fn read_from(path: impl AsRef<Path>) -> CoreResult<Self> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
      tracing::error!(path = %path.display(), error = %e, "failed to open checkpoint file");
      CheckpointError::Io(e)
    })?;
    let checkpoint = serde_json::from_reader(BufReader::new(file)).map_err(|e| {
      tracing::error!(path = %path.display(), error = %e, "failed to deserialize checkpoint");
      CheckpointError::Serde(e)
    })?;
    Ok(checkpoint)
  }
}

#[cfg(test)]
#[path = "checkpoint_test.rs"]
mod checkpoint_test;
