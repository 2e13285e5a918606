//! Super clusters: distributional moments over a rectangular bundle of
//! compositions (§3, §4.B "Super-cluster flux law").

use smallvec::SmallVec;

use super::ClusterId;
use crate::species::Species;

/// Bounds of a super cluster along one grouped composition axis, e.g.
/// `He in [he_lo, he_hi]`.
#[derive(Clone, Copy, Debug)]
pub struct SuperAxis {
  pub species: Species,
  pub lo: u32,
  pub hi: u32,
}

impl SuperAxis {
  pub fn width(&self) -> u32 {
    self.hi - self.lo + 1
  }

  pub fn mean(&self) -> f64 {
    (self.lo as f64 + self.hi as f64) / 2.0
  }

  /// Contains `n` within `[lo, hi]`.
  pub fn contains(&self, n: u32) -> bool {
    n >= self.lo && n <= self.hi
  }

  /// `d_axis(n) = 2(n - mean) / (width - 1)`, 0 if width == 1 (§4.B).
  pub fn d(&self, n: u32) -> f64 {
    let width = self.width();
    if width <= 1 {
      return 0.0;
    }
    2.0 * (n as f64 - self.mean()) / (width as f64 - 1.0)
  }
}

/// A cluster representing a rectangular bundle of lattice points in
/// composition space via distributional moments.
///
/// `moment_ids[0]` is the zeroth moment (total concentration, `l0`);
/// `moment_ids[1..]` are the first moments, one per axis in `axes`.
#[derive(Clone, Debug)]
pub struct SuperCluster {
  pub axes: SmallVec<[SuperAxis; 2]>,
  pub moment_ids: SmallVec<[ClusterId; 4]>,
  /// Total number of regular lattice points enclosed (`nTot`).
  pub n_tot: u64,
}

impl SuperCluster {
  pub fn l0_id(&self) -> ClusterId {
    self.moment_ids[0]
  }

  /// True if the given per-axis counts fall within every axis's bounds.
  pub fn is_in(&self, counts: &[(Species, u32)]) -> bool {
    self.axes.iter().all(|axis| {
      counts
        .iter()
        .find(|(s, _)| *s == axis.species)
        .map(|(_, n)| axis.contains(*n))
        .unwrap_or(axis.contains(0))
    })
  }

  /// Reconstructed concentration at an interior lattice point via the
  /// linear moment expansion: `C(point) = l0 + sum_axis d_axis(n) * l1_axis`.
  pub fn reconstruct(&self, point_counts: &[(Species, u32)], moment_values: &[f64]) -> f64 {
    let mut c = moment_values[0];
    for (axis_idx, axis) in self.axes.iter().enumerate() {
      let n = point_counts
        .iter()
        .find(|(s, _)| *s == axis.species)
        .map(|(_, n)| *n)
        .unwrap_or(0);
      c += axis.d(n) * moment_values[axis_idx + 1];
    }
    c
  }

  /// `C_super(mean_he, mean_v, ...) == l0` — the moment-consistency
  /// invariant from §8, true by construction since `d_axis(mean) == 0`.
  pub fn mean_point_counts(&self) -> Vec<(Species, u32)> {
    self
      .axes
      .iter()
      .map(|axis| (axis.species, ((axis.lo + axis.hi) / 2)))
      .collect()
  }
}

#[cfg(test)]
#[path = "super_cluster_test.rs"]
mod super_cluster_test;
