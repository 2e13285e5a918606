//! Temperature field variants (§4.F).
//!
//! All three expose `temperature_at(grid, xi, t)`; the assembler compares
//! the result against the network's cached temperature and only pays for
//! a rate rebuild when it has actually moved.

use crate::grid::Grid;
use crate::network::Network;
use crate::trap_mutation::TrapMutationOperator;

/// A constant field, a tabulated depth/time profile, or a field evolved by
/// its own diffusive PDE.
pub enum TemperatureModel {
  Constant(f64),
  /// Bilinearly-interpolated table over (time, depth).
  Profile {
    times: Vec<f64>,
    depths: Vec<f64>,
    /// `values[time_idx][depth_idx]`.
    values: Vec<Vec<f64>>,
  },
  /// Field integrated by an external heat-equation solve; `diffusivity`
  /// scales this module's stencil contribution to that solve.
  HeatEquation { field: Vec<f64>, diffusivity: f64 },
}

fn lerp(a: f64, b: f64, frac: f64) -> f64 {
  a + (b - a) * frac
}

/// Index and interpolation fraction of `x` within a strictly increasing
/// table `axis`, clamped at the ends.
fn locate(axis: &[f64], x: f64) -> (usize, f64) {
  if x <= axis[0] {
    return (0, 0.0);
  }
  let last = axis.len() - 1;
  if x >= axis[last] {
    return (last.saturating_sub(1), 1.0);
  }
  let idx = axis.partition_point(|&v| v <= x).saturating_sub(1).min(last - 1);
  let frac = (x - axis[idx]) / (axis[idx + 1] - axis[idx]);
  (idx, frac)
}

impl TemperatureModel {
  pub fn temperature_at(&self, grid: &Grid, xi: usize, t: f64) -> f64 {
    match self {
      TemperatureModel::Constant(v) => *v,
      TemperatureModel::Profile { times, depths, values } => {
        let depth = grid.depth(xi);
        let (ti, tf) = locate(times, t);
        let (di, df) = locate(depths, depth);
        let row_lo = &values[ti];
        let row_hi = &values[(ti + 1).min(values.len() - 1)];
        let lo = lerp(row_lo[di], row_lo[(di + 1).min(row_lo.len() - 1)], df);
        let hi = lerp(row_hi[di], row_hi[(di + 1).min(row_hi.len() - 1)], df);
        lerp(lo, hi, tf)
      }
      TemperatureModel::HeatEquation { field, .. } => field[xi],
    }
  }

  /// Nonuniform three-point diffusive contribution to the heat-equation
  /// field at interior point `xi` (§4.F); zero for the other variants.
  pub fn diffusive_term(&self, xi: usize, h_l: f64, h_r: f64) -> f64 {
    match self {
      TemperatureModel::HeatEquation { field, diffusivity } => {
        let scale = 2.0 / (h_l + h_r);
        diffusivity * scale * ((field[xi - 1] - field[xi]) / h_l + (field[xi + 1] - field[xi]) / h_r)
      }
      _ => 0.0,
    }
  }

  /// If the temperature at `(xi, t)` differs from the network's cached
  /// value beyond tolerance, rebuild network rates and trap-mutation
  /// rates and return `true` (§4.F, §4.G step 2).
  pub fn refresh_if_changed(
    &self,
    grid: &Grid,
    xi: usize,
    t: f64,
    network: &mut Network,
    trap_mutation: &mut TrapMutationOperator,
  ) -> bool {
    let local_t = self.temperature_at(grid, xi, t);
    if network.maybe_set_temperature(local_t) {
      trap_mutation.update_rate(network);
      true
    } else {
      false
    }
  }
}

#[cfg(test)]
#[path = "temperature_test.rs"]
mod temperature_test;
