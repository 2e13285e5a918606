//! Incident-particle depth-profiled injection (§4.E).
//!
//! The depth shape is precomputed once per grid (it only depends on
//! `surfacePos` and the coordinates); the assembler just adds
//! `amplitude(t) * profile[xi]` to the implanted species at every step.

use crate::cluster::ClusterId;
use crate::grid::Grid;

/// Time-dependent scaling applied on top of the depth profile.
#[derive(Clone, Copy, Debug)]
pub enum AmplitudeProfile {
  Constant(f64),
  /// Square pulse train: `base` while `t mod period < duty * period`, else 0.
  Pulsed { base: f64, period: f64, duty: f64 },
}

impl AmplitudeProfile {
  pub fn eval(&self, t: f64) -> f64 {
    match *self {
      AmplitudeProfile::Constant(a) => a,
      AmplitudeProfile::Pulsed { base, period, duty } => {
        if period <= 0.0 {
          return base;
        }
        let phase = t.rem_euclid(period) / period;
        if phase < duty {
          base
        } else {
          0.0
        }
      }
    }
  }
}

/// Precomputed depth-profiled incident flux for one implanted species.
pub struct FluxOperator {
  target: ClusterId,
  /// Exponential depth shape, one entry per grid point, 0 ahead of the
  /// surface.
  profile: Vec<f64>,
  amplitude: AmplitudeProfile,
}

impl FluxOperator {
  pub fn build(target: ClusterId, grid: &Grid, decay_length: f64, amplitude: AmplitudeProfile) -> Self {
    let profile = (0..grid.mx())
      .map(|xi| {
        let d = grid.depth(xi);
        if d < 0.0 {
          0.0
        } else {
          (-d / decay_length).exp()
        }
      })
      .collect();
    Self {
      target,
      profile,
      amplitude,
    }
  }

  pub fn target(&self) -> ClusterId {
    self.target
  }

  pub fn profile_at(&self, xi: usize) -> f64 {
    self.profile[xi]
  }

  /// Add `amplitude(t) * profile[xi]` to `out[target]`.
  pub fn accumulate(&self, t: f64, xi: usize, out: &mut [f64]) {
    out[self.target.index()] += self.amplitude.eval(t) * self.profile[xi];
  }
}

#[cfg(test)]
#[path = "flux_test.rs"]
mod flux_test;
