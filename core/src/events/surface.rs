//! Surface movement: density-threshold crossing on the accumulated
//! interstitial count (§4.H.1).

use crate::grid::Grid;
use crate::network::Network;
use crate::species::Species;

/// Outcome of one event-function evaluation. `MoveDown`/`MoveUp` are
/// mutually exclusive by construction — a single call returns at most one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SurfaceEvent {
  None,
  /// Surface index decrements (toward the bulk): `nInterstitial` exceeded
  /// the density threshold.
  MoveDown,
  /// Surface index increments (toward vacuum): `nInterstitial` dropped
  /// below `-threshold/10`.
  MoveUp,
}

/// Tracks the accumulated interstitial excess driving surface motion.
pub struct SurfaceMovementController {
  rho_material: f64,
  v_init: f64,
  /// Dimensionless fraction of incident atoms that rebound from the
  /// surface, subtracted from `nInterstitial` each step.
  sputtering_yield: f64,
  n_interstitial: f64,
  previous_i_flux: f64,
}

impl SurfaceMovementController {
  pub fn new(rho_material: f64, v_init: f64, sputtering_yield: f64) -> Self {
    Self {
      rho_material,
      v_init,
      sputtering_yield,
      n_interstitial: 0.0,
      previous_i_flux: 0.0,
    }
  }

  pub fn n_interstitial(&self) -> f64 {
    self.n_interstitial
  }

  pub fn previous_i_flux(&self) -> f64 {
    self.previous_i_flux
  }

  fn threshold(&self, dx: f64) -> f64 {
    (self.rho_material - self.v_init) * dx
  }

  /// Interstitial efflux into the surface at the immediate interior point:
  /// `sum over I clusters of size * D * C * (2/(hL*(hL+hR))) * hL`.
  pub fn interstitial_efflux(&self, network: &Network, concentrations: &[f64], h_l: f64, h_r: f64) -> f64 {
    let scale = 2.0 / (h_l * (h_l + h_r)) * h_l;
    network
      .catalogue()
      .iter()
      .filter_map(|c| {
        c.species_representative(Species::I)
          .map(|(size, id)| size * network.diffusion_coefficient(id) * concentrations[id.index()] * scale)
      })
      .sum()
  }

  /// Recompute `previousIFlux`, accumulate the counter closure `Δ
  /// nInterstitial = previousIFlux · Δt − sputteringYield · fluxAmplitude ·
  /// Δt` exactly, and report whether a threshold was crossed this step.
  pub fn step(
    &mut self,
    network: &Network,
    concentrations: &[f64],
    h_l: f64,
    h_r: f64,
    dx: f64,
    dt: f64,
    flux_amplitude: f64,
  ) -> SurfaceEvent {
    self.previous_i_flux = self.interstitial_efflux(network, concentrations, h_l, h_r);
    self.n_interstitial += self.previous_i_flux * dt - self.sputtering_yield * flux_amplitude * dt;

    let threshold = self.threshold(dx);
    if self.n_interstitial > threshold {
      SurfaceEvent::MoveDown
    } else if self.n_interstitial < -threshold / 10.0 {
      SurfaceEvent::MoveUp
    } else {
      SurfaceEvent::None
    }
  }

  /// Apply the detected event to `grid`, draining `nInterstitial` one
  /// threshold at a time until it falls below the next one. Returns
  /// `false` if the surface ran off the grid (request integrator
  /// termination, §4.H, §7 "Boundary overrun").
  pub fn apply(&mut self, event: SurfaceEvent, grid: &mut Grid, dx: f64) -> bool {
    match event {
      SurfaceEvent::None => true,
      SurfaceEvent::MoveUp => {
        grid.advance_surface();
        tracing::info!(surface_pos = grid.surface_pos(), n_interstitial = self.n_interstitial, "surface advanced");
        true
      }
      SurfaceEvent::MoveDown => {
        let threshold = self.threshold(dx);
        while self.n_interstitial > threshold {
          if !grid.retreat_surface() {
            tracing::warn!(n_interstitial = self.n_interstitial, "surface retreat ran off the grid");
            return false;
          }
          self.n_interstitial -= threshold;
        }
        tracing::info!(surface_pos = grid.surface_pos(), n_interstitial = self.n_interstitial, "surface retreated");
        true
      }
    }
  }
}

#[cfg(test)]
#[path = "surface_test.rs"]
mod surface_test;
