//! Bubble bursting: nascent-bubble radius against distance from the
//! surface, deterministic or probabilistic (§4.H.2).

use rand::Rng;

use crate::grid::Grid;
use crate::species::Species;

/// Depth-scale/lattice-constant parameters for one material's bursting
/// model, plus the incident-flux amplitude that scales the probabilistic
/// prefactor.
pub struct BubbleBurstController {
  lattice_constant: f64,
  depth_scale: f64,
  flux_amplitude: f64,
}

impl BubbleBurstController {
  pub fn new(lattice_constant: f64, depth_scale: f64, flux_amplitude: f64) -> Self {
    Self {
      lattice_constant,
      depth_scale,
      flux_amplitude,
    }
  }

  /// Nascent-bubble radius from the local He density (§4.H.2).
  pub fn nascent_radius(&self, he_density: f64, dx: f64) -> f64 {
    let a = self.lattice_constant;
    let n_v = he_density * dx / 4.0;
    let cube_term = |x: f64| (3.0 * a.powi(3) * x / (8.0 * std::f64::consts::PI)).cbrt();
    (3.0f64.sqrt() / 4.0) * a + cube_term(n_v) - cube_term(1.0)
  }

  /// Burst probability once `r < d` (not already a deterministic burst).
  fn burst_probability(&self, r: f64, d: f64, dt: f64) -> f64 {
    let tau = self.depth_scale;
    let prefactor = self.flux_amplitude * dt * 0.1;
    let geometric = 1.0 - (d - r) / d;
    let decay = ((-(d - tau)) / (2.0 * tau)).exp().min(1.0);
    prefactor * geometric * decay
  }

  /// Decide whether the bubble at this grid point bursts this step:
  /// deterministic once the radius reaches the surface, otherwise a coin
  /// flip against `burst_probability` (§4.H.2).
  pub fn should_burst(&self, he_density: f64, distance_from_surface: f64, dx: f64, dt: f64, rng: &mut impl Rng) -> bool {
    let r = self.nascent_radius(he_density, dx);
    let d = distance_from_surface;
    if r >= d {
      tracing::info!(radius = r, distance = d, "bubble burst (deterministic)");
      return true;
    }
    let fires = rng.random::<f64>() < self.burst_probability(r, d, dt);
    if fires {
      tracing::info!(radius = r, distance = d, "bubble burst (probabilistic)");
    }
    fires
  }

  /// Post-event clearing at one bursting grid point (§4.H.2): zero every
  /// He/D/T cluster, transfer every HeV cluster's concentration to its
  /// same-size V cluster, and — for super clusters covering He/V space —
  /// transfer the integrated V-axis distribution to V clusters and zero
  /// all moments.
  pub fn clear_bursting_point(&self, catalogue: &crate::cluster::ClusterCatalogue, concentrations: &mut [f64]) {
    for cluster in catalogue.iter() {
      let Some(composition) = cluster.composition() else {
        continue;
      };
      let he = composition.get(Species::He);
      let d = composition.get(Species::D);
      let t = composition.get(Species::T);
      let v = composition.get(Species::V);

      if he > 0 && v > 0 {
        let id = cluster.id().index();
        let c = concentrations[id];
        concentrations[id] = 0.0;
        if let Some(vc) = catalogue.get_pure(Species::V, v) {
          concentrations[vc.id().index()] += c;
        }
      } else if he > 0 || d > 0 || t > 0 {
        concentrations[cluster.id().index()] = 0.0;
      }
    }

    for cluster in catalogue.iter_super() {
      let Some(sc) = cluster.as_super() else {
        continue;
      };
      if !sc.axes.iter().any(|axis| axis.species == Species::V) {
        continue;
      }
      let l0 = concentrations[sc.l0_id().index()];
      if let Some(v_axis) = sc.axes.iter().find(|a| a.species == Species::V) {
        let v_mean = v_axis.mean().round().max(0.0) as u32;
        if let Some(v_cluster) = catalogue.get_pure(Species::V, v_mean) {
          concentrations[v_cluster.id().index()] += l0;
        }
      }
      for &moment_id in &sc.moment_ids {
        concentrations[moment_id.index()] = 0.0;
      }
    }
  }

  /// Distance from grid point `xi` to the surface (always nonnegative).
  pub fn distance_from_surface(&self, grid: &Grid, xi: usize) -> f64 {
    grid.depth(xi).abs()
  }

  /// He density at a point, summed across every cluster with a nonzero
  /// He count weighted by its size (`heDensity`).
  pub fn he_density(&self, catalogue: &crate::cluster::ClusterCatalogue, concentrations: &[f64]) -> f64 {
    catalogue
      .iter()
      .filter_map(|c| c.species_representative(Species::He).map(|(n, id)| n * concentrations[id.index()]))
      .sum()
  }
}

#[cfg(test)]
#[path = "bursting_test.rs"]
mod bursting_test;
