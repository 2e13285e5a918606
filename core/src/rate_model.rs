//! Production [`RateModel`](crate::network::RateModel): capture-radius
//! combination rates and detailed-balance dissociation rates (§4.B, §4.F).
//!
//! Diffusion coefficients follow a standard Arrhenius law, `D(T) = D0 *
//! exp(-Em/kT)`, treating [`ClusterCore::formation_energy`] as the
//! migration barrier — the filtered-down spec carries only one energy
//! field per cluster beyond its per-product binding energies, so this is
//! the natural reuse rather than inventing a second field. Bimolecular
//! rates use the classic Smoluchowski capture-radius formula `k = 4π(r_A +
//! r_B)(D_A + D_B)`; unary (dissociation) rates use detailed balance
//! against the parent's binding energy to whichever fragment the reaction
//! names, `k = ν₀ * exp(-E_b/kT)`.
//!
//! [`ClusterCore::formation_energy`]: crate::cluster::ClusterCore::formation_energy

use crate::cluster::{Cluster, ClusterCatalogue};
use crate::constants::{ATTEMPT_FREQUENCY, K_B};
use crate::network::RateModel;
use crate::reaction::Reaction;

#[derive(Clone, Copy, Debug, Default)]
pub struct ArrheniusRateModel;

impl RateModel for ArrheniusRateModel {
  fn reaction_rate(&self, reaction: &Reaction, catalogue: &ClusterCatalogue, temperature: f64) -> f64 {
    match reaction {
      Reaction::Bimolecular { a, b, .. } => {
        let (Some(ca), Some(cb)) = (catalogue.get_by_id(*a), catalogue.get_by_id(*b)) else {
          return 0.0;
        };
        let r = ca.core.reaction_radius + cb.core.reaction_radius;
        let d = self.diffusion_coefficient(ca, temperature) + self.diffusion_coefficient(cb, temperature);
        4.0 * std::f64::consts::PI * r * d
      }
      Reaction::Unary { parent, products, .. } => {
        let Some(parent_cluster) = catalogue.get_by_id(*parent) else {
          return 0.0;
        };
        let e_b = products
          .iter()
          .find_map(|p| {
            parent_cluster
              .core
              .binding_energies
              .iter()
              .find(|(id, _)| id == p)
              .map(|(_, e)| *e)
          })
          .unwrap_or(parent_cluster.core.formation_energy);
        ATTEMPT_FREQUENCY * (-e_b / (K_B * temperature)).exp()
      }
    }
  }

  fn diffusion_coefficient(&self, cluster: &Cluster, temperature: f64) -> f64 {
    if cluster.core.diffusion_coefficient <= 0.0 {
      return 0.0;
    }
    cluster.core.diffusion_coefficient * (-cluster.core.formation_energy / (K_B * temperature)).exp()
  }
}

#[cfg(test)]
#[path = "rate_model_test.rs"]
mod rate_model_test;
