//! Nonuniform three-point diffusion stencil (§4.C).

use crate::cluster::{ClusterCatalogue, ClusterId};
use crate::network::Network;

/// Three stencil coefficients for one diffusing cluster, in the fixed
/// `(middle, left, right)` order §4.C specifies for Jacobian emission.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DiffusionPartials {
  pub id: ClusterId,
  pub middle: f64,
  pub left: f64,
  pub right: f64,
}

/// The set of clusters that diffuse, fixed once at network construction
/// (`initializeOffDiagonal`, §4.C): marks only the diagonal entries in
/// `ofill`, since diffusion carries no cross-species coupling.
pub struct DiffusionOperator {
  diffusing: Vec<ClusterId>,
}

impl DiffusionOperator {
  pub fn build(catalogue: &ClusterCatalogue) -> Self {
    let diffusing = catalogue
      .iter()
      .filter(|c| c.core.diffusion_coefficient > 0.0)
      .map(|c| c.id())
      .collect();
    Self { diffusing }
  }

  pub fn diffusing_ids(&self) -> &[ClusterId] {
    &self.diffusing
  }

  /// Nonuniform three-point second derivative, scaled by `D_c`:
  /// `D_c * 2/(hL+hR) * ((C_left - C_mid)/hL + (C_right - C_mid)/hR)`,
  /// accumulated into `out[id]` for every diffusing cluster.
  pub fn compute(&self, network: &Network, left: &[f64], mid: &[f64], right: &[f64], h_l: f64, h_r: f64, out: &mut [f64]) {
    let scale = 2.0 / (h_l + h_r);
    for &id in &self.diffusing {
      let d = network.diffusion_coefficient(id);
      let i = id.index();
      let flux = d * scale * ((left[i] - mid[i]) / h_l + (right[i] - mid[i]) / h_r);
      out[i] += flux;
    }
  }

  /// One-sided diffusive flux at a free right boundary (§4.G "bulk-flux
  /// accounting", §4.H): `D_c * (C_left - C_mid) / h_l`, accumulated into
  /// `out[id]` for every diffusing cluster. There is no right neighbor at
  /// `Mx-1`, so this becomes the row's entire residual rather than being
  /// combined with a reflecting identity.
  pub fn compute_one_sided(&self, network: &Network, left: &[f64], mid: &[f64], h_l: f64, out: &mut [f64]) {
    for &id in &self.diffusing {
      let d = network.diffusion_coefficient(id);
      let i = id.index();
      out[i] += d * (left[i] - mid[i]) / h_l;
    }
  }

  /// `(middle, left)` coefficients for the one-sided flux
  /// [`Self::compute_one_sided`] computes, for the free-boundary Jacobian
  /// row.
  pub fn partial_derivatives_one_sided(&self, network: &Network, h_l: f64) -> Vec<DiffusionPartials> {
    self
      .diffusing
      .iter()
      .map(|&id| {
        let d = network.diffusion_coefficient(id);
        DiffusionPartials {
          id,
          middle: -d / h_l,
          left: d / h_l,
          right: 0.0,
        }
      })
      .collect()
  }

  /// Stencil coefficients for every diffusing cluster, fixed order
  /// `(middle, left, right)` (`computePartialsForDiffusion`, §4.C).
  pub fn partial_derivatives(&self, network: &Network, h_l: f64, h_r: f64) -> Vec<DiffusionPartials> {
    let scale = 2.0 / (h_l + h_r);
    self
      .diffusing
      .iter()
      .map(|&id| {
        let d = network.diffusion_coefficient(id);
        DiffusionPartials {
          id,
          middle: d * scale * (-1.0 / h_l - 1.0 / h_r),
          left: d * scale * (1.0 / h_l),
          right: d * scale * (1.0 / h_r),
        }
      })
      .collect()
  }
}

#[cfg(test)]
#[path = "diffusion_test.rs"]
mod diffusion_test;
