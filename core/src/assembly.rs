//! Spatial assembly driver (§4.G): the boundary between this crate's
//! per-point physics and the external integrator's distributed array.
//!
//! Per §5's single-threaded contract, every pass here is a plain
//! sequential loop over grid points — the "any order" guarantee only
//! means a caller could reorder them safely, not that this module should.

use crate::cluster::ClusterId;
use crate::flux::FluxOperator;
use crate::grid::Grid;
use crate::network::Network;
use crate::species::Species;
use crate::temperature::TemperatureModel;
use crate::transport::{AdvectionOperator, DiffusionOperator};
use crate::trap_mutation::TrapMutationOperator;

/// Seed concentration for the initial vacancy population (§4.G
/// `initializeConcentration`).
const INITIAL_VACANCY_CONCENTRATION: f64 = 1e-4;

/// One entry of a stamped Jacobian: `d(residual[row_xi, row_id]) /
/// d(concentration[col_xi, col_id])`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JacobianEntry {
  pub row_xi: usize,
  pub row_id: ClusterId,
  pub col_xi: usize,
  pub col_id: ClusterId,
  pub value: f64,
}

/// Diagonal-only diffusion/advection pattern (`ofill`) plus general
/// reaction connectivity (`dfill`), built once at construction (§4.G).
/// Every nonzero entry the two Jacobian passes can produce is covered by
/// one of these two patterns.
pub struct FillPattern {
  ofill_rows: Vec<ClusterId>,
  dfill: Vec<Vec<ClusterId>>,
}

impl FillPattern {
  pub fn build(network: &Network, diffusion: &DiffusionOperator, advection: &AdvectionOperator) -> Self {
    let mut ofill_rows: Vec<ClusterId> = diffusion.diffusing_ids().to_vec();
    ofill_rows.extend(advection.advecting_ids());
    ofill_rows.sort_unstable();
    ofill_rows.dedup();

    let dfill = network
      .catalogue()
      .iter()
      .map(|c| network.graph().connectivity(c.id()).to_vec())
      .collect();

    Self { ofill_rows, dfill }
  }

  pub fn ofill_covers(&self, row: ClusterId) -> bool {
    self.ofill_rows.binary_search(&row).is_ok()
  }

  pub fn dfill_row(&self, row: ClusterId) -> &[ClusterId] {
    &self.dfill[row.index()]
  }

  /// True if `(row, col)` is covered by `ofill ∪ dfill` — the invariant
  /// both Jacobian passes together must satisfy.
  pub fn covers(&self, row: ClusterId, col: ClusterId) -> bool {
    (row == col && self.ofill_covers(row)) || self.dfill_row(row).contains(&col)
  }
}

/// Ties the grid, network, and per-physics operators together behind the
/// four operations the external integrator calls (§4.G).
pub struct SolverContext {
  grid: Grid,
  network: Network,
  diffusion: DiffusionOperator,
  advection: AdvectionOperator,
  trap_mutation: TrapMutationOperator,
  temperature: TemperatureModel,
  fluxes: Vec<FluxOperator>,
  pattern: FillPattern,
}

impl SolverContext {
  /// `createSolverContext`: assembles `ofill`/`dfill` from the already-
  /// built network and hands the pattern to the caller implicitly via
  /// [`SolverContext::pattern`].
  pub fn new(
    grid: Grid,
    network: Network,
    diffusion: DiffusionOperator,
    advection: AdvectionOperator,
    trap_mutation: TrapMutationOperator,
    temperature: TemperatureModel,
    fluxes: Vec<FluxOperator>,
  ) -> Self {
    let pattern = FillPattern::build(&network, &diffusion, &advection);
    Self {
      grid,
      network,
      diffusion,
      advection,
      trap_mutation,
      temperature,
      fluxes,
      pattern,
    }
  }

  pub fn grid(&self) -> &Grid {
    &self.grid
  }

  pub fn network(&self) -> &Network {
    &self.network
  }

  pub fn network_mut(&mut self) -> &mut Network {
    &mut self.network
  }

  pub fn pattern(&self) -> &FillPattern {
    &self.pattern
  }

  /// Zero every point's concentration, then seed an initial vacancy
  /// population in `[surfacePos+1, Mx-2]` if V is tracked (§4.G).
  pub fn initialize_concentration(&self, slab: &mut [Vec<f64>]) {
    let n = self.network.size();
    for row in slab.iter_mut() {
      row.clear();
      row.resize(n, 0.0);
    }
    if let Some(v_cluster) = self.network.catalogue().get_pure(Species::V, 1) {
      let id = v_cluster.id().index();
      let mx = self.grid.mx();
      if mx < 2 {
        return;
      }
      let lo = self.grid.surface_pos() + 1;
      let hi = mx - 2;
      for xi in lo..=hi.min(mx - 1) {
        if xi < slab.len() {
          slab[xi][id] = INITIAL_VACANCY_CONCENTRATION;
        }
      }
    }
  }

  /// `updateConcentration`: the residual loop (§4.G steps 1-7).
  #[tracing::instrument(level = "trace", skip(self, slab, residual))]
  pub fn update_concentration(&mut self, slab: &[Vec<f64>], residual: &mut [Vec<f64>], t: f64) {
    let mx = self.grid.mx();
    for xi in 0..mx {
      if self.grid.is_reservoir(xi) || self.grid.is_reflecting_right_boundary(xi) {
        residual[xi].copy_from_slice(&slab[xi]);
        continue;
      }
      if self.grid.is_right_boundary(xi) {
        let h_l = self.grid.left_step(xi);
        let out = &mut residual[xi];
        out.iter_mut().for_each(|v| *v = 0.0);
        self.diffusion.compute_one_sided(&self.network, &slab[xi - 1], &slab[xi], h_l, out);
        continue;
      }

      self
        .temperature
        .refresh_if_changed(&self.grid, xi, t, &mut self.network, &mut self.trap_mutation);

      let concentrations = &slab[xi];
      let out = &mut residual[xi];
      out.iter_mut().for_each(|v| *v = 0.0);

      for flux_op in &self.fluxes {
        flux_op.accumulate(t, xi, out);
      }

      let (h_l, h_r) = self.grid.steps(xi);
      self.diffusion.compute(&self.network, &slab[xi - 1], &slab[xi], &slab[xi + 1], h_l, h_r, out);
      self.advection.compute(self.grid.depth(xi), &slab[xi], &slab[xi + 1], h_r, out);

      if let Some(bucket) = self.trap_mutation.bucket_of(&self.grid, xi) {
        self.trap_mutation.accumulate_flux(bucket, concentrations, out);
      }

      for cluster in self.network.catalogue().iter() {
        self.network.graph().accumulate_flux(cluster, concentrations, out);
      }
    }
  }

  /// `computeOffDiagonalJacobian`: diffusion/advection stencil rows
  /// stamped at `(row=xi, col=xi|xi±1)`.
  pub fn compute_off_diagonal_jacobian(&self) -> Vec<JacobianEntry> {
    let mut entries = Vec::new();
    let mx = self.grid.mx();
    for xi in 0..mx {
      if self.grid.is_reservoir(xi) || self.grid.is_reflecting_right_boundary(xi) {
        continue;
      }
      if self.grid.is_right_boundary(xi) {
        let h_l = self.grid.left_step(xi);
        for p in self.diffusion.partial_derivatives_one_sided(&self.network, h_l) {
          entries.push(JacobianEntry { row_xi: xi, row_id: p.id, col_xi: xi - 1, col_id: p.id, value: p.left });
          entries.push(JacobianEntry { row_xi: xi, row_id: p.id, col_xi: xi, col_id: p.id, value: p.middle });
        }
        continue;
      }
      let (h_l, h_r) = self.grid.steps(xi);
      for p in self.diffusion.partial_derivatives(&self.network, h_l, h_r) {
        entries.push(JacobianEntry { row_xi: xi, row_id: p.id, col_xi: xi - 1, col_id: p.id, value: p.left });
        entries.push(JacobianEntry { row_xi: xi, row_id: p.id, col_xi: xi, col_id: p.id, value: p.middle });
        entries.push(JacobianEntry { row_xi: xi, row_id: p.id, col_xi: xi + 1, col_id: p.id, value: p.right });
      }
      for a in self.advection.partial_derivatives(self.grid.depth(xi), h_r) {
        entries.push(JacobianEntry { row_xi: xi, row_id: a.id, col_xi: xi, col_id: a.id, value: a.middle });
        entries.push(JacobianEntry { row_xi: xi, row_id: a.id, col_xi: xi + 1, col_id: a.id, value: a.right });
      }
    }
    entries
  }

  /// `computeDiagonalJacobian`: per-cluster reaction partials restricted
  /// to each row's precomputed `dfill` connectivity, plus trap-mutation
  /// diagonal rows.
  #[tracing::instrument(level = "trace", skip(self, slab))]
  pub fn compute_diagonal_jacobian(&self, slab: &[Vec<f64>]) -> Vec<JacobianEntry> {
    let n = self.network.size();
    let mut entries = Vec::new();
    let mx = self.grid.mx();
    for xi in 0..mx {
      if self.grid.is_reservoir(xi) || self.grid.is_right_boundary(xi) {
        continue;
      }
      let concentrations = &slab[xi];
      let mut buf = vec![0.0; n];
      for cluster in self.network.catalogue().iter() {
        buf.iter_mut().for_each(|v| *v = 0.0);
        self.network.graph().partial_derivatives(cluster, concentrations, &mut buf);
        for &col in self.pattern.dfill_row(cluster.id()) {
          let value = buf[col.index()];
          if value != 0.0 {
            entries.push(JacobianEntry { row_xi: xi, row_id: cluster.id(), col_xi: xi, col_id: col, value });
          }
        }
      }
      if let Some(bucket) = self.trap_mutation.bucket_of(&self.grid, xi) {
        for p in self.trap_mutation.partial_derivatives(bucket) {
          entries.push(JacobianEntry { row_xi: xi, row_id: p.he_id, col_xi: xi, col_id: p.he_id, value: -p.k_tm });
          entries.push(JacobianEntry { row_xi: xi, row_id: p.hev_id, col_xi: xi, col_id: p.he_id, value: p.k_tm });
          entries.push(JacobianEntry { row_xi: xi, row_id: p.i_id, col_xi: xi, col_id: p.he_id, value: p.k_tm });
        }
      }
    }
    entries
  }
}

#[cfg(test)]
#[path = "assembly_test.rs"]
mod assembly_test;
