//! [`ReactionGraph`]: per-cluster flux and Jacobian-row evaluation (§4.B).
//!
//! Construction-time invariant (documented in `DESIGN.md`): a super cluster
//! only ever appears as the *product* of a [`Reaction::Bimolecular`] or as
//! the *parent*/a *product* of a [`Reaction::Unary`] — never as a
//! combination-side reactant of a bimolecular reaction. Growth into a
//! super's distributional moments is always modeled as "produced into",
//! never "combined out of". This lets every row that is *not* itself a
//! super cluster's moment use a single scalar mass-action formula
//! regardless of whether its reaction partners are super (a super
//! participant's scalar value is simply its zeroth moment), while rows
//! that *are* a super cluster's moments go through [`MomentCoupling`].

use std::collections::HashMap;

use smallvec::SmallVec;

use super::Reaction;
use crate::cluster::{Cluster, ClusterCatalogue, ClusterId, ClusterVariant};

pub struct ReactionGraph {
  reactions: Vec<Reaction>,
  /// Reactions indexed by every base cluster id (`a`/`b`/`product` or
  /// `parent`/`products`) that appears in them.
  by_cluster: Vec<Vec<usize>>,
  /// Precomputed, sorted connectivity row per id: ids whose concentration
  /// influences this row's flux (§3 invariants).
  connectivity: Vec<Vec<ClusterId>>,
  /// Occupied-id list per base cluster id (1 entry for regular, N for a
  /// super cluster's moments), used to read/write moment vectors.
  moment_ids_of: HashMap<ClusterId, SmallVec<[ClusterId; 4]>>,
}

impl ReactionGraph {
  pub fn build(catalogue: &ClusterCatalogue, reactions: Vec<Reaction>) -> Self {
    let n = catalogue.size();
    let mut moment_ids_of = HashMap::with_capacity(catalogue.len());
    for cluster in catalogue.iter() {
      moment_ids_of.insert(cluster.id(), cluster.occupied_ids());
    }

    let mut by_cluster: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut connectivity: Vec<Vec<ClusterId>> = vec![Vec::new(); n];

    for (ridx, reaction) in reactions.iter().enumerate() {
      let base_ids = reaction.participants();

      // Expand every participant to its full occupied-id set so the
      // connectivity row covers every moment of an enclosing super.
      let mut full_rows: Vec<ClusterId> = Vec::new();
      for base in &base_ids {
        by_cluster[base.index()].push(ridx);
        full_rows.extend(
          moment_ids_of
            .get(base)
            .cloned()
            .unwrap_or_else(|| SmallVec::from_buf_and_len([*base; 4], 1)),
        );
      }

      for row in &full_rows {
        connectivity[row.index()].extend(full_rows.iter().copied());
      }
    }

    for row in connectivity.iter_mut() {
      row.sort_unstable();
      row.dedup();
    }

    Self {
      reactions,
      by_cluster,
      connectivity,
      moment_ids_of,
    }
  }

  pub fn connectivity(&self, id: ClusterId) -> &[ClusterId] {
    &self.connectivity[id.index()]
  }

  fn moment_values(&self, id: ClusterId, concentrations: &[f64]) -> SmallVec<[f64; 4]> {
    match self.moment_ids_of.get(&id) {
      Some(ids) if ids.len() > 1 => ids.iter().map(|i| concentrations[i.index()]).collect(),
      _ => SmallVec::from_buf_and_len([concentrations[id.index()]; 4], 1),
    }
  }

  /// Scalar mass-action contribution of one reaction to one *base* row
  /// (never a super cluster's own moments — see module doc).
  fn plain_contribution(&self, ridx: usize, row: ClusterId, concentrations: &[f64]) -> f64 {
    let c = |id: ClusterId| concentrations[id.index()];
    match &self.reactions[ridx] {
      Reaction::Bimolecular { a, b, product, k, .. } => {
        let rate_term = k * c(*a) * c(*b);
        if row == *product {
          rate_term
        } else if row == *a || row == *b {
          -rate_term
        } else {
          0.0
        }
      }
      Reaction::Unary {
        parent,
        products,
        k,
        ..
      } => {
        let rate_term = k * c(*parent);
        if row == *parent {
          -rate_term
        } else if products.contains(&row) {
          rate_term
        } else {
          0.0
        }
      }
    }
  }

  /// Production/dissociation gain or combination/emission loss for one
  /// super cluster's own moments, via [`MomentCoupling`] (§4.B).
  fn accumulate_super_reaction(
    &self,
    ridx: usize,
    sc_l0: ClusterId,
    concentrations: &[f64],
    moments_out: &mut [f64],
  ) {
    match &self.reactions[ridx] {
      Reaction::Bimolecular {
        a, b, product, k, coupling,
      } => {
        if *product != sc_l0 {
          return;
        }
        let ma = self.moment_values(*a, concentrations);
        let mb = self.moment_values(*b, concentrations);
        if let Some(coupling) = coupling {
          coupling.accumulate(*k, &ma, &mb, moments_out);
        } else {
          // no distributional detail: all mass lands in l0.
          moments_out[0] += k * ma[0] * mb[0];
        }
      }
      Reaction::Unary {
        parent,
        products,
        k,
        coupling,
      } => {
        if *parent == sc_l0 {
          let self_moments = self.moment_values(*parent, concentrations);
          for (slot, m) in moments_out.iter_mut().zip(self_moments.iter()) {
            *slot -= k * m;
          }
        } else if products.contains(&sc_l0) {
          let parent_moments = self.moment_values(*parent, concentrations);
          if let Some(coupling) = coupling {
            coupling.accumulate(*k, &parent_moments, &[1.0], moments_out);
          } else {
            moments_out[0] += k * parent_moments[0];
          }
        }
      }
    }
  }

  /// §4.B `getTotalFlux`: adds this cluster's contribution into `out`
  /// (all of its occupied ids for a super cluster) and returns the delta
  /// at its own id (`l0` for a super cluster).
  pub fn accumulate_flux(&self, cluster: &Cluster, concentrations: &[f64], out: &mut [f64]) -> f64 {
    match &cluster.variant {
      ClusterVariant::Regular { .. } => {
        let id = cluster.id();
        let mut total = 0.0;
        for &ridx in &self.by_cluster[id.index()] {
          total += self.plain_contribution(ridx, id, concentrations);
        }
        out[id.index()] += total;
        total
      }
      ClusterVariant::Super(sc) => {
        let l0 = sc.l0_id();
        let mut moments_out = vec![0.0; sc.moment_ids.len()];
        for &ridx in &self.by_cluster[l0.index()] {
          self.accumulate_super_reaction(ridx, l0, concentrations, &mut moments_out);
        }
        for (id, delta) in sc.moment_ids.iter().zip(moments_out.iter()) {
          out[id.index()] += delta;
        }
        moments_out[0]
      }
    }
  }

  /// §4.B `getPartialDerivatives`: fills `buf` (length N) with
  /// `d(dC/dt)/dC_j` for every `j` on `cluster`'s connectivity row; all
  /// other entries are left untouched (assumed zero by the caller).
  pub fn partial_derivatives(&self, cluster: &Cluster, concentrations: &[f64], buf: &mut [f64]) {
    let id = cluster.id();
    let c = |i: ClusterId| concentrations[i.index()];
    for &ridx in &self.by_cluster[id.index()] {
      match &self.reactions[ridx] {
        Reaction::Bimolecular { a, b, product, k, .. } => {
          let sign_a_b = if id == *product {
            1.0
          } else if id == *a || id == *b {
            -1.0
          } else {
            continue;
          };
          buf[a.index()] += sign_a_b * k * c(*b);
          buf[b.index()] += sign_a_b * k * c(*a);
        }
        Reaction::Unary {
          parent, products, k, ..
        } => {
          if id == *parent {
            buf[parent.index()] += -k;
          } else if products.contains(&id) {
            buf[parent.index()] += *k;
          }
        }
      }
    }
  }

  pub fn reactions(&self) -> &[Reaction] {
    &self.reactions
  }

  pub fn reactions_mut(&mut self) -> &mut [Reaction] {
    &mut self.reactions
  }
}

#[cfg(test)]
#[path = "graph_test.rs"]
mod graph_test;
