//! Cluster identity and attributes (§4.A).
//!
//! A [`Cluster`] is a tagged union over two variants — regular (single
//! composition) and super (a rectangular bundle of compositions
//! represented by distributional moments) — per the design note in §9:
//! polymorphism here is limited to dispatch on variant at the network
//! level, so a plain enum is cleaner than a trait-object hierarchy.

mod catalogue;
mod super_cluster;

pub use catalogue::ClusterCatalogue;
pub use super_cluster::{SuperAxis, SuperCluster};

use smallvec::SmallVec;

use crate::species::{Composition, Species};

/// Dense integer id in `[0, N)`, stable for the lifetime of the network.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClusterId(pub u32);

impl ClusterId {
  #[inline]
  pub fn index(self) -> usize {
    self.0 as usize
  }
}

/// Attributes common to both regular and super clusters.
#[derive(Clone, Debug)]
pub struct ClusterCore {
  /// Dense id of this cluster (for a super cluster, the id of its zeroth
  /// moment — see [`SuperCluster::moment_ids`]).
  pub id: ClusterId,
  pub reaction_radius: f64,
  pub formation_energy: f64,
  /// Binding energy to each one-step dissociation product.
  pub binding_energies: Vec<(ClusterId, f64)>,
  /// Diffusion prefactor `D0` (pre-exponential term); the
  /// temperature-dependent coefficient actually used in assembly is cached
  /// separately on [`crate::network::Network`].
  pub diffusion_coefficient: f64,
  /// Set of ids whose concentration influences this cluster's flux: the
  /// union of all reaction partners and moments of enclosing supers.
  /// Computed once at construction, sorted, immutable.
  pub connectivity: Vec<ClusterId>,
}

/// Variant-specific cluster data.
#[derive(Clone, Debug)]
pub enum ClusterVariant {
  Regular { composition: Composition },
  Super(SuperCluster),
}

/// A reaction-network cluster: a regular composition or a super cluster.
#[derive(Clone, Debug)]
pub struct Cluster {
  pub core: ClusterCore,
  pub variant: ClusterVariant,
}

impl Cluster {
  pub fn id(&self) -> ClusterId {
    self.core.id
  }

  pub fn is_super(&self) -> bool {
    matches!(self.variant, ClusterVariant::Super(_))
  }

  pub fn composition(&self) -> Option<&Composition> {
    match &self.variant {
      ClusterVariant::Regular { composition } => Some(composition),
      ClusterVariant::Super(_) => None,
    }
  }

  pub fn as_super(&self) -> Option<&SuperCluster> {
    match &self.variant {
      ClusterVariant::Super(s) => Some(s),
      ClusterVariant::Regular { .. } => None,
    }
  }

  /// All ids this cluster occupies: just `id()` for a regular cluster, or
  /// every moment id for a super cluster.
  pub fn occupied_ids(&self) -> SmallVec<[ClusterId; 4]> {
    match &self.variant {
      ClusterVariant::Regular { .. } => SmallVec::from_buf_and_len([self.core.id; 4], 1),
      ClusterVariant::Super(s) => s.moment_ids.clone(),
    }
  }

  /// This cluster's representative `(count, id)` pair for `species`, or
  /// `None` if it carries no mass of that species.
  ///
  /// For a regular cluster this is its own composition count and id. For a
  /// super cluster grouped along `species`, it is the axis mean (the point
  /// at which the linear moment expansion reduces to the zeroth moment,
  /// §4.B) and the zeroth-moment id — the representative total mass of
  /// that species carried by the bundle is then `count * C[id]`. A super
  /// cluster not grouped along `species` carries none of it.
  pub fn species_representative(&self, species: Species) -> Option<(f64, ClusterId)> {
    match &self.variant {
      ClusterVariant::Regular { composition } => {
        let n = composition.get(species);
        (n > 0).then_some((n as f64, self.core.id))
      }
      ClusterVariant::Super(sc) => sc
        .axes
        .iter()
        .find(|axis| axis.species == species)
        .map(|axis| (axis.mean(), sc.l0_id())),
    }
  }
}
