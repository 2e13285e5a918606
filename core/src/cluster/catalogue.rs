//! Cluster catalogue: composition index + dense id assignment (§4.A).
//!
//! The mapping is fixed after construction: lookups never insert, and
//! iteration order always matches `id` order.

use std::collections::HashMap;

use super::{Cluster, ClusterId, ClusterVariant};
use crate::species::{Composition, Species};

/// Identity/lookup table over a network's clusters.
///
/// Built once by [`crate::network::Network::build`]; immutable afterwards.
pub struct ClusterCatalogue {
  clusters: Vec<Cluster>,
  by_composition: HashMap<Composition, ClusterId>,
  /// Lookup by (species, size) for the common "pure cluster of size n" case.
  by_species_size: HashMap<(Species, u32), ClusterId>,
}

impl ClusterCatalogue {
  pub fn new(clusters: Vec<Cluster>) -> Self {
    let mut by_composition = HashMap::with_capacity(clusters.len());
    let mut by_species_size = HashMap::new();

    for cluster in &clusters {
      if let ClusterVariant::Regular { composition } = &cluster.variant {
        by_composition.insert(*composition, cluster.id());

        let nonzero: Vec<_> = composition.nonzero().collect();
        if let [(species, n)] = nonzero.as_slice() {
          by_species_size.insert((*species, *n), cluster.id());
        }
      }
    }

    Self {
      clusters,
      by_composition,
      by_species_size,
    }
  }

  /// Total degrees of freedom (every moment of every super cluster counts
  /// as its own id).
  pub fn size(&self) -> usize {
    self
      .clusters
      .iter()
      .map(|c| c.occupied_ids().len())
      .sum()
  }

  pub fn get_by_composition(&self, composition: &Composition) -> Option<&Cluster> {
    self
      .by_composition
      .get(composition)
      .map(|id| &self.clusters[id.index()])
  }

  /// Retrieve a pure-species cluster by size, e.g. `get_pure(He, 3)` for
  /// He₃.
  pub fn get_pure(&self, species: Species, n: u32) -> Option<&Cluster> {
    self
      .by_species_size
      .get(&(species, n))
      .map(|id| &self.clusters[id.index()])
  }

  pub fn get_by_id(&self, id: ClusterId) -> Option<&Cluster> {
    self.clusters.get(id.index())
  }

  /// Deterministic iteration order matching `id`.
  pub fn iter(&self) -> impl Iterator<Item = &Cluster> {
    self.clusters.iter()
  }

  pub fn iter_super(&self) -> impl Iterator<Item = &Cluster> {
    self.clusters.iter().filter(|c| c.is_super())
  }

  pub fn len(&self) -> usize {
    self.clusters.len()
  }

  pub fn is_empty(&self) -> bool {
    self.clusters.is_empty()
  }
}

#[cfg(test)]
#[path = "catalogue_test.rs"]
mod catalogue_test;
