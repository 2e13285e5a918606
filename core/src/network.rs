//! The cluster network: catalogue + reaction graph + temperature cache
//! (§3 "Lifecycle", §4.F).
//!
//! Temperature is explicit state on the network with a single update
//! entry point (§9 "Global mutable temperature cache") — no ambient
//! process-wide state.

use crate::cluster::{Cluster, ClusterCatalogue, ClusterId};
use crate::reaction::{Reaction, ReactionGraph};

/// Supplies temperature-dependent rate constants and diffusion
/// coefficients. Kept as a trait so unit tests and different materials can
/// swap in their own Arrhenius-law parameters without the network caring.
pub trait RateModel {
  fn reaction_rate(&self, reaction: &Reaction, catalogue: &ClusterCatalogue, temperature: f64) -> f64;
  fn diffusion_coefficient(&self, cluster: &Cluster, temperature: f64) -> f64;
}

/// Immutable-topology, mutable-rates cluster network (§3 "Lifecycle").
pub struct Network {
  catalogue: ClusterCatalogue,
  graph: ReactionGraph,
  rate_model: Box<dyn RateModel + Send + Sync>,
  last_temperature: f64,
  temperature_tolerance: f64,
  diffusion_coefficients: Vec<f64>,
  set_temperature_calls: u64,
}

impl Network {
  pub fn build(
    catalogue: ClusterCatalogue,
    reactions: Vec<Reaction>,
    rate_model: Box<dyn RateModel + Send + Sync>,
    temperature_tolerance: f64,
  ) -> Self {
    let graph = ReactionGraph::build(&catalogue, reactions);
    let n = catalogue.size();
    Self {
      catalogue,
      graph,
      rate_model,
      last_temperature: f64::NAN,
      temperature_tolerance,
      diffusion_coefficients: vec![0.0; n],
      set_temperature_calls: 0,
    }
  }

  pub fn catalogue(&self) -> &ClusterCatalogue {
    &self.catalogue
  }

  pub fn graph(&self) -> &ReactionGraph {
    &self.graph
  }

  pub fn size(&self) -> usize {
    self.catalogue.size()
  }

  pub fn diffusion_coefficient(&self, id: ClusterId) -> f64 {
    self.diffusion_coefficients[id.index()]
  }

  pub fn last_temperature(&self) -> f64 {
    self.last_temperature
  }

  pub fn set_temperature_calls(&self) -> u64 {
    self.set_temperature_calls
  }

  /// Recompute every reaction rate and diffusion coefficient if `t` differs
  /// from the cached temperature by more than tolerance; returns whether a
  /// recompute happened (§4.F, §8 "T unchanged ... must not trigger rate
  /// recomputation").
  pub fn maybe_set_temperature(&mut self, t: f64) -> bool {
    if (t - self.last_temperature).abs() <= self.temperature_tolerance {
      return false;
    }
    self.set_temperature(t);
    true
  }

  pub fn set_temperature(&mut self, t: f64) {
    tracing::debug!(old = self.last_temperature, new = t, "recomputing network rates");
    self.set_temperature_calls += 1;
    self.last_temperature = t;

    for reaction in self.graph.reactions_mut() {
      let new_rate = self.rate_model.reaction_rate(reaction, &self.catalogue, t);
      reaction.set_rate(new_rate);
    }
    for cluster in self.catalogue.iter() {
      self.diffusion_coefficients[cluster.id().index()] =
        self.rate_model.diffusion_coefficient(cluster, t);
    }
  }
}

#[cfg(test)]
#[path = "network_test.rs"]
mod network_test;
