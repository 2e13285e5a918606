use super::*;
use crate::cluster::{Cluster, ClusterCore, ClusterVariant};
use crate::network::RateModel;
use crate::reaction::Reaction;
use crate::species::{Composition, Species};

struct FixedRateModel(f64);

impl RateModel for FixedRateModel {
  fn reaction_rate(&self, _r: &Reaction, _c: &ClusterCatalogue, _t: f64) -> f64 {
    0.0
  }

  fn diffusion_coefficient(&self, cluster: &Cluster, _t: f64) -> f64 {
    if cluster.core.diffusion_coefficient > 0.0 {
      self.0
    } else {
      0.0
    }
  }
}

fn build(diffusion_prefactor: f64) -> (ClusterCatalogue, Network) {
  let clusters = vec![
    Cluster {
      core: ClusterCore {
        id: ClusterId(0),
        reaction_radius: 0.3,
        formation_energy: 1.0,
        binding_energies: Vec::new(),
        diffusion_coefficient: diffusion_prefactor,
        connectivity: Vec::new(),
      },
      variant: ClusterVariant::Regular {
        composition: Composition::single(Species::He, 1),
      },
    },
    Cluster {
      core: ClusterCore {
        id: ClusterId(1),
        reaction_radius: 0.3,
        formation_energy: 1.0,
        binding_energies: Vec::new(),
        diffusion_coefficient: 0.0,
        connectivity: Vec::new(),
      },
      variant: ClusterVariant::Regular {
        composition: Composition::single(Species::V, 1),
      },
    },
  ];
  let catalogue = ClusterCatalogue::new(clusters.clone());
  let network_catalogue = ClusterCatalogue::new(clusters);
  let mut network = Network::build(network_catalogue, vec![], Box::new(FixedRateModel(5.0)), 1e-6);
  network.set_temperature(1.0);
  (catalogue, network)
}

#[test]
fn only_diffusion_capable_clusters_are_tracked() {
  let (catalogue, _network) = build(1.0);
  let op = DiffusionOperator::build(&catalogue);
  assert_eq!(op.diffusing_ids(), &[ClusterId(0)]);
}

#[test]
fn uniform_stencil_matches_closed_form() {
  let (catalogue, network) = build(1.0);
  let op = DiffusionOperator::build(&catalogue);

  let left = vec![1.0, 0.0];
  let mid = vec![2.0, 0.0];
  let right = vec![4.0, 0.0];
  let mut out = vec![0.0; 2];
  op.compute(&network, &left, &mid, &right, 0.5, 0.5, &mut out);

  // D=5, hL=hR=0.5: scale=2, (left-mid)/hL=-2, (right-mid)/hR=4 -> 5*2*2=20
  assert!((out[0] - 20.0).abs() < 1e-9);
  assert_eq!(out[1], 0.0);
}

#[test]
fn partials_sum_to_zero_for_constant_profile() {
  let (catalogue, network) = build(1.0);
  let op = DiffusionOperator::build(&catalogue);
  let partials = op.partial_derivatives(&network, 0.5, 0.7);
  assert_eq!(partials.len(), 1);
  let p = partials[0];
  assert!((p.middle + p.left + p.right).abs() < 1e-9);
}
