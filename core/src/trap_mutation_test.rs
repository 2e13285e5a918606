use super::*;
use crate::cluster::{Cluster, ClusterCore, ClusterVariant};
use crate::network::RateModel;
use crate::reaction::Reaction;

struct FixedDiffusion(f64);

impl RateModel for FixedDiffusion {
  fn reaction_rate(&self, _r: &Reaction, _c: &ClusterCatalogue, _t: f64) -> f64 {
    0.0
  }

  fn diffusion_coefficient(&self, _cluster: &Cluster, _t: f64) -> f64 {
    self.0
  }
}

fn make(id: u32, composition: Composition) -> Cluster {
  Cluster {
    core: ClusterCore {
      id: ClusterId(id),
      reaction_radius: 0.3,
      formation_energy: 1.0,
      binding_energies: Vec::new(),
      diffusion_coefficient: 1.0,
      connectivity: Vec::new(),
    },
    variant: ClusterVariant::Regular { composition },
  }
}

fn catalogue() -> ClusterCatalogue {
  ClusterCatalogue::new(vec![
    make(0, Composition::single(Species::He, 1)),
    make(1, Composition::from_pairs([(Species::He, 1), (Species::V, 1)])),
    make(2, Composition::single(Species::I, 1)),
  ])
}

#[test]
fn bucket_of_is_none_at_and_before_surface() {
  let op = TrapMutationOperator::build(&catalogue(), Material::W100);
  let grid = Grid::uniform(10, 1.0, 0.0); // surface_pos = 0
  assert_eq!(op.bucket_of(&grid, 0), None);
  assert_eq!(op.bucket_of(&grid, 1), Some(0));
  assert_eq!(op.bucket_of(&grid, 2), Some(1));
}

#[test]
fn bucket_of_is_none_past_material_depth() {
  let op = TrapMutationOperator::build(&catalogue(), Material::W100);
  let grid = Grid::uniform(10, 1.0, 0.0);
  assert_eq!(op.bucket_of(&grid, 1 + Material::W100.rule().num_buckets()), None);
}

#[test]
fn mass_is_conserved_between_he_hev_and_i() {
  let cat = catalogue();
  let mut op = TrapMutationOperator::build(&cat, Material::W100);
  let network_cat = ClusterCatalogue::new(vec![
    make(0, Composition::single(Species::He, 1)),
    make(1, Composition::from_pairs([(Species::He, 1), (Species::V, 1)])),
    make(2, Composition::single(Species::I, 1)),
  ]);
  let mut network = Network::build(network_cat, vec![], Box::new(FixedDiffusion(2.0)), 1e-6);
  network.set_temperature(500.0);
  op.update_rate(&network);

  let concentrations = vec![7.0, 0.0, 0.0];
  let mut out = vec![0.0; 3];
  op.accumulate_flux(0, &concentrations, &mut out);

  assert!(out[0] < 0.0);
  assert!((out[0] + out[1]).abs() < 1e-12);
  assert!((out[0] + out[2]).abs() < 1e-12);
}

#[test]
fn higher_temperature_increases_the_rate() {
  let cat = catalogue();
  let mut op = TrapMutationOperator::build(&cat, Material::W100);
  let network_cat_low = ClusterCatalogue::new(vec![
    make(0, Composition::single(Species::He, 1)),
    make(1, Composition::from_pairs([(Species::He, 1), (Species::V, 1)])),
    make(2, Composition::single(Species::I, 1)),
  ]);
  let mut network = Network::build(network_cat_low, vec![], Box::new(FixedDiffusion(2.0)), 1e-6);

  network.set_temperature(300.0);
  op.update_rate(&network);
  let low = op.partial_derivatives(0)[0].k_tm;

  network.set_temperature(900.0);
  op.update_rate(&network);
  let high = op.partial_derivatives(0)[0].k_tm;

  assert!(high > low);
}
