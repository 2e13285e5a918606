use super::*;
use crate::cluster::{Cluster, ClusterCatalogue, ClusterCore, ClusterId, ClusterVariant};
use crate::network::RateModel;
use crate::reaction::Reaction;
use crate::species::{Composition, Species};

struct NoopRateModel;

impl RateModel for NoopRateModel {
  fn reaction_rate(&self, _r: &Reaction, _c: &ClusterCatalogue, _t: f64) -> f64 {
    0.0
  }

  fn diffusion_coefficient(&self, _cluster: &Cluster, t: f64) -> f64 {
    t
  }
}

#[test]
fn constant_model_ignores_position_and_time() {
  let grid = Grid::uniform(3, 1.0, 0.0);
  let model = TemperatureModel::Constant(500.0);
  assert_eq!(model.temperature_at(&grid, 2, 99.0), 500.0);
}

#[test]
fn profile_model_interpolates_bilinearly() {
  let grid = Grid::uniform(3, 1.0, 0.0); // surface_pos = 0, depths = 0,1,2
  let model = TemperatureModel::Profile {
    times: vec![0.0, 10.0],
    depths: vec![0.0, 2.0],
    values: vec![vec![100.0, 200.0], vec![300.0, 400.0]],
  };
  // depth(1) = 1.0 -> halfway between depth samples; t=5 -> halfway in time.
  let t = model.temperature_at(&grid, 1, 5.0);
  assert!((t - 250.0).abs() < 1e-9);
}

#[test]
fn heat_equation_diffusive_term_vanishes_for_uniform_field() {
  let model = TemperatureModel::HeatEquation {
    field: vec![500.0, 500.0, 500.0],
    diffusivity: 2.0,
  };
  assert_eq!(model.diffusive_term(1, 1.0, 1.0), 0.0);
}

#[test]
fn refresh_only_rebuilds_when_temperature_moves() {
  let grid = Grid::uniform(3, 1.0, 0.0);
  let catalogue = ClusterCatalogue::new(vec![Cluster {
    core: ClusterCore {
      id: ClusterId(0),
      reaction_radius: 0.3,
      formation_energy: 1.0,
      binding_energies: Vec::new(),
      diffusion_coefficient: 1.0,
      connectivity: Vec::new(),
    },
    variant: ClusterVariant::Regular {
      composition: Composition::single(Species::He, 1),
    },
  }]);
  let trap_catalogue = ClusterCatalogue::new(vec![Cluster {
    core: ClusterCore {
      id: ClusterId(0),
      reaction_radius: 0.3,
      formation_energy: 1.0,
      binding_energies: Vec::new(),
      diffusion_coefficient: 1.0,
      connectivity: Vec::new(),
    },
    variant: ClusterVariant::Regular {
      composition: Composition::single(Species::He, 1),
    },
  }]);
  let mut network = Network::build(catalogue, vec![], Box::new(NoopRateModel), 1e-6);
  let mut trap_mutation = TrapMutationOperator::build(&trap_catalogue, crate::trap_mutation::Material::W100);

  let model = TemperatureModel::Constant(500.0);
  assert!(model.refresh_if_changed(&grid, 1, 0.0, &mut network, &mut trap_mutation));
  assert!(!model.refresh_if_changed(&grid, 1, 1.0, &mut network, &mut trap_mutation));
}
