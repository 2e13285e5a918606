use smallvec::SmallVec;

use super::*;
use crate::cluster::{ClusterCore, SuperAxis, SuperCluster};
use crate::reaction::MomentCoupling;
use crate::species::{Composition, Species};

fn regular(id: u32, composition: Composition) -> Cluster {
  Cluster {
    core: ClusterCore {
      id: ClusterId(id),
      reaction_radius: 0.3,
      formation_energy: 1.0,
      binding_energies: Vec::new(),
      diffusion_coefficient: 0.0,
      connectivity: Vec::new(),
    },
    variant: ClusterVariant::Regular { composition },
  }
}

#[test]
fn bimolecular_mass_balance() {
  // A(0) + B(1) -> C(2)
  let catalogue = ClusterCatalogue::new(vec![
    regular(0, Composition::single(Species::He, 1)),
    regular(1, Composition::single(Species::V, 1)),
    regular(2, Composition::single(Species::He, 1)), // composition reused for simplicity
  ]);
  let reactions = vec![Reaction::Bimolecular {
    a: ClusterId(0),
    b: ClusterId(1),
    product: ClusterId(2),
    k: 2.0,
    coupling: None,
  }];
  let graph = ReactionGraph::build(&catalogue, reactions);

  let concentrations = vec![3.0, 5.0, 0.0];
  let mut out = vec![0.0; 3];
  for cluster in catalogue.iter() {
    graph.accumulate_flux(cluster, &concentrations, &mut out);
  }

  // production into C equals combination loss from A and from B exactly.
  assert_eq!(out[2], 2.0 * 3.0 * 5.0);
  assert_eq!(out[0], -out[2]);
  assert_eq!(out[1], -out[2]);
}

#[test]
fn unary_mass_balance() {
  // C(2) -> A(0) + B(1)
  let catalogue = ClusterCatalogue::new(vec![
    regular(0, Composition::single(Species::He, 1)),
    regular(1, Composition::single(Species::V, 1)),
    regular(2, Composition::single(Species::I, 1)),
  ]);
  let reactions = vec![Reaction::Unary {
    parent: ClusterId(2),
    products: SmallVec::from_vec(vec![ClusterId(0), ClusterId(1)]),
    k: 0.5,
    coupling: None,
  }];
  let graph = ReactionGraph::build(&catalogue, reactions);

  let concentrations = vec![0.0, 0.0, 10.0];
  let mut out = vec![0.0; 3];
  for cluster in catalogue.iter() {
    graph.accumulate_flux(cluster, &concentrations, &mut out);
  }

  assert_eq!(out[2], -0.5 * 10.0);
  assert_eq!(out[0], -out[2]);
  assert_eq!(out[1], -out[2]);
}

#[test]
fn connectivity_covers_all_reaction_partners() {
  let catalogue = ClusterCatalogue::new(vec![
    regular(0, Composition::single(Species::He, 1)),
    regular(1, Composition::single(Species::V, 1)),
    regular(2, Composition::single(Species::He, 1)),
  ]);
  let reactions = vec![Reaction::Bimolecular {
    a: ClusterId(0),
    b: ClusterId(1),
    product: ClusterId(2),
    k: 1.0,
    coupling: None,
  }];
  let graph = ReactionGraph::build(&catalogue, reactions);

  for id in [ClusterId(0), ClusterId(1), ClusterId(2)] {
    let row = graph.connectivity(id);
    assert!(row.contains(&ClusterId(0)));
    assert!(row.contains(&ClusterId(1)));
    assert!(row.contains(&ClusterId(2)));
  }
}

#[test]
fn partial_derivatives_match_finite_difference() {
  let catalogue = ClusterCatalogue::new(vec![
    regular(0, Composition::single(Species::He, 1)),
    regular(1, Composition::single(Species::V, 1)),
    regular(2, Composition::single(Species::He, 1)),
  ]);
  let reactions = vec![Reaction::Bimolecular {
    a: ClusterId(0),
    b: ClusterId(1),
    product: ClusterId(2),
    k: 1.7,
    coupling: None,
  }];
  let graph = ReactionGraph::build(&catalogue, reactions);

  let base = vec![3.0, 5.0, 0.0];
  let cluster_c = catalogue.get_by_id(ClusterId(2)).unwrap();

  let mut buf = vec![0.0; 3];
  graph.partial_derivatives(cluster_c, &base, &mut buf);

  let h = 1e-6;
  let flux_at = |conc: &[f64]| {
    let mut out = vec![0.0; 3];
    graph.accumulate_flux(cluster_c, conc, &mut out);
    out[2]
  };
  let mut perturbed = base.clone();
  perturbed[0] += h;
  let d_da = (flux_at(&perturbed) - flux_at(&base)) / h;
  assert!((d_da - buf[0]).abs() < 1e-3);
}

#[test]
fn super_cluster_moment_consistency_in_flux() {
  // A(0) + B(1) -> Super(l0=2, l1_He=3) with identity coupling.
  let axis = SuperAxis {
    species: Species::He,
    lo: 2,
    hi: 6,
  };
  let sc = SuperCluster {
    axes: SmallVec::from_vec(vec![axis]),
    moment_ids: SmallVec::from_vec(vec![ClusterId(2), ClusterId(3)]),
    n_tot: 5,
  };
  let super_cluster = Cluster {
    core: ClusterCore {
      id: ClusterId(2),
      reaction_radius: 0.3,
      formation_energy: 1.0,
      binding_energies: Vec::new(),
      diffusion_coefficient: 0.0,
      connectivity: Vec::new(),
    },
    variant: ClusterVariant::Super(sc),
  };
  let catalogue = ClusterCatalogue::new(vec![
    regular(0, Composition::single(Species::He, 1)),
    regular(1, Composition::single(Species::V, 1)),
    super_cluster,
  ]);
  let coupling = MomentCoupling::new(vec![vec![vec![1.0, 0.3]]]);
  let reactions = vec![Reaction::Bimolecular {
    a: ClusterId(0),
    b: ClusterId(1),
    product: ClusterId(2),
    k: 1.0,
    coupling: Some(coupling),
  }];
  let graph = ReactionGraph::build(&catalogue, reactions);

  let concentrations = vec![2.0, 4.0, 0.0, 0.0];
  let mut out = vec![0.0; 4];
  let sc_cluster = catalogue.get_by_id(ClusterId(2)).unwrap();
  graph.accumulate_flux(sc_cluster, &concentrations, &mut out);

  assert_eq!(out[2], 1.0 * 2.0 * 4.0); // l0
  assert_eq!(out[3], 0.3 * 2.0 * 4.0); // l1_He
}
