//! Cross-module regression coverage for the §8-style testable properties:
//! composition-index round trip, Jacobian coverage, boundary identity,
//! temperature-recompute call counting, and checkpoint round trip — all
//! exercised through the public crate surface rather than a single
//! module's internals.

use pretty_assertions::assert_eq;

use psi_cluster_core::assembly::SolverContext;
use psi_cluster_core::checkpoint::{sparsify, Checkpoint, TimestepRecord};
use psi_cluster_core::cluster::{Cluster, ClusterCatalogue, ClusterCore, ClusterId, ClusterVariant};
use psi_cluster_core::flux::{AmplitudeProfile, FluxOperator};
use psi_cluster_core::network::Network;
use psi_cluster_core::rate_model::ArrheniusRateModel;
use psi_cluster_core::reaction::Reaction;
use psi_cluster_core::species::{Composition, Species};
use psi_cluster_core::temperature::TemperatureModel;
use psi_cluster_core::transport::{AdvectionOperator, DiffusionOperator};
use psi_cluster_core::trap_mutation::{Material, TrapMutationOperator};
use psi_cluster_core::Grid;

fn init_tracing() {
  let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn regular(id: u32, composition: Composition) -> Cluster {
  Cluster {
    core: ClusterCore {
      id: ClusterId(id),
      reaction_radius: 0.3,
      formation_energy: 0.3,
      binding_energies: Vec::new(),
      diffusion_coefficient: 1.0,
      connectivity: Vec::new(),
    },
    variant: ClusterVariant::Regular { composition },
  }
}

/// Minimal He/V/I network matching the repository's id layout: He1..He10
/// at 0..9, V1..V10 at 10..19, I1..I10 at 20..29, then every HeV pair for
/// He in 1..=9 and V in 1..=5 at 30..74 (45 combinations).
fn build_hevi_catalogue() -> ClusterCatalogue {
  let mut clusters = Vec::new();
  for n in 1..=10u32 {
    clusters.push(regular(n - 1, Composition::single(Species::He, n)));
  }
  for n in 1..=10u32 {
    clusters.push(regular(10 + n - 1, Composition::single(Species::V, n)));
  }
  for n in 1..=10u32 {
    clusters.push(regular(20 + n - 1, Composition::single(Species::I, n)));
  }
  let mut next_id = 30u32;
  for he in 1..=9u32 {
    for v in 1..=5u32 {
      let composition = Composition::from_pairs([(Species::He, he), (Species::V, v)]);
      clusters.push(regular(next_id, composition));
      next_id += 1;
    }
  }
  ClusterCatalogue::new(clusters)
}

#[test]
fn composition_index_round_trips_for_the_hevi_layout() {
  let catalogue = build_hevi_catalogue();

  assert_eq!(catalogue.get_by_id(ClusterId(0)).unwrap().composition().unwrap().get(Species::He), 1);
  assert_eq!(catalogue.get_by_id(ClusterId(9)).unwrap().composition().unwrap().get(Species::He), 10);
  assert_eq!(catalogue.get_by_id(ClusterId(10)).unwrap().composition().unwrap().get(Species::V), 1);
  assert_eq!(catalogue.get_by_id(ClusterId(19)).unwrap().composition().unwrap().get(Species::V), 10);
  assert_eq!(catalogue.get_by_id(ClusterId(20)).unwrap().composition().unwrap().get(Species::I), 1);
  assert_eq!(catalogue.get_by_id(ClusterId(29)).unwrap().composition().unwrap().get(Species::I), 10);

  for id in 30..75u32 {
    let cluster = catalogue.get_by_id(ClusterId(id)).unwrap();
    let composition = cluster.composition().unwrap();
    assert!(composition.get(Species::He) >= 1 && composition.get(Species::He) <= 9);
    assert!(composition.get(Species::V) >= 1 && composition.get(Species::V) <= 5);
    // every stored composition is retrievable by the same key it was built from.
    assert_eq!(catalogue.get_by_composition(composition).unwrap().id(), ClusterId(id));
  }
}

fn build_solver_context() -> SolverContext {
  let catalogue = build_hevi_catalogue();
  let he1 = catalogue.get_pure(Species::He, 1).unwrap().id();
  let reactions = vec![Reaction::Bimolecular {
    a: he1,
    b: catalogue.get_pure(Species::V, 1).unwrap().id(),
    product: catalogue
      .get_by_composition(&Composition::from_pairs([(Species::He, 1), (Species::V, 1)]))
      .unwrap()
      .id(),
    k: 0.0,
    coupling: None,
  }];
  let network = Network::build(catalogue, reactions, Box::new(ArrheniusRateModel), 1e-3);

  let grid = Grid::uniform(13, 0.1, 0.15);
  let diffusion = DiffusionOperator::build(network.catalogue());
  let advection = AdvectionOperator::new(Vec::new());
  let trap_mutation = TrapMutationOperator::build(network.catalogue(), Material::W110);
  let temperature = TemperatureModel::Constant(1000.0);
  let flux_amplitude = AmplitudeProfile::Constant(1e20);
  let fluxes = vec![FluxOperator::build(he1, &grid, 2.0, flux_amplitude)];

  SolverContext::new(grid, network, diffusion, advection, trap_mutation, temperature, fluxes)
}

#[test]
fn boundary_rows_are_identity_and_interior_rows_are_not() {
  init_tracing();
  let mut ctx = build_solver_context();
  let mx = ctx.grid().mx();
  let n = ctx.network().size();
  let mut slab = vec![vec![0.0; n]; mx];
  ctx.initialize_concentration(&mut slab);
  for row in slab.iter_mut() {
    for (i, v) in row.iter_mut().enumerate() {
      *v = (i + 1) as f64;
    }
  }
  let mut residual = vec![vec![0.0; n]; mx];
  ctx.update_concentration(&slab, &mut residual, 0.0);

  for xi in 0..=ctx.grid().surface_pos() {
    assert_eq!(residual[xi], slab[xi], "reservoir row {xi} must be identity");
  }
  assert_eq!(residual[mx - 1], slab[mx - 1], "right boundary row must be identity");

  let interior = ctx.grid().surface_pos() + 1;
  assert_ne!(residual[interior], slab[interior], "an interior row with active physics must not be a no-op");
}

#[test]
fn every_same_point_jacobian_entry_is_covered_by_the_fill_pattern() {
  let ctx = build_solver_context();
  let mx = ctx.grid().mx();
  let n = ctx.network().size();
  let mut slab = vec![vec![0.0; n]; mx];
  ctx.initialize_concentration(&mut slab);
  for (xi, row) in slab.iter_mut().enumerate() {
    for (i, v) in row.iter_mut().enumerate() {
      *v = (xi + i + 1) as f64;
    }
  }

  for entry in ctx.compute_off_diagonal_jacobian() {
    if entry.row_xi == entry.col_xi {
      assert!(ctx.pattern().covers(entry.row_id, entry.col_id), "off-diagonal same-point entry not covered");
    }
  }
  for entry in ctx.compute_diagonal_jacobian(&slab) {
    assert_eq!(entry.row_xi, entry.col_xi);
    assert!(ctx.pattern().covers(entry.row_id, entry.col_id), "diagonal entry not covered");
  }
}

#[test]
fn uniform_temperature_step_triggers_exactly_one_rate_recompute() {
  let mut ctx = build_solver_context();
  ctx.network_mut().set_temperature(1000.0);
  let calls_before = ctx.network().set_temperature_calls();

  let mx = ctx.grid().mx();
  let n = ctx.network().size();
  let mut slab = vec![vec![0.0; n]; mx];
  ctx.initialize_concentration(&mut slab);
  let mut residual = vec![vec![0.0; n]; mx];
  // Several steps at the same temperature: the cache must absorb all but the
  // very first (already-applied) recompute.
  for step in 0..5 {
    ctx.update_concentration(&slab, &mut residual, step as f64 * 0.01);
  }

  assert_eq!(ctx.network().set_temperature_calls(), calls_before);
}

#[test]
fn checkpoint_round_trips_a_solver_derived_slab() {
  let ctx = build_solver_context();
  let mx = ctx.grid().mx();
  let n = ctx.network().size();
  let mut slab = vec![vec![0.0; n]; mx];
  ctx.initialize_concentration(&mut slab);

  let mut checkpoint = Checkpoint::new();
  checkpoint.push(TimestepRecord {
    time: 1.5,
    previous_time: 1.0,
    delta_t: 0.5,
    loop_number: 3,
    timestep_index: 0,
    grid: (0..mx).map(|xi| ctx.grid().x(xi)).collect(),
    concs: slab.iter().map(|row| sparsify(row)).collect(),
    ..Default::default()
  });

  let dir = std::env::temp_dir();
  let path = dir.join(format!("psi-cluster-core-integration-{}.json", std::process::id()));
  checkpoint.write_to(&path).unwrap();
  let restored = Checkpoint::read_from(&path).unwrap();
  std::fs::remove_file(&path).ok();

  let record = restored.get(0).unwrap();
  assert_eq!(record.grid.len(), mx);
  for xi in 0..mx {
    assert_eq!(record.grid[xi], ctx.grid().x(xi));
    assert_eq!(record.concs[xi], sparsify(&slab[xi]));
  }
}
