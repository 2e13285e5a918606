//! Builder-pattern configuration structs and the network description file
//! parser behind [`crate::network::Network`]'s fail-fast construction path
//! (§7 "Configuration" errors).
//!
//! Plain structs with `with_*` builders and a `Default` impl; the CLI
//! itself stays external to this crate (§1), so [`RuntimeOptions`] is just
//! the struct a caller populates however it parses arguments.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cluster::{Cluster, ClusterCatalogue, ClusterCore, ClusterId, ClusterVariant, SuperAxis, SuperCluster};
use crate::error::CoreError;
use crate::grid::Grid;
use crate::network::{Network, RateModel};
use crate::rate_model::ArrheniusRateModel;
use crate::reaction::Reaction;
use crate::species::{Composition, Species};
use crate::trap_mutation::Material;

/// Tunables for building a [`Network`]: composition description file path,
/// temperature-change tolerance, and the trap-mutation material.
#[derive(Clone, Debug)]
pub struct NetworkConfig {
  pub description_path: String,
  pub temperature_tolerance: f64,
  pub material: Material,
}

impl Default for NetworkConfig {
  fn default() -> Self {
    Self {
      description_path: String::new(),
      temperature_tolerance: 1e-3,
      material: Material::W100,
    }
  }
}

impl NetworkConfig {
  pub fn with_description_path(mut self, path: impl Into<String>) -> Self {
    self.description_path = path.into();
    self
  }

  pub fn with_temperature_tolerance(mut self, tolerance: f64) -> Self {
    self.temperature_tolerance = tolerance;
    self
  }

  pub fn with_material(mut self, material: Material) -> Self {
    self.material = material;
    self
  }
}

/// Grid generation tunables (Mx, uniform spacing, surface percentile,
/// right-boundary offset — §4.G "Boundary policy").
#[derive(Clone, Copy, Debug)]
pub struct GridConfig {
  pub mx: usize,
  pub dx: f64,
  pub surface_percentile: f64,
  pub right_offset: usize,
}

impl Default for GridConfig {
  fn default() -> Self {
    Self {
      mx: 160,
      dx: 1.0,
      surface_percentile: 0.0,
      right_offset: 0,
    }
  }
}

impl GridConfig {
  pub fn with_mx(mut self, mx: usize) -> Self {
    self.mx = mx;
    self
  }

  pub fn with_dx(mut self, dx: f64) -> Self {
    self.dx = dx;
    self
  }

  pub fn with_surface_percentile(mut self, percentile: f64) -> Self {
    self.surface_percentile = percentile;
    self
  }

  pub fn with_right_offset(mut self, offset: usize) -> Self {
    self.right_offset = offset;
    self
  }

  /// Build the [`Grid`] this configuration describes: a nonzero
  /// `right_offset` configures `Mx-1` as a free surface with bulk-flux
  /// accounting rather than a reflecting boundary (§4.G "Boundary
  /// policy").
  pub fn build(&self) -> Grid {
    Grid::uniform(self.mx, self.dx, self.surface_percentile).with_free_right_boundary(self.right_offset != 0)
  }
}

/// Mirrors the §6 CLI switches as plain fields; a caller populates this
/// from whatever argument source it likes (the core never calls
/// `std::env::args`).
#[derive(Clone, Copy, Debug, Default)]
pub struct RuntimeOptions {
  pub helium_retention: bool,
  pub xenon_retention: bool,
  pub helium_cumul: bool,
  pub helium_conc: bool,
  pub mean_size: bool,
  pub tridyn: bool,
  pub alloy: bool,
  /// `-check_negative <thr>`: clamp concentrations below this magnitude
  /// to `±thr` instead of leaving them as noise (§7 "Numerical guard").
  pub check_negative: Option<f64>,
  /// `-check_collapse <thr>`: request integrator stop once `Δt` drops
  /// below this threshold (§7 "Solver collapse").
  pub check_collapse: Option<f64>,
}

/// One cluster entry in a network description file: either a single
/// composition, or a super cluster's axis bounds (§3 DATA MODEL,
/// [`crate::cluster::SuperCluster`]).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ClusterDescription {
  Regular {
    composition: Vec<(String, u32)>,
    #[serde(default)]
    reaction_radius: f64,
    #[serde(default)]
    formation_energy: f64,
    #[serde(default)]
    diffusion_coefficient: f64,
    /// `(cluster index into the description's `clusters` list, binding
    /// energy)` pairs, resolved to [`ClusterId`]s at load time.
    #[serde(default)]
    binding_energies: Vec<(usize, f64)>,
  },
  /// A rectangular bundle over one or more species axes, each given as
  /// `(species name, lo, hi)`. Allocates `1 + axes.len()` dense ids: the
  /// zeroth moment, then one first moment per axis, in axis order.
  Super {
    axes: Vec<(String, u32, u32)>,
    #[serde(default)]
    reaction_radius: f64,
    #[serde(default)]
    formation_energy: f64,
    #[serde(default)]
    diffusion_coefficient: f64,
    #[serde(default)]
    binding_energies: Vec<(usize, f64)>,
  },
}

impl ClusterDescription {
  /// Number of dense ids this entry allocates (§4.A): 1 for a regular
  /// cluster, `1 + axes.len()` for a super cluster.
  fn id_count(&self) -> u32 {
    match self {
      ClusterDescription::Regular { .. } => 1,
      ClusterDescription::Super { axes, .. } => 1 + axes.len() as u32,
    }
  }

  fn binding_energies(&self) -> &[(usize, f64)] {
    match self {
      ClusterDescription::Regular { binding_energies, .. } => binding_energies,
      ClusterDescription::Super { binding_energies, .. } => binding_energies,
    }
  }

  fn reaction_radius(&self) -> f64 {
    match self {
      ClusterDescription::Regular { reaction_radius, .. } => *reaction_radius,
      ClusterDescription::Super { reaction_radius, .. } => *reaction_radius,
    }
  }

  fn formation_energy(&self) -> f64 {
    match self {
      ClusterDescription::Regular { formation_energy, .. } => *formation_energy,
      ClusterDescription::Super { formation_energy, .. } => *formation_energy,
    }
  }

  fn diffusion_coefficient(&self) -> f64 {
    match self {
      ClusterDescription::Regular { diffusion_coefficient, .. } => *diffusion_coefficient,
      ClusterDescription::Super { diffusion_coefficient, .. } => *diffusion_coefficient,
    }
  }
}

/// One reaction entry, referencing clusters by index into the
/// description's `clusters` list.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ReactionDescription {
  Bimolecular { a: usize, b: usize, product: usize, k: f64 },
  Unary { parent: usize, products: Vec<usize>, k: f64 },
}

/// The on-disk network description format: a flat cluster list plus a
/// reaction list referencing it by index. Serialized as JSON for the same
/// dependency-light reason the checkpoint format is (see
/// [`crate::checkpoint`]).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NetworkDescription {
  pub clusters: Vec<ClusterDescription>,
  pub reactions: Vec<ReactionDescription>,
}

fn parse_species(name: &str) -> Result<Species, CoreError> {
  Species::ALL
    .iter()
    .copied()
    .find(|s| s.to_string().eq_ignore_ascii_case(name))
    .ok_or_else(|| CoreError::Configuration(format!("unknown species {name:?}")))
}

impl NetworkDescription {
  pub fn load(path: impl AsRef<Path>) -> Result<Self, CoreError> {
    let path = path.as_ref();
    let to_error = |reason: String| CoreError::NetworkDescription {
      path: path.display().to_string(),
      reason,
    };
    let file = File::open(path).map_err(|e| to_error(e.to_string()))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| to_error(e.to_string()))
  }

  /// The dense id each description index's *representative* (l0, for a
  /// super cluster) id resolves to, laid out by walking `self.clusters`
  /// in order and allocating [`ClusterDescription::id_count`] ids per
  /// entry (§4.A). Reaction references always resolve through this — a
  /// super cluster participates in a reaction via its zeroth moment.
  fn representative_ids(&self) -> Vec<ClusterId> {
    let mut next = 0u32;
    self
      .clusters
      .iter()
      .map(|desc| {
        let id = ClusterId(next);
        next += desc.id_count();
        id
      })
      .collect()
  }

  fn build_catalogue(&self) -> Result<ClusterCatalogue, CoreError> {
    let representative_ids = self.representative_ids();
    let mut clusters = Vec::with_capacity(self.clusters.len());
    for (idx, desc) in self.clusters.iter().enumerate() {
      let binding_energies = desc
        .binding_energies()
        .iter()
        .map(|(target, e)| (representative_ids[*target], *e))
        .collect();
      let core = ClusterCore {
        id: representative_ids[idx],
        reaction_radius: desc.reaction_radius(),
        formation_energy: desc.formation_energy(),
        binding_energies,
        diffusion_coefficient: desc.diffusion_coefficient(),
        connectivity: Vec::new(),
      };
      let variant = match desc {
        ClusterDescription::Regular { composition, .. } => {
          let mut c = Composition::empty();
          for (name, n) in composition {
            c.set(parse_species(name)?, *n);
          }
          ClusterVariant::Regular { composition: c }
        }
        ClusterDescription::Super { axes, .. } => {
          let l0 = representative_ids[idx];
          let mut super_axes = SmallVec::new();
          let mut moment_ids = SmallVec::new();
          moment_ids.push(l0);
          let mut n_tot: u64 = 1;
          for (offset, (name, lo, hi)) in axes.iter().enumerate() {
            let species = parse_species(name)?;
            super_axes.push(SuperAxis { species, lo: *lo, hi: *hi });
            moment_ids.push(ClusterId(l0.0 + 1 + offset as u32));
            n_tot *= (hi - lo + 1) as u64;
          }
          ClusterVariant::Super(SuperCluster {
            axes: super_axes,
            moment_ids,
            n_tot,
          })
        }
      };
      clusters.push(Cluster { core, variant });
    }
    Ok(ClusterCatalogue::new(clusters))
  }

  fn build_reactions(&self) -> Vec<Reaction> {
    let representative_ids = self.representative_ids();
    self
      .reactions
      .iter()
      .map(|r| match r {
        ReactionDescription::Bimolecular { a, b, product, k } => Reaction::Bimolecular {
          a: representative_ids[*a],
          b: representative_ids[*b],
          product: representative_ids[*product],
          k: *k,
          coupling: None,
        },
        ReactionDescription::Unary { parent, products, k } => Reaction::Unary {
          parent: representative_ids[*parent],
          products: SmallVec::from_vec(products.iter().map(|p| representative_ids[*p]).collect()),
          k: *k,
          coupling: None,
        },
      })
      .collect()
  }

  /// Build a [`Network`] from this description, using the standard
  /// [`ArrheniusRateModel`] (§7 "Network construction" fail-fast path).
  pub fn into_network(self, temperature_tolerance: f64) -> Result<Network, CoreError> {
    let catalogue = self.build_catalogue()?;
    let reactions = self.build_reactions();
    Ok(Network::build(
      catalogue,
      reactions,
      Box::new(ArrheniusRateModel) as Box<dyn RateModel + Send + Sync>,
      temperature_tolerance,
    ))
  }
}

impl Network {
  /// `Network::from_description`: load a JSON network description file and
  /// build a network with the standard Arrhenius rate model (§3
  /// "Lifecycle", §7 error handling).
  pub fn from_description(config: &NetworkConfig) -> Result<Network, CoreError> {
    let description = NetworkDescription::load(&config.description_path)?;
    description.into_network(config.temperature_tolerance)
  }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
