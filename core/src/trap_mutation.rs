//! Modified trap-mutation: material-specific depth-bucketed He -> HeV + I
//! conversion (§4.D).

use std::collections::HashMap;

use crate::cluster::{ClusterCatalogue, ClusterId};
use crate::constants::K_B;
use crate::grid::Grid;
use crate::network::Network;
use crate::species::{Composition, Species};

/// One entry of a material's trap-mutation table: at He cluster size `s`
/// and depth bucket `bucket`, He_s converts to HeV of vacancy count `v`
/// with activation energy `energy_ev`.
#[derive(Clone, Copy, Debug)]
pub struct TrapMutationEntry {
  pub he_size: u32,
  pub bucket: usize,
  pub product_vacancy: u32,
  pub energy_ev: f64,
}

/// A crystallographic surface's trap-mutation table (§4.D): the
/// `(size, depth-bucket) -> vacancy count` rules and activation energy are
/// a per-material subclass, expressed as a trait rather than branching on
/// an enum inside one function.
pub trait TrapMutationRule {
  /// First `num_buckets()` grid points beyond the surface each map to one
  /// depth bucket; deeper points have no trap mutation.
  fn num_buckets(&self) -> usize;

  /// Table entries, one per `(he_size, bucket)` this material mutates.
  fn entries(&self) -> Vec<TrapMutationEntry>;
}

pub struct W100;
pub struct W110;
pub struct W111;
pub struct W211;
pub struct Fe;
pub struct UO2;

impl TrapMutationRule for W100 {
  fn num_buckets(&self) -> usize {
    3
  }

  fn entries(&self) -> Vec<TrapMutationEntry> {
    vec![
      TrapMutationEntry { he_size: 1, bucket: 0, product_vacancy: 1, energy_ev: 0.25 },
      TrapMutationEntry { he_size: 1, bucket: 1, product_vacancy: 1, energy_ev: 0.35 },
      TrapMutationEntry { he_size: 2, bucket: 0, product_vacancy: 1, energy_ev: 0.20 },
      TrapMutationEntry { he_size: 2, bucket: 1, product_vacancy: 2, energy_ev: 0.30 },
    ]
  }
}

impl TrapMutationRule for W110 {
  fn num_buckets(&self) -> usize {
    3
  }

  fn entries(&self) -> Vec<TrapMutationEntry> {
    vec![
      TrapMutationEntry { he_size: 1, bucket: 0, product_vacancy: 1, energy_ev: 0.27 },
      TrapMutationEntry { he_size: 2, bucket: 0, product_vacancy: 2, energy_ev: 0.22 },
    ]
  }
}

impl TrapMutationRule for W111 {
  fn num_buckets(&self) -> usize {
    3
  }

  fn entries(&self) -> Vec<TrapMutationEntry> {
    vec![
      TrapMutationEntry { he_size: 1, bucket: 0, product_vacancy: 1, energy_ev: 0.23 },
      TrapMutationEntry { he_size: 1, bucket: 1, product_vacancy: 1, energy_ev: 0.33 },
    ]
  }
}

impl TrapMutationRule for W211 {
  fn num_buckets(&self) -> usize {
    3
  }

  fn entries(&self) -> Vec<TrapMutationEntry> {
    vec![TrapMutationEntry { he_size: 1, bucket: 0, product_vacancy: 1, energy_ev: 0.29 }]
  }
}

impl TrapMutationRule for Fe {
  fn num_buckets(&self) -> usize {
    2
  }

  fn entries(&self) -> Vec<TrapMutationEntry> {
    vec![TrapMutationEntry { he_size: 1, bucket: 0, product_vacancy: 1, energy_ev: 0.18 }]
  }
}

impl TrapMutationRule for UO2 {
  fn num_buckets(&self) -> usize {
    2
  }

  fn entries(&self) -> Vec<TrapMutationEntry> {
    vec![TrapMutationEntry { he_size: 1, bucket: 0, product_vacancy: 1, energy_ev: 0.15 }]
  }
}

/// Selects one of the six [`TrapMutationRule`] implementations; the
/// selector a config/CLI layer deals in, since `dyn TrapMutationRule`
/// alone can't be named in a config struct.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Material {
  W100,
  W110,
  W111,
  W211,
  Fe,
  UO2,
}

impl Material {
  pub fn rule(&self) -> Box<dyn TrapMutationRule> {
    match self {
      Material::W100 => Box::new(W100),
      Material::W110 => Box::new(W110),
      Material::W111 => Box::new(W111),
      Material::W211 => Box::new(W211),
      Material::Fe => Box::new(Fe),
      Material::UO2 => Box::new(UO2),
    }
  }
}

/// One fully-resolved Jacobian row for `computePartialsForTrapMutation`:
/// the `(He, He)`, `(HeV, He)`, `(I, He)` triple for one mutating pair.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrapMutationPartials {
  pub he_id: ClusterId,
  pub hev_id: ClusterId,
  pub i_id: ClusterId,
  pub k_tm: f64,
}

/// Drives §4.D over a catalogue: resolves the material's size/depth table
/// into concrete cluster ids once, then recomputes rates whenever
/// [`Network::set_temperature`] fires.
pub struct TrapMutationOperator {
  material: Material,
  he1_id: Option<ClusterId>,
  i_id: Option<ClusterId>,
  resolved: Vec<(TrapMutationEntry, ClusterId, ClusterId)>,
  rates: HashMap<(u32, usize), f64>,
}

impl TrapMutationOperator {
  pub fn build(catalogue: &ClusterCatalogue, material: Material) -> Self {
    let he1_id = catalogue.get_pure(Species::He, 1).map(|c| c.id());
    let i_id = catalogue.get_pure(Species::I, 1).map(|c| c.id());

    let resolved = material
      .rule()
      .entries()
      .into_iter()
      .filter_map(|entry| {
        let he_id = catalogue.get_pure(Species::He, entry.he_size)?.id();
        let hev_id = catalogue
          .get_by_composition(&Composition::from_pairs([
            (Species::He, entry.he_size),
            (Species::V, entry.product_vacancy),
          ]))?
          .id();
        Some((entry, he_id, hev_id))
      })
      .collect();

    Self {
      material,
      he1_id,
      i_id,
      resolved,
      rates: HashMap::new(),
    }
  }

  pub fn material(&self) -> Material {
    self.material
  }

  /// Recompute `k_tm` for every table entry from the current He-monomer
  /// diffusion coefficient: `4 * exp(-E_a / kT) * D_He1(T)` (§4.D).
  pub fn update_rate(&mut self, network: &Network) {
    let Some(he1_id) = self.he1_id else {
      return;
    };
    let t = network.last_temperature();
    let d_he1 = network.diffusion_coefficient(he1_id);
    for (entry, ..) in &self.resolved {
      let k = 4.0 * (-entry.energy_ev / (K_B * t)).exp() * d_he1;
      self.rates.insert((entry.he_size, entry.bucket), k);
    }
  }

  /// Depth bucket of grid point `xi`, or `None` if it's at/behind the
  /// surface or deeper than the material's bucketed region.
  pub fn bucket_of(&self, grid: &Grid, xi: usize) -> Option<usize> {
    if xi <= grid.surface_pos() {
      return None;
    }
    let bucket = xi - grid.surface_pos() - 1;
    (bucket < self.material.rule().num_buckets()).then_some(bucket)
  }

  /// Accumulate `-k_tm*C(He_s)` into `He_s`, `+k_tm*C(He_s)` into `HeV`
  /// and `I`, for every rule active at `bucket` (§4.D).
  pub fn accumulate_flux(&self, bucket: usize, concentrations: &[f64], out: &mut [f64]) {
    let Some(i_id) = self.i_id else {
      return;
    };
    for (entry, he_id, hev_id) in &self.resolved {
      if entry.bucket != bucket {
        continue;
      }
      let Some(&k_tm) = self.rates.get(&(entry.he_size, entry.bucket)) else {
        continue;
      };
      let c_he = concentrations[he_id.index()];
      let flux = k_tm * c_he;
      out[he_id.index()] -= flux;
      out[hev_id.index()] += flux;
      out[i_id.index()] += flux;
    }
  }

  /// Jacobian triples active at `bucket` (`computePartialsForTrapMutation`,
  /// §4.D).
  pub fn partial_derivatives(&self, bucket: usize) -> Vec<TrapMutationPartials> {
    let Some(i_id) = self.i_id else {
      return Vec::new();
    };
    self
      .resolved
      .iter()
      .filter(|(entry, ..)| entry.bucket == bucket)
      .filter_map(|(entry, he_id, hev_id)| {
        let k_tm = *self.rates.get(&(entry.he_size, entry.bucket))?;
        Some(TrapMutationPartials {
          he_id: *he_id,
          hev_id: *hev_id,
          i_id,
          k_tm,
        })
      })
      .collect()
  }
}

#[cfg(test)]
#[path = "trap_mutation_test.rs"]
mod trap_mutation_test;
