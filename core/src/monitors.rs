//! Post-step diagnostics (§6 CLI surface: `-helium_retention`,
//! `-xenon_retention`, `-mean_size`, `-tridyn`).
//!
//! Kept as a trait so the event loop can drive an arbitrary set of
//! enabled monitors without matching on which CLI switches fired; each
//! monitor owns its own accumulated state and is stepped once per solver
//! step.

use crate::cluster::ClusterCatalogue;
use crate::grid::Grid;
use crate::species::Species;

/// Read-only view a monitor needs at one solver step.
pub struct MonitorContext<'a> {
  pub grid: &'a Grid,
  pub catalogue: &'a ClusterCatalogue,
  /// Dense concentrations, one row per grid point.
  pub slab: &'a [Vec<f64>],
  pub time: f64,
  pub temperature: f64,
}

pub trait Monitor {
  fn on_step(&mut self, ctx: &MonitorContext);
}

/// `-check_negative <thr>`: clamp every concentration whose magnitude is
/// below `threshold` to `±threshold` in place (§6, §7 "Numerical guard" —
/// non-fatal).
pub fn clamp_negative_concentrations(slab: &mut [Vec<f64>], threshold: f64) {
  for row in slab.iter_mut() {
    for c in row.iter_mut() {
      if c.abs() < threshold {
        *c = threshold.copysign(*c);
      }
    }
  }
}

/// `-check_collapse <thr>`: true once `dt` has dropped below `threshold`,
/// requesting the integrator stop with a non-error exit (§6, §7 "Solver
/// collapse").
pub fn dt_collapsed(dt: f64, threshold: f64) -> bool {
  dt < threshold
}

fn species_density(catalogue: &ClusterCatalogue, row: &[f64], species: Species) -> f64 {
  catalogue
    .iter()
    .filter_map(|c| c.species_representative(species).map(|(n, id)| n * row[id.index()]))
    .sum()
}

/// Integrates one species' retained inventory over the whole grid
/// (`-helium_retention` / `-xenon_retention`).
pub struct RetentionMonitor {
  species: Species,
  retained: f64,
}

impl RetentionMonitor {
  pub fn new(species: Species) -> Self {
    Self { species, retained: 0.0 }
  }

  pub fn retained(&self) -> f64 {
    self.retained
  }
}

impl Monitor for RetentionMonitor {
  fn on_step(&mut self, ctx: &MonitorContext) {
    self.retained = (0..ctx.grid.mx())
      .map(|xi| {
        let dx = if xi + 1 < ctx.grid.mx() {
          ctx.grid.x(xi + 1) - ctx.grid.x(xi)
        } else {
          ctx.grid.x(xi) - ctx.grid.x(xi - 1)
        };
        species_density(ctx.catalogue, &ctx.slab[xi], self.species) * dx
      })
      .sum();
  }
}

/// Concentration-weighted mean cluster size of one species, over the
/// whole domain (`-mean_size`).
pub struct MeanSizeMonitor {
  species: Species,
  mean: f64,
}

impl MeanSizeMonitor {
  pub fn new(species: Species) -> Self {
    Self { species, mean: 0.0 }
  }

  pub fn mean(&self) -> f64 {
    self.mean
  }
}

impl Monitor for MeanSizeMonitor {
  fn on_step(&mut self, ctx: &MonitorContext) {
    let mut weighted = 0.0;
    let mut total = 0.0;
    for row in ctx.slab {
      for cluster in ctx.catalogue.iter() {
        let Some((n, id)) = cluster.species_representative(self.species) else {
          continue;
        };
        let c = row[id.index()];
        weighted += n * c;
        total += c;
      }
    }
    self.mean = if total > 0.0 { weighted / total } else { 0.0 };
  }
}

/// One row of the fixed 7-wide `(depth, nHe, nD, nT, nV, nI, T)` TRIDYN
/// layout (§6).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TridynRow {
  pub depth: f64,
  pub n_he: f64,
  pub n_d: f64,
  pub n_t: f64,
  pub n_v: f64,
  pub n_i: f64,
  pub temperature: f64,
}

/// Builds one `TRIDYN_<step>` snapshot per call (`-tridyn`).
pub struct TridynMonitor {
  rows: Vec<TridynRow>,
}

impl TridynMonitor {
  pub fn new() -> Self {
    Self { rows: Vec::new() }
  }

  pub fn rows(&self) -> &[TridynRow] {
    &self.rows
  }
}

impl Default for TridynMonitor {
  fn default() -> Self {
    Self::new()
  }
}

impl Monitor for TridynMonitor {
  fn on_step(&mut self, ctx: &MonitorContext) {
    self.rows = (0..ctx.grid.mx())
      .map(|xi| TridynRow {
        depth: ctx.grid.depth(xi),
        n_he: species_density(ctx.catalogue, &ctx.slab[xi], Species::He),
        n_d: species_density(ctx.catalogue, &ctx.slab[xi], Species::D),
        n_t: species_density(ctx.catalogue, &ctx.slab[xi], Species::T),
        n_v: species_density(ctx.catalogue, &ctx.slab[xi], Species::V),
        n_i: species_density(ctx.catalogue, &ctx.slab[xi], Species::I),
        temperature: ctx.temperature,
      })
      .collect();
  }
}

#[cfg(test)]
#[path = "monitors_test.rs"]
mod monitors_test;
