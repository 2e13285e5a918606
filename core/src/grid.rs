//! 1-D depth grid (§3 DATA MODEL, "Grid").
//!
//! Coordinates may be nonuniform. Ghost cells extend the locally-owned
//! slab; the leftmost and rightmost physical points are reserved boundary
//! cells. `surface_pos` is an index into `x` marking the material front.

/// Ordered depth coordinates plus the moving-surface index.
#[derive(Clone, Debug)]
pub struct Grid {
  /// Physical coordinates `x[0] < x[1] < ...`, length `mx`.
  x: Vec<f64>,
  /// Index of the material front into `x`.
  surface_pos: usize,
  /// `Mx-1` is a free surface with bulk-flux accounting rather than a
  /// reflecting boundary (`rightOffset`, §4.G "Boundary policy").
  free_right_boundary: bool,
}

impl Grid {
  /// Build a grid from explicit (possibly nonuniform) coordinates, with
  /// the surface placed at the given percentile of the grid (§4.G
  /// `createSolverContext`).
  pub fn new(x: Vec<f64>, surface_percentile: f64) -> Self {
    assert!(x.len() >= 2, "grid needs at least the two boundary cells");
    assert!(
      x.windows(2).all(|w| w[0] < w[1]),
      "grid coordinates must be strictly increasing"
    );
    let surface_pos = (((x.len() - 1) as f64) * surface_percentile.clamp(0.0, 1.0)).round() as usize;
    Self {
      x,
      surface_pos,
      free_right_boundary: false,
    }
  }

  /// Configure `Mx-1` as a free surface (`rightOffset != 0`) instead of a
  /// reflecting boundary.
  pub fn with_free_right_boundary(mut self, free: bool) -> Self {
    self.free_right_boundary = free;
    self
  }

  /// True if `Mx-1` is configured as a free surface (§4.G, §4.H).
  pub fn has_free_right_boundary(&self) -> bool {
    self.free_right_boundary
  }

  /// Uniform grid of `mx` points spaced by `dx`, starting at 0.
  pub fn uniform(mx: usize, dx: f64, surface_percentile: f64) -> Self {
    let x = (0..mx).map(|i| i as f64 * dx).collect();
    Self::new(x, surface_percentile)
  }

  pub fn mx(&self) -> usize {
    self.x.len()
  }

  pub fn x(&self, xi: usize) -> f64 {
    self.x[xi]
  }

  pub fn surface_pos(&self) -> usize {
    self.surface_pos
  }

  /// Depth of grid point `xi` relative to the surface: `x[xi] -
  /// x[surface_pos]` (§4.D).
  pub fn depth(&self, xi: usize) -> f64 {
    self.x[xi] - self.x[self.surface_pos]
  }

  /// Left/right step sizes around interior point `xi` (`hL`, `hR`).
  pub fn steps(&self, xi: usize) -> (f64, f64) {
    (self.x[xi] - self.x[xi - 1], self.x[xi + 1] - self.x[xi])
  }

  /// Left-only step size (`hL`), for a point with no right neighbor.
  pub fn left_step(&self, xi: usize) -> f64 {
    self.x[xi] - self.x[xi - 1]
  }

  /// True if `xi` is a reservoir cell (`xi <= surface_pos`) with identity
  /// dynamics (§4.G boundary policy).
  pub fn is_reservoir(&self, xi: usize) -> bool {
    xi <= self.surface_pos
  }

  /// True if `xi` is the rightmost boundary cell.
  pub fn is_right_boundary(&self, xi: usize) -> bool {
    xi == self.mx() - 1
  }

  /// True if `xi` is the rightmost boundary cell *and* it has reflecting
  /// (identity) dynamics — false when `rightOffset` has configured it as
  /// a free surface instead (§4.G, §4.H).
  pub fn is_reflecting_right_boundary(&self, xi: usize) -> bool {
    self.is_right_boundary(xi) && !self.free_right_boundary
  }

  /// Interior range `[xs, xs+xm)` the residual/Jacobian loops iterate
  /// (everything but the two reserved boundary cells, per §4.G step 1 —
  /// note the left reservoir cells up to and including `surface_pos` are
  /// still visited, just short-circuited to identity).
  pub fn interior_range(&self) -> std::ops::Range<usize> {
    1..self.mx() - 1
  }

  /// Move the surface one step toward the bulk (retreat, §4.H). Returns
  /// `false` (request termination) if the surface would leave the grid.
  pub fn retreat_surface(&mut self) -> bool {
    if self.surface_pos == 0 {
      return false;
    }
    self.surface_pos -= 1;
    true
  }

  /// Move the surface one step toward the vacuum (advance, §4.H).
  pub fn advance_surface(&mut self) {
    if self.surface_pos + 1 < self.mx() {
      self.surface_pos += 1;
    }
  }

  /// Extend the grid by `n` additional points ahead of the current front,
  /// re-extruding after a surface-offset request (§4.H, §7 "Boundary
  /// overrun").
  pub fn extrude(&mut self, n: usize, dx: f64) {
    let last = *self.x.last().unwrap();
    for i in 1..=n {
      self.x.push(last + i as f64 * dx);
    }
  }
}

#[cfg(test)]
#[path = "grid_test.rs"]
mod grid_test;
