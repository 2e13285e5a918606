//! Species enumeration and composition keys.
//!
//! A `Composition` is the canonical identity of a non-super cluster: a count
//! per [`Species`] axis. Mixed/super clusters additionally carry bounds and
//! moment ids (see [`crate::cluster`]) but still reduce to a `Composition`
//! for lookup purposes.

use std::fmt;

/// Fixed closed enumeration of defect/impurity species tracked by the
/// network (§3 DATA MODEL).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Species {
  He,
  D,
  T,
  V,
  I,
  Xe,
  Void,
  Faulted,
  Frank,
  Perfect,
}

/// Total number of composition axes. Kept in lockstep with [`Species`]'s
/// variant list by [`Species::ALL`].
pub const NUM_SPECIES: usize = 10;

impl Species {
  /// Every species, in a fixed order matching [`Composition`]'s internal
  /// layout.
  pub const ALL: [Species; NUM_SPECIES] = [
    Species::He,
    Species::D,
    Species::T,
    Species::V,
    Species::I,
    Species::Xe,
    Species::Void,
    Species::Faulted,
    Species::Frank,
    Species::Perfect,
  ];

  #[inline]
  pub const fn axis(self) -> usize {
    match self {
      Species::He => 0,
      Species::D => 1,
      Species::T => 2,
      Species::V => 3,
      Species::I => 4,
      Species::Xe => 5,
      Species::Void => 6,
      Species::Faulted => 7,
      Species::Frank => 8,
      Species::Perfect => 9,
    }
  }
}

impl fmt::Display for Species {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{:?}", self)
  }
}

/// A mapping from [`Species`] to nonnegative integer count.
///
/// Two compositions compare equal iff all counts are equal (§3). Stored as
/// a fixed-size array rather than a map: the axis count is small and
/// constant, so this gives `Composition` a trivial, allocation-free
/// `Eq`/`Hash`/`Copy` impl suited to being a dense hash-map key in the
/// catalogue's composition index.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Composition {
  counts: [u32; NUM_SPECIES],
}

impl Composition {
  pub const fn empty() -> Self {
    Self {
      counts: [0; NUM_SPECIES],
    }
  }

  /// A pure-species composition of the given size, e.g. `single(He, 3)` for
  /// He₃.
  pub fn single(species: Species, n: u32) -> Self {
    let mut c = Self::empty();
    c.counts[species.axis()] = n;
    c
  }

  /// Build a composition from `(species, count)` pairs. Later pairs for the
  /// same species overwrite earlier ones.
  pub fn from_pairs(pairs: impl IntoIterator<Item = (Species, u32)>) -> Self {
    let mut c = Self::empty();
    for (s, n) in pairs {
      c.counts[s.axis()] = n;
    }
    c
  }

  #[inline]
  pub fn get(&self, species: Species) -> u32 {
    self.counts[species.axis()]
  }

  #[inline]
  pub fn set(&mut self, species: Species, n: u32) {
    self.counts[species.axis()] = n;
  }

  /// Total number of defects/atoms in the cluster, summed across all axes.
  pub fn total(&self) -> u32 {
    self.counts.iter().sum()
  }

  pub fn is_empty(&self) -> bool {
    self.counts.iter().all(|&c| c == 0)
  }

  /// Iterate over the nonzero `(species, count)` entries.
  pub fn nonzero(&self) -> impl Iterator<Item = (Species, u32)> + '_ {
    Species::ALL
      .iter()
      .copied()
      .filter_map(move |s| {
        let n = self.get(s);
        (n > 0).then_some((s, n))
      })
  }
}

impl fmt::Debug for Composition {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_map().entries(self.nonzero()).finish()
  }
}

#[cfg(test)]
#[path = "species_test.rs"]
mod species_test;
